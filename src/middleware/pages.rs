use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::auth::{resolve_session, AuthUser};
use crate::state::AppState;

pub const LOGIN_PAGE: &str = "/login";
pub const DASHBOARD_PAGE: &str = "/dashboard";

/// Dashboard sections only the admin role may open
const ADMIN_SECTIONS: [&str; 2] = ["/dashboard/users", "/dashboard/settings"];

pub fn is_admin_section(path: &str) -> bool {
    ADMIN_SECTIONS
        .iter()
        .any(|section| path == *section || path.starts_with(&format!("{}/", section)))
}

/// `/login?callbackUrl=<path>` with the path form-encoded
pub fn login_redirect(path_and_query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(path_and_query.as_bytes()).collect();
    format!("{}?callbackUrl={}", LOGIN_PAGE, encoded)
}

/// Page gate for `/dashboard`: anonymous callers go to the login page,
/// non-admins are sent back from admin-only sections.
pub async fn page_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| path.clone());

    let claims = match resolve_session(&state, request.headers()) {
        Ok(Some(claims)) => claims,
        Ok(None) => return Redirect::to(&login_redirect(&target)).into_response(),
        Err(reason) => {
            tracing::debug!("Ignoring invalid session on {}: {}", path, reason);
            return Redirect::to(&login_redirect(&target)).into_response();
        }
    };

    let user = AuthUser::from(claims);
    if is_admin_section(&path) && !user.is_admin() {
        tracing::warn!("Redirecting {} ({}) away from {}", user.username, user.role, path);
        return Redirect::to(DASHBOARD_PAGE).into_response();
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}
