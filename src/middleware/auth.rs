use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::session::{decode_session, token_from_headers};
use crate::auth::{SessionClaims, SessionUser};
use crate::database::models::Role;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated admin context extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub role: Role,
    pub organization: Option<String>,
    pub access_token: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            tracing::warn!("User {} ({}) denied admin-only resource", self.username, self.role);
            Err(ApiError::forbidden("Admin role required"))
        }
    }
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        let SessionUser {
            id,
            username,
            role,
            organization,
        } = claims.user();
        Self {
            id,
            username,
            role,
            organization,
            access_token: claims.access_token,
        }
    }
}

/// Resolve the caller's session without failing the request
pub fn resolve_session(state: &AppState, headers: &HeaderMap) -> Result<Option<SessionClaims>, String> {
    let security = &state.config.security;
    let Some(token) = token_from_headers(headers, &security.session_cookie) else {
        return Ok(None);
    };

    decode_session(&token, &security.session_secret)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Session gate for admin API routes. Anonymous callers get a 401 body and
/// the wrapped handler never runs.
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = match resolve_session(&state, request.headers()) {
        Ok(Some(claims)) => claims,
        Ok(None) => {
            tracing::warn!("Rejected {} {}: no session", request.method(), request.uri().path());
            return Err(ApiError::unauthorized("Authentication required"));
        }
        Err(reason) => {
            tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), reason);
            return Err(ApiError::unauthorized("Invalid or expired session"));
        }
    };

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}
