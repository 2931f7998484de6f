// Page shells for the admin client. Rendering lives in the client; these
// only carry what the page gate resolved.

use axum::extract::{Extension, OriginalUri, Query};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::middleware::pages::DASHBOARD_PAGE;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginQuery {
    pub callback_url: Option<String>,
}

/// GET /login
pub async fn login(Query(query): Query<LoginQuery>) -> ApiResult<Value> {
    let callback = query
        .callback_url
        .filter(|url| url.starts_with('/') && !url.starts_with("//"))
        .unwrap_or_else(|| DASHBOARD_PAGE.to_string());

    Ok(ApiResponse::success(json!({
        "page": "login",
        "callbackUrl": callback,
    })))
}

/// GET /dashboard and every section below it
pub async fn dashboard(Extension(user): Extension<AuthUser>, OriginalUri(uri): OriginalUri) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "page": uri.path(),
        "user": {
            "id": user.id,
            "username": user.username,
            "role": user.role,
            "organization": user.organization,
        },
    })))
}
