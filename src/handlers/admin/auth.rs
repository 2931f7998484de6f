//! Credential login, session hydration and sign-out for the admin surface.
//!
//! The admin never checks passwords itself: the callback forwards the
//! credentials to the backend login endpoint and wraps what it gets back
//! (user record + access token) into a signed session cookie.

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::session::{clear_session_cookie, decode_session, issue_session, session_cookie};
use crate::auth::{Session, SessionUser};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::handlers::backend::auth::LoginRequest;
use crate::middleware::auth::resolve_session;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const BACKEND_LOGIN: &str = "/api/auth/login";

#[derive(Debug, Deserialize)]
struct LoginPayload {
    user: SessionUser,
    token: String,
}

/// Pull the message out of a backend error body, if it has one
fn backend_message(body: &Value) -> Option<String> {
    body.get("message").and_then(Value::as_str).map(str::to_string)
}

/// POST /api/auth/callback/credentials
pub async fn callback(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    let (username, password) = body.credentials()?;

    let (status, reply) = state
        .backend
        .forward(
            Method::POST,
            BACKEND_LOGIN,
            None,
            Some(&json!({"username": username, "password": password})),
        )
        .await
        .map_err(|e| {
            tracing::error!("Login for {} could not reach backend: {}", username, e);
            ApiError::from(e)
        })?;

    if status == StatusCode::UNAUTHORIZED {
        tracing::warn!("Backend rejected credentials for {}", username);
        return Err(ApiError::unauthorized(
            backend_message(&reply).unwrap_or_else(|| "Invalid username or password".to_string()),
        ));
    }
    if status.is_client_error() {
        return Err(ApiError::bad_request(
            backend_message(&reply).unwrap_or_else(|| "Invalid login request".to_string()),
        ));
    }
    if !status.is_success() {
        tracing::error!("Backend login for {} failed with {}", username, status);
        return Err(ApiError::bad_gateway("Login service returned an unexpected response"));
    }

    let data = reply.get("data").cloned().unwrap_or(reply);
    let payload: LoginPayload = serde_json::from_value(data).map_err(|e| {
        tracing::error!("Backend login response malformed: {}", e);
        ApiError::bad_gateway("Login service returned an unexpected response")
    })?;

    let security = &state.config.security;
    let token = issue_session(
        &payload.user,
        payload.token,
        &security.session_secret,
        security.session_max_age_hours,
    )?;
    let session = Session::from(decode_session(&token, &security.session_secret)?);
    let cookie = session_cookie(
        &security.session_cookie,
        &token,
        security.session_max_age_hours,
        security.require_https,
    );

    tracing::info!("Session opened for {} ({})", session.user.username, session.user.role);
    Ok(([(header::SET_COOKIE, cookie)], ApiResponse::success(session)).into_response())
}

/// GET /api/auth/session - the hydrated session, or `{}` when signed out
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Value> {
    match resolve_session(&state, &headers) {
        Ok(Some(claims)) => {
            let session = Session::from(claims);
            serde_json::to_value(session)
                .map(ApiResponse::success)
                .map_err(|e| ApiError::internal_server_error(e.to_string()))
        }
        Ok(None) => Ok(ApiResponse::success(json!({}))),
        Err(reason) => {
            tracing::debug!("Treating invalid session as signed out: {}", reason);
            Ok(ApiResponse::success(json!({})))
        }
    }
}

/// POST /api/auth/signout
pub async fn signout(State(state): State<AppState>) -> Response {
    let security = &state.config.security;
    let cookie = clear_session_cookie(&security.session_cookie, security.require_https);

    (
        [(header::SET_COOKIE, cookie)],
        ApiResponse::success(json!({ "message": "Signed out" })),
    )
        .into_response()
}
