// POST /api/auth/login - verify credentials and mint an access token

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{issue_access_token, verify_password, SessionUser};
use crate::database::models::User;
use crate::database::store::{document_id, Document};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both fields present and non-blank
    pub fn credentials(&self) -> Result<(&str, &str), ApiError> {
        let username = self.username.as_deref().map(str::trim).unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();

        let mut missing = HashMap::new();
        if username.is_empty() {
            missing.insert("username".to_string(), "Username is required".to_string());
        }
        if password.is_empty() {
            missing.insert("password".to_string(), "Password is required".to_string());
        }
        if !missing.is_empty() {
            return Err(ApiError::validation_error("Username and password are required", Some(missing)));
        }
        Ok((username, password))
    }
}

pub async fn login(State(state): State<AppState>, JsonBody(body): JsonBody<LoginRequest>) -> ApiResult<Value> {
    let (username, password) = body.credentials()?;

    let mut filter = Document::new();
    filter.insert("username".to_string(), json!(username));
    let Some(doc) = state.repo::<User>().find_one(&filter).await? else {
        tracing::warn!("Login failed for unknown user {}", username);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let id = document_id(&doc).unwrap_or_default().to_string();
    let user: User = serde_json::from_value(Value::Object(doc)).map_err(|e| {
        tracing::error!("Stored user {} is malformed: {}", id, e);
        ApiError::internal_server_error("Internal server error")
    })?;

    if !verify_password(password, &user.password)? {
        tracing::warn!("Login failed for {}: wrong password", username);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let session_user = SessionUser {
        id,
        username: user.username,
        role: user.role,
        organization: user.organization,
    };
    let security = &state.config.security;
    let token = issue_access_token(&session_user, &security.jwt_secret, security.jwt_expiry_hours)?;

    tracing::info!("User {} logged in as {}", session_user.username, session_user.role);
    Ok(ApiResponse::success(json!({
        "user": session_user,
        "token": token,
    })))
}
