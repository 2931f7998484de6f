//! Admin session tokens and their client-visible form.
//!
//! A successful credentials login embeds the backend's user record and
//! access token into a signed session token. The token travels in an
//! `HttpOnly` cookie (or a bearer header for API clients) and is hydrated
//! back into a [`Session`] on every request.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{expires_after, sign, verify, AuthError};
use crate::database::models::Role;

/// User fields shared by the login response, the session token and the session object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub organization: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub access_token: String,
    #[serde(default)]
    pub organization: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(user: &SessionUser, access_token: String, max_age_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            access_token,
            organization: user.organization.clone(),
            exp: expires_after(now, max_age_hours).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn user(&self) -> SessionUser {
        SessionUser {
            id: self.sub.clone(),
            username: self.username.clone(),
            role: self.role,
            organization: self.organization.clone(),
        }
    }
}

/// What the admin client sees at `/api/auth/session`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    pub access_token: String,
    pub expires: DateTime<Utc>,
}

impl From<SessionClaims> for Session {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user: claims.user(),
            expires: Utc.timestamp_opt(claims.exp, 0).single().unwrap_or_else(Utc::now),
            access_token: claims.access_token,
        }
    }
}

pub fn issue_session(
    user: &SessionUser,
    access_token: String,
    secret: &str,
    max_age_hours: u64,
) -> Result<String, AuthError> {
    sign(&SessionClaims::new(user, access_token, max_age_hours), secret)
}

pub fn decode_session(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    verify(token, secret)
}

/// Session token from `Authorization: Bearer` or the named cookie
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(name: &str, token: &str, max_age_hours: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        name,
        token,
        max_age_hours.saturating_mul(3600)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", 0, secure)
}
