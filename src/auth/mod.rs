pub mod session;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::database::models::Role;

pub use session::{Session, SessionClaims, SessionUser};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("{0}")]
    InvalidToken(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// Access token minted by the backend on a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub username: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl AccessClaims {
    pub fn new(user: &SessionUser, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = expires_after(now, expiry_hours).timestamp();

        Self {
            sub: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            organization: user.organization.clone(),
            exp,
            iat: now.timestamp(),
        }
    }
}

/// `now` plus `hours`, saturating at the latest representable instant
pub fn expires_after(now: DateTime<Utc>, hours: u64) -> DateTime<Utc> {
    i64::try_from(hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Sign any claim set with an HMAC secret
pub fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Verify signature and expiry, returning the claims
pub fn verify<C: for<'de> Deserialize<'de>>(token: &str, secret: &str) -> Result<C, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<C>(token, &decoding_key, &Validation::default())
        .map_err(|e| AuthError::InvalidToken(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}

pub fn issue_access_token(user: &SessionUser, secret: &str, expiry_hours: u64) -> Result<String, AuthError> {
    sign(&AccessClaims::new(user, expiry_hours), secret)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// False for a wrong password; an unparseable stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::PasswordHash(e.to_string()))
}
