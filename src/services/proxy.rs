use axum::http::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("backend unreachable: {0}")]
    Unavailable(String),

    #[error("backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("backend request aborted: {0}")]
    Aborted(String),

    #[error("backend response invalid: {0}")]
    InvalidResponse(String),

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

impl ProxyError {
    /// Classify a transport failure. Timeouts are checked first because a
    /// connect timeout also reports as a connect error.
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout(timeout)
        } else if err.is_connect() {
            ProxyError::Unavailable(err.to_string())
        } else if err.is_request() || err.is_body() {
            ProxyError::Aborted(err.to_string())
        } else {
            ProxyError::InvalidResponse(err.to_string())
        }
    }
}

/// HTTP client for the backend service, bounded by a fixed timeout
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, config: &BackendConfig) -> Result<Self, ProxyError> {
        let base = Url::parse(&config.url).map_err(|e| ProxyError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ProxyError::InvalidUrl(config.url.clone()));
        }

        Ok(Self {
            http,
            base,
            timeout: config.timeout(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send `method path?query` with an optional JSON body and hand back the
    /// backend's status and JSON body untouched. An empty body becomes `null`.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value), ProxyError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| ProxyError::InvalidUrl(format!("{}: {}", path, e)))?;
        url.set_query(query.filter(|q| !q.is_empty()));

        let mut request = self.http.request(method.clone(), url.clone()).timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!("Forwarding {} {} to backend", method, url);

        let response = request
            .send()
            .await
            .map_err(|e| ProxyError::from_reqwest(e, self.timeout))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProxyError::from_reqwest(e, self.timeout))?;

        if bytes.is_empty() {
            return Ok((status, Value::Null));
        }
        let body = serde_json::from_slice(&bytes)
            .map_err(|e| ProxyError::InvalidResponse(format!("{} returned non-JSON body: {}", url, e)))?;
        Ok((status, body))
    }
}
