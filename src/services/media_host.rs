use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::MediaConfig;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media host credentials are not configured")]
    NotConfigured,

    #[error("media host rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("media host transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("media host response invalid: {0}")]
    InvalidResponse(String),
}

/// A file buffered from a multipart upload
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: String,
}

impl UploadFile {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub url: String,
    pub thumbnail_url: String,
    pub public_id: String,
}

/// Cloud image host the admin uploads go to
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<UploadedAsset, MediaError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Cloudinary-compatible signed upload client
pub struct CloudinaryHost {
    http: reqwest::Client,
    config: MediaConfig,
}

impl CloudinaryHost {
    pub fn new(http: reqwest::Client, config: MediaConfig) -> Self {
        Self { http, config }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/auto/upload",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Parameters that take part in the signature, sorted by name
    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = vec![("timestamp", timestamp.to_string())];
        if !self.config.folder.is_empty() {
            params.push(("folder", self.config.folder.clone()));
        }
        if !self.config.transformation.is_empty() {
            params.push(("transformation", self.config.transformation.clone()));
        }
        params.sort_by(|a, b| a.0.cmp(b.0));
        params
    }
}

/// SHA-256 over `k1=v1&k2=v2...` followed by the API secret
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Delivery URL with `transformation` spliced in after `/upload/`
pub fn thumbnail_url(secure_url: &str, transformation: &str) -> String {
    if transformation.is_empty() {
        return secure_url.to_string();
    }
    secure_url.replacen("/upload/", &format!("/upload/{}/", transformation), 1)
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload(&self, file: UploadFile) -> Result<UploadedAsset, MediaError> {
        if !self.config.is_configured() {
            return Err(MediaError::NotConfigured);
        }

        let params = self.signed_params(Utc::now().timestamp());
        let signature = sign_params(&params, &self.config.api_secret);

        let mut form = reqwest::multipart::Form::new()
            .text("file", file.data_uri())
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in params {
            form = form.text(name, value);
        }

        tracing::debug!(
            "Uploading {} ({} bytes) to media host",
            file.file_name.as_deref().unwrap_or("unnamed file"),
            file.bytes.len()
        );

        let response = self.http.post(self.upload_url()).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse =
            serde_json::from_slice(&body).map_err(|e| MediaError::InvalidResponse(e.to_string()))?;

        tracing::info!("Uploaded media asset {}", uploaded.public_id);
        Ok(UploadedAsset {
            thumbnail_url: thumbnail_url(&uploaded.secure_url, &self.config.thumbnail_transformation),
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}
