// POST /api/media and POST /api/ui-media - multipart upload to the media host

use axum::extract::{Extension, Multipart, State};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::database::models::{Media, Model, UiMedia};
use crate::database::repository::Repository;
use crate::database::store::{document_id, Document};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::UploadFile;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const PENDING_URL: &str = "pending://upload";

/// Buffered multipart form: the file plus every non-empty text field
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadFile>,
    pub fields: HashMap<String, Vec<String>>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_FIELD {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| ApiError::bad_request(e.body_text()))?;
                if !bytes.is_empty() {
                    form.file = Some(UploadFile {
                        bytes: bytes.to_vec(),
                        file_name,
                        content_type,
                    });
                }
            } else {
                let value = field.text().await.map_err(|e| ApiError::bad_request(e.body_text()))?;
                let value = value.trim();
                if !value.is_empty() {
                    form.fields.entry(name).or_default().push(value.to_string());
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Repeated fields and comma-separated values, flattened
    pub fn list(&self, name: &str) -> Vec<String> {
        self.fields
            .get(name)
            .into_iter()
            .flatten()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn copy_text(&self, body: &mut Map<String, Value>, names: &[&str]) {
        for name in names {
            if let Some(value) = self.text(name) {
                body.insert(name.to_string(), Value::String(value.to_string()));
            }
        }
    }

    /// Rejects the upload before anything is sent to the media host
    fn require(&self) -> Result<(), ApiError> {
        if self.file.is_none() {
            return Err(ApiError::bad_request("No file uploaded"));
        }
        if self.text("title").is_none() {
            let field_errors = HashMap::from([("title".to_string(), "Title is required".to_string())]);
            return Err(ApiError::validation_error("Title is required", Some(field_errors)));
        }
        Ok(())
    }
}

/// Upload the file and persist `body` plus the hosted URLs as an `M`
async fn store_upload<M: Model>(
    state: &AppState,
    user: &AuthUser,
    form: UploadForm,
    mut body: Map<String, Value>,
) -> ApiResult<Document> {
    form.require()?;
    let Some(file) = form.file else {
        return Err(ApiError::bad_request("No file uploaded"));
    };

    // The hosted URLs are the only fields not known yet
    let mut pending = body.clone();
    pending.insert("url".to_string(), Value::String(PENDING_URL.to_string()));
    pending.insert("thumbnailUrl".to_string(), Value::String(PENDING_URL.to_string()));
    Repository::<M>::parse(Value::Object(pending))?;

    let asset = state.media_host.upload(file).await?;
    body.insert("url".to_string(), Value::String(asset.url));
    body.insert("thumbnailUrl".to_string(), Value::String(asset.thumbnail_url));

    let saved = state.repo::<M>().create(Value::Object(body)).await?;
    tracing::info!(
        "{} uploaded {} {} ({})",
        user.username,
        M::COLLECTION,
        document_id(&saved).unwrap_or_default(),
        asset.public_id
    );
    Ok(ApiResponse::created(saved))
}

/// POST /api/media
pub async fn media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Document> {
    let form = UploadForm::read(multipart).await?;

    let mut body = Map::new();
    form.copy_text(&mut body, &["title", "description", "type", "isPublic"]);
    store_upload::<Media>(&state, &user, form, body).await
}

/// POST /api/ui-media
pub async fn ui_media(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<Document> {
    let form = UploadForm::read(multipart).await?;

    let mut body = Map::new();
    form.copy_text(&mut body, &["title", "index", "isPublic"]);
    let locations = form.list("locationIds");
    body.insert(
        "locationIds".to_string(),
        Value::Array(locations.into_iter().map(Value::String).collect()),
    );
    store_upload::<UiMedia>(&state, &user, form, body).await
}
