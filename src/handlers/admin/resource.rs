//! Session-gated CRUD shared by every admin collection.
//!
//! Each handler is generic over the document model; the router picks the
//! model per path. Reads expand the model's reference arrays (a no-op for
//! models that declare none) and lists come back newest first.

use axum::extract::{Extension, Path, State};
use serde_json::{json, Value};

use crate::database::models::Model;
use crate::database::store::{document_id, Document};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

fn not_found<M: Model>() -> ApiError {
    ApiError::not_found(format!("{} not found", M::LABEL))
}

/// GET /api/<collection>
pub async fn list<M: Model>(State(state): State<AppState>) -> ApiResult<Vec<Document>> {
    let docs = state.repo::<M>().list_expanded(&Document::new()).await?;
    Ok(ApiResponse::success(docs))
}

/// GET /api/<collection>/:id
pub async fn show<M: Model>(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Document> {
    state
        .repo::<M>()
        .get_expanded(&id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(not_found::<M>)
}

/// POST /api/<collection>
pub async fn create<M: Model>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<Document> {
    let repo = state.repo::<M>();
    let saved = repo.create(body).await?;

    tracing::info!(
        "{} created {} {}",
        user.username,
        M::COLLECTION,
        document_id(&saved).unwrap_or_default()
    );
    Ok(ApiResponse::created(repo.expand_one(saved).await?))
}

/// PUT /api/<collection>/:id - partial update
pub async fn update<M: Model>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<Value>,
) -> ApiResult<Document> {
    let repo = state.repo::<M>();
    let Some(updated) = repo.update(&id, patch).await? else {
        return Err(not_found::<M>());
    };

    tracing::info!("{} updated {} {}", user.username, M::COLLECTION, id);
    Ok(ApiResponse::success(repo.expand_one(updated).await?))
}

/// DELETE /api/<collection>/:id
pub async fn delete<M: Model>(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    if state.repo::<M>().delete(&id).await?.is_none() {
        return Err(not_found::<M>());
    }

    tracing::info!("{} deleted {} {}", user.username, M::COLLECTION, id);
    Ok(ApiResponse::success(json!({
        "message": format!("{} deleted", M::LABEL),
        "id": id,
    })))
}
