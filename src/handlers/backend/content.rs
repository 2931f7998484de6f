// Public read endpoints and visitor registration served by the backend

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::database::models::{Book, EventStatus, PartyLiterasi, Visitor};
use crate::database::store::{Collection, Document};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

fn is_public(doc: &Document) -> bool {
    doc.get("isPublic") == Some(&Value::Bool(true))
}

fn is_draft(doc: &Document) -> bool {
    doc.get("status").and_then(Value::as_str) == Some(EventStatus::Draft.as_str())
}

/// Referenced documents the public site may see
fn publicly_visible(collection: Collection, doc: &Document) -> bool {
    match collection {
        Collection::Media => is_public(doc),
        Collection::PartyLiterasi => is_public(doc) && !is_draft(doc),
        _ => true,
    }
}

/// GET /api/public/party-literasi - published events, newest first
pub async fn party_literasi_list(State(state): State<AppState>) -> ApiResult<Vec<Document>> {
    let repo = state.repo::<PartyLiterasi>();

    let mut filter = Document::new();
    filter.insert("isPublic".to_string(), json!(true));
    let mut events = repo.list(&filter).await?;
    events.retain(|doc| !is_draft(doc));
    repo.expand_where(&mut events, publicly_visible).await?;

    Ok(ApiResponse::success(events))
}

/// GET /api/public/party-literasi/:id
pub async fn party_literasi_show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Document> {
    match state
        .repo::<PartyLiterasi>()
        .get_expanded_where(&id, publicly_visible)
        .await?
    {
        Some(event) if is_public(&event) => Ok(ApiResponse::success(event)),
        _ => Err(ApiError::not_found("Event not found")),
    }
}

/// GET /api/public/books
pub async fn books_list(State(state): State<AppState>) -> ApiResult<Vec<Document>> {
    let repo = state.repo::<Book>();
    let mut books = repo.list(&Document::new()).await?;
    repo.expand_where(&mut books, publicly_visible).await?;
    Ok(ApiResponse::success(books))
}

/// GET /api/public/books/:id
pub async fn book_show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Document> {
    state
        .repo::<Book>()
        .get_expanded_where(&id, publicly_visible)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("Book not found"))
}

/// POST /api/public/visitors
pub async fn visitor_register(State(state): State<AppState>, JsonBody(body): JsonBody<Value>) -> ApiResult<Document> {
    let visitor = state.repo::<Visitor>().create(body).await?;
    let name = visitor.get("name").and_then(Value::as_str).unwrap_or_default();
    tracing::info!("Registered visitor {}", name);
    Ok(ApiResponse::created(visitor))
}
