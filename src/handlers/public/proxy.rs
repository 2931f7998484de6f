// Public routes the site does not serve itself: forwarded to the backend
// under /api/public with the backend's status and body passed through.

use axum::{
    extract::{Path, RawQuery, State},
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

async fn relay(
    state: &AppState,
    method: Method,
    path: &str,
    query: Option<&str>,
    body: Option<&Value>,
) -> Result<Response, ApiError> {
    match state.backend.forward(method.clone(), path, query, body).await {
        Ok((status, body)) => Ok((status, Json(body)).into_response()),
        Err(e) => {
            tracing::warn!("Proxy {} {} failed: {}", method, path, e);
            Err(e.into())
        }
    }
}

fn segment(id: &str) -> String {
    url::form_urlencoded::byte_serialize(id.as_bytes()).collect()
}

/// GET /api/party-literasi
pub async fn party_literasi_list(State(state): State<AppState>, RawQuery(query): RawQuery) -> Result<Response, ApiError> {
    relay(&state, Method::GET, "/api/public/party-literasi", query.as_deref(), None).await
}

/// GET /api/party-literasi/:id
pub async fn party_literasi_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let path = format!("/api/public/party-literasi/{}", segment(&id));
    relay(&state, Method::GET, &path, query.as_deref(), None).await
}

/// GET /api/books
pub async fn books_list(State(state): State<AppState>, RawQuery(query): RawQuery) -> Result<Response, ApiError> {
    relay(&state, Method::GET, "/api/public/books", query.as_deref(), None).await
}

/// GET /api/books/:id
pub async fn book_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    let path = format!("/api/public/books/{}", segment(&id));
    relay(&state, Method::GET, &path, query.as_deref(), None).await
}

/// POST /api/visitors
pub async fn visitor_register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Response, ApiError> {
    relay(&state, Method::POST, "/api/public/visitors", None, Some(&body)).await
}
