use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::types::ServiceRole;

/// GET / - service description for the given role
pub async fn root(role: ServiceRole) -> Json<Value> {
    let endpoints = match role {
        ServiceRole::Backend => json!({
            "login": "/api/auth/login (public)",
            "party_literasi": "/api/public/party-literasi[/:id] (public)",
            "books": "/api/public/books[/:id] (public)",
            "visitors": "/api/public/visitors (public, POST)",
        }),
        ServiceRole::Admin => json!({
            "auth": "/api/auth/callback/credentials, /api/auth/session, /api/auth/signout",
            "media": "/api/media[/:id] (session)",
            "ui_media": "/api/ui-media[/:id] (session)",
            "media_tbyt": "/api/media-tbyt[/:id] (session)",
            "party_literasi": "/api/party-literasi[/:id] (session)",
            "books": "/api/books[/:id] (session)",
            "visitors": "/api/visitors[/:id] (session)",
            "users": "/api/users (session, admin)",
            "pages": "/login, /dashboard[/*section]",
        }),
        ServiceRole::Public => json!({
            "ui_media": "/api/ui-media?locationId=&index=",
            "media": "/api/media",
            "party_literasi": "/api/party-literasi[/:id]",
            "books": "/api/books[/:id]",
            "visitors": "/api/visitors (POST)",
        }),
    };

    Json(json!({
        "success": true,
        "data": {
            "name": "Museum CMS",
            "role": role.as_str(),
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": endpoints,
        }
    }))
}

/// GET /health - store reachability
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
