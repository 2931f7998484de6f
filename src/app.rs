use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::database::models::{Book, Media, MediaTbyt, PartyLiterasi, UiMedia, Visitor};
use crate::error::ApiError;
use crate::handlers::{admin, backend, public, system};
use crate::middleware::{page_gate, session_gate};
use crate::state::AppState;
use crate::types::ServiceRole;

/// Router for the given role
pub fn router(role: ServiceRole, state: AppState) -> Router {
    match role {
        ServiceRole::Backend => backend_app(state),
        ServiceRole::Admin => admin_app(state),
        ServiceRole::Public => public_app(state),
    }
}

pub fn backend_app(state: AppState) -> Router {
    use backend::*;

    let routes = base_routes(ServiceRole::Backend)
        .route("/api/auth/login", post(login))
        .route("/api/public/party-literasi", get(party_literasi_list))
        .route("/api/public/party-literasi/:id", get(party_literasi_show))
        .route("/api/public/books", get(books_list))
        .route("/api/public/books/:id", get(book_show))
        .route("/api/public/visitors", post(visitor_register));

    with_common_layers(routes, &state.config.security).with_state(state)
}

pub fn admin_app(state: AppState) -> Router {
    let upload_limit = state.config.media.max_upload_bytes;

    let routes = base_routes(ServiceRole::Admin)
        // Identity
        .route("/api/auth/callback/credentials", post(admin::auth::callback))
        .route("/api/auth/session", get(admin::auth::session))
        .route("/api/auth/signout", post(admin::auth::signout))
        .route("/login", get(admin::pages::login))
        // Session-gated
        .merge(admin_api_routes(&state))
        .merge(dashboard_routes(&state))
        .layer(DefaultBodyLimit::max(upload_limit));

    with_common_layers(routes, &state.config.security).with_state(state)
}

pub fn public_app(state: AppState) -> Router {
    let routes = base_routes(ServiceRole::Public)
        // Direct store reads
        .route("/api/ui-media", get(public::media::ui_media_by_location))
        .route("/api/media", get(public::media::media_list))
        // Forwarded to the backend
        .route("/api/party-literasi", get(public::proxy::party_literasi_list))
        .route("/api/party-literasi/:id", get(public::proxy::party_literasi_show))
        .route("/api/books", get(public::proxy::books_list))
        .route("/api/books/:id", get(public::proxy::book_show))
        .route("/api/visitors", post(public::proxy::visitor_register));

    with_common_layers(routes, &state.config.security).with_state(state)
}

fn base_routes(role: ServiceRole) -> Router<AppState> {
    Router::new()
        .route("/", get(move || system::root(role)))
        .route("/health", get(system::health))
}

fn admin_api_routes(state: &AppState) -> Router<AppState> {
    use admin::resource::{create, delete, list, show, update};

    Router::new()
        .route("/api/media", get(list::<Media>).post(admin::upload::media))
        .route(
            "/api/media/:id",
            get(show::<Media>).put(update::<Media>).delete(delete::<Media>),
        )
        .route("/api/ui-media", get(list::<UiMedia>).post(admin::upload::ui_media))
        .route("/api/ui-media/:id", get(show::<UiMedia>).delete(delete::<UiMedia>))
        .route("/api/media-tbyt", get(list::<MediaTbyt>).post(create::<MediaTbyt>))
        .route(
            "/api/media-tbyt/:id",
            get(show::<MediaTbyt>).put(update::<MediaTbyt>).delete(delete::<MediaTbyt>),
        )
        .route(
            "/api/party-literasi",
            get(list::<PartyLiterasi>).post(create::<PartyLiterasi>),
        )
        .route(
            "/api/party-literasi/:id",
            get(show::<PartyLiterasi>)
                .put(update::<PartyLiterasi>)
                .delete(delete::<PartyLiterasi>),
        )
        .route("/api/books", get(list::<Book>).post(create::<Book>))
        .route(
            "/api/books/:id",
            get(show::<Book>).put(update::<Book>).delete(delete::<Book>),
        )
        .route("/api/visitors", get(list::<Visitor>))
        .route("/api/visitors/:id", get(show::<Visitor>).delete(delete::<Visitor>))
        .route("/api/users", get(admin::users::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), session_gate))
}

fn dashboard_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::pages::dashboard))
        .route("/dashboard/*section", get(admin::pages::dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), page_gate))
}

fn with_common_layers(router: Router<AppState>, security: &SecurityConfig) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(security))
            .layer(CatchPanicLayer::custom(handle_panic)),
    )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    let error = ApiError::internal_server_error("Internal server error");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error.to_json())).into_response()
}
