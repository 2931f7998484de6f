#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use museum_cms::auth::session::issue_session;
use museum_cms::auth::SessionUser;
use museum_cms::config::AppConfig;
use museum_cms::database::models::{Role, User};
use museum_cms::database::{Collection, DocumentStore, MemoryDocumentStore, Repository};
use museum_cms::services::{MediaError, MediaHost, UploadFile, UploadedAsset};
use museum_cms::state::AppState;

pub const HOSTED_URL: &str = "https://res.cloudinary.com/demo/image/upload/v1/museum/asset.png";

/// Media host double that records what it was sent
#[derive(Default)]
pub struct StubMediaHost {
    pub uploads: AtomicUsize,
}

impl StubMediaHost {
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaHost for StubMediaHost {
    async fn upload(&self, file: UploadFile) -> Result<UploadedAsset, MediaError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(UploadedAsset {
            url: HOSTED_URL.to_string(),
            thumbnail_url: HOSTED_URL.replacen("/upload/", "/upload/c_fill,w_300,h_300/", 1),
            public_id: format!("museum/{}", file.file_name.unwrap_or_else(|| "asset".to_string())),
        })
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    // Nothing listens on the discard port; tests that need a backend point this at one
    config.backend.url = "http://127.0.0.1:9".to_string();
    config.backend.timeout_ms = 2_000;
    config
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<dyn DocumentStore>,
    pub media_host: Arc<StubMediaHost>,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Result<Self> {
        Self::sharing_store(config, Arc::new(MemoryDocumentStore::new()))
    }

    /// A second role over the same store, as the deployed services share one database
    pub fn sharing_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let media_host = Arc::new(StubMediaHost::default());
        let state = AppState::with_services(config, store.clone(), media_host.clone(), reqwest::Client::new())?;
        Ok(Self {
            state,
            store,
            media_host,
        })
    }

    pub fn backend(&self) -> Router {
        museum_cms::app::backend_app(self.state.clone())
    }

    pub fn admin(&self) -> Router {
        museum_cms::app::admin_app(self.state.clone())
    }

    pub fn public(&self) -> Router {
        museum_cms::app::public_app(self.state.clone())
    }

    pub fn repo<M: museum_cms::database::models::Model>(&self) -> Repository<M> {
        Repository::new(self.store.clone())
    }

    /// `Cookie` header value carrying a session for `role`
    pub fn session_cookie(&self, role: Role) -> Result<String> {
        let security = &self.state.config.security;
        let user = SessionUser {
            id: format!("{}-id", role),
            username: format!("{}-user", role),
            role,
            organization: Some("Museum Kota".to_string()),
        };
        let token = issue_session(&user, "access-token".to_string(), &security.session_secret, 1)?;
        Ok(format!("{}={}", security.session_cookie, token))
    }

    pub async fn seed_user(&self, username: &str, password: &str, role: Role) -> Result<()> {
        let user = User {
            username: username.to_string(),
            password: bcrypt::hash(password, 4)?,
            role,
            organization: Some("Museum Kota".to_string()),
        };
        self.repo::<User>().insert(&user).await?;
        Ok(())
    }

    /// Document count of every collection, for no-side-effect checks
    pub async fn counts(&self) -> Result<Vec<u64>> {
        let mut counts = Vec::new();
        for collection in Collection::ALL {
            counts.push(self.store.count(collection, &Default::default()).await?);
        }
        Ok(counts)
    }
}

pub fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value)?)
        }
        None => Body::empty(),
    };
    Ok(builder.body(body)?)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

/// Drive a router in-process and decode the JSON body (`null` when empty)
pub async fn send(router: &Router, request: Request<Body>) -> Result<TestResponse> {
    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
    };
    Ok(TestResponse { status, headers, body })
}

pub async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> Result<TestResponse> {
    send(router, request(Method::GET, uri, cookie, None)?).await
}

pub async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Value,
) -> Result<TestResponse> {
    send(router, request(method, uri, cookie, Some(body))?).await
}

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

/// Serve `router` on a free local port for the rest of the test
pub async fn spawn(router: Router) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
    })
}

pub fn id_of(doc: &Value) -> String {
    doc["_id"].as_str().unwrap_or_default().to_string()
}
