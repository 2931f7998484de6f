use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{open_store, DocumentStore, Repository};
use crate::database::models::Model;
use crate::services::{BackendClient, CloudinaryHost, MediaHost};

/// Shared handles every router is built over
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub media_host: Arc<dyn MediaHost>,
    pub backend: BackendClient,
}

impl AppState {
    /// Wire the production services from configuration
    pub fn build(config: AppConfig) -> anyhow::Result<Self> {
        let store = open_store(&config.database)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("museum-cms/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let media_host = Arc::new(CloudinaryHost::new(http.clone(), config.media.clone()));

        Self::with_services(config, store, media_host, http)
    }

    /// Same as `build` but with the store and media host supplied by the caller
    pub fn with_services(
        config: AppConfig,
        store: Arc<dyn DocumentStore>,
        media_host: Arc<dyn MediaHost>,
        http: reqwest::Client,
    ) -> anyhow::Result<Self> {
        let backend = BackendClient::new(http, &config.backend)?;

        Ok(Self {
            config: Arc::new(config),
            store,
            media_host,
            backend,
        })
    }

    pub fn repo<M: Model>(&self) -> Repository<M> {
        Repository::new(self.store.clone())
    }
}
