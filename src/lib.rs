pub mod config;
pub mod crawl;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod rest;
pub mod session;

use std::sync::Arc;

use anyhow::{Context as _, Result};

use config::Config;
use llm::ModelClient;
use session::SessionStore;

/// Shared application state passed to every REST handler.
pub struct AppContext {
    pub config: Arc<Config>,
    /// The only shared mutable state in the daemon.
    pub store: SessionStore,
    pub model: ModelClient,
    /// Bounded-timeout client for instruction-document fetches.
    pub docs: reqwest::Client,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let model = ModelClient::new(config.api_key.clone(), config.model.clone())?;
        let docs = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .build()
            .context("failed to build document fetch client")?;
        Ok(Arc::new(Self {
            config: Arc::new(config),
            store: SessionStore::new(),
            model,
            docs,
        }))
    }
}
