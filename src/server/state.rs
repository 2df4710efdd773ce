//! Shared, process-wide state handed to every `axum` handler.

use std::sync::Arc;

use crate::{
    backends::{ModelClient, RuleClient},
    cache::Cache,
    chunker::Chunker,
    config::Config,
    pipeline::Pipeline,
};

/// The pipeline type the HTTP surface drives: real HTTP-backed clients for
/// both the rule backend and the model backend.
pub type AppPipeline = Pipeline<RuleClient, ModelClient>;

/// State shared across every route handler.
#[derive(Clone)]
pub struct AppState {
    /// The orchestrator.
    pub pipeline: Arc<AppPipeline>,
    /// Process-wide configuration.
    pub config: Arc<Config>,
    /// Response cache.
    pub cache: Arc<Cache>,
    /// Document chunker.
    pub chunker: Arc<Chunker>,
    /// End-to-end encryption service, present only when compiled in and
    /// enabled.
    #[cfg(feature = "encryption")]
    pub encryption: Option<Arc<crate::server::encryption::EncryptionService>>,
    /// Per-IP rate limiter, present only when compiled in and enabled.
    #[cfg(feature = "rate-limit")]
    pub rate_limiter: Option<Arc<crate::server::rate_limit::Limiter>>,
}

impl AppState {
    /// Build state from configuration, constructing the backend clients
    /// and ambient collaborators it describes.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let rule_client = RuleClient::new(&config.rule_backend);
        let model_client = ModelClient::new(&config.model_backend);
        let pipeline = Pipeline::new(rule_client, model_client);
        let cache = Cache::new(
            std::time::Duration::from_secs(config.cache_ttl_s),
            config.cache_max_entries,
        );
        let chunker = Chunker::new(config.chunk_size);

        #[cfg(feature = "encryption")]
        let encryption = if config.encryption.enabled {
            Some(Arc::new(
                crate::server::encryption::EncryptionService::from_config(&config.encryption),
            ))
        } else {
            None
        };

        #[cfg(feature = "rate-limit")]
        let rate_limiter = if config.rate_limit.enabled {
            Some(Arc::new(crate::server::rate_limit::Limiter::new(
                &config.rate_limit,
            )))
        } else {
            None
        };

        Self {
            pipeline: Arc::new(pipeline),
            config: Arc::new(config),
            cache: Arc::new(cache),
            chunker: Arc::new(chunker),
            #[cfg(feature = "encryption")]
            encryption,
            #[cfg(feature = "rate-limit")]
            rate_limiter,
        }
    }
}
