use std::sync::Arc;
use anyhow::Result;
use tracing::{info, warn};

use crate::config::TranslateConfig;
use super::google::GoogleTranslateClient;
use super::interface::TranslateInterface;

/// Factory for creating translation backends
pub struct TranslateFactory;

impl TranslateFactory {
    /// Create the translator named by `translate.provider`
    ///
    /// The API key is captured here once; nothing downstream reads the
    /// environment.
    pub fn create_translator(config: &TranslateConfig) -> Result<Arc<dyn TranslateInterface>> {
        info!("Initializing translator: {}", config.provider);

        if config.api_key.is_empty() {
            warn!("No translation API key configured; requests will be rejected by the service");
        }

        match config.provider.as_str() {
            "google" => Ok(Arc::new(GoogleTranslateClient::new(
                config.endpoint.clone(),
                config.api_key.clone(),
            ))),
            other => anyhow::bail!("Unsupported translation provider: {}", other),
        }
    }
}
