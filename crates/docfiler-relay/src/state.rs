use std::sync::Arc;
use std::time::Duration;

use docfiler_core::Config;
use docfiler_core::model::{GeminiClient, ModelClient};

/// Shared application state accessible from all handlers. Immutable after
/// construction: requests share no mutable state with each other.
pub struct AppState {
    pub model: Arc<dyn ModelClient>,
    pub http: reqwest::Client,
    pub model_timeout: Duration,
}

impl AppState {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self {
            model,
            http: reqwest::Client::new(),
            model_timeout: Duration::from_secs(60),
        }
    }

    /// State backed by the real Gemini client.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(GeminiClient::new(config.api_key.clone())))
    }
}
