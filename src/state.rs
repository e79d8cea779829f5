use crate::config::Config;
use std::sync::Arc;

/// Shared, read-only request context. Uploads are never retained between requests.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
