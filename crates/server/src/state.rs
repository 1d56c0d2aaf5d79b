use ressipy_core::{Config, SyncEngine};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    engine: Arc<SyncEngine>,
}

impl AppState {
    pub fn new(config: Config, engine: Arc<SyncEngine>) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &SyncEngine {
        self.engine.as_ref()
    }
}
