use std::sync::Arc;

use crate::config::AppConfig;
use crate::data::CharacterStore;

/// Shared by every request handler. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: CharacterStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: CharacterStore, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}
