// Application state module
// Shared state handed by reference to every request handler

use crate::highscore::ScoreStore;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: ScoreStore,
}

impl AppState {
    /// Create `AppState` from loaded configuration
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            store: ScoreStore::new(&config.store),
        }
    }
}
