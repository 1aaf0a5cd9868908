use std::sync::Arc;
use rankbadge_core::{Config, RankBadger, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    badger: Arc<RankBadger>,
}

impl AppState {
    pub fn new(config: Config, badger: Arc<RankBadger>) -> Self {
        Self { config, badger }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// The resolver shared by every request, and with it the lookup cache.
    pub fn badger(&self) -> &Arc<RankBadger> {
        &self.badger
    }
}
