//! Application state shared across handlers

use std::sync::Arc;

use application::CommuteService;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Commute service for the next-event card
    pub commute_service: Arc<CommuteService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("commute_service", &self.commute_service)
            .field("environment", &self.config.environment())
            .finish_non_exhaustive()
    }
}
