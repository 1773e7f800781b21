//! Application state for the HTTP server.

use crate::config::SchedulerConfig;
use crate::db::TimetableStore;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: TimetableStore,
    pub config: std::sync::Arc<SchedulerConfig>,
}

impl AppState {
    pub fn new(store: TimetableStore, config: std::sync::Arc<SchedulerConfig>) -> Self {
        Self { store, config }
    }
}
