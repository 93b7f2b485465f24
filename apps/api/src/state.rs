use std::sync::Arc;

use crate::config::Config;
use crate::store::IdeaStore;
use crate::votes::ledger::DayBoundary;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable persistence. Default: PgIdeaStore.
    pub store: Arc<dyn IdeaStore>,
    pub config: Config,
    pub day_boundary: DayBoundary,
}
