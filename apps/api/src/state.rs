use std::sync::Arc;

use crate::generation::generator::GenerationService;
use crate::reports::store::ReportStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable report store. PostgreSQL when DATABASE_URL is set, in-memory otherwise.
    pub store: Arc<dyn ReportStore>,
    pub generator: GenerationService,
}
