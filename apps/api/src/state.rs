use std::sync::Arc;

use crate::extraction::ConfigStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Config persistence. Postgres in production; swapped for an in-memory
    /// store in router tests.
    pub store: Arc<dyn ConfigStore>,
}
