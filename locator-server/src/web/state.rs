//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedTransport;
use crate::lrs::AnyTransport;
use crate::orchestrator::TranslationOrchestrator;

/// The orchestrator as wired by the server.
pub type Locator = TranslationOrchestrator<CachedTransport<AnyTransport>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub locator: Arc<Locator>,
}

impl AppState {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator: Arc::new(locator),
        }
    }
}
