//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::UserStore;
use crate::services::RegistryService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: RegistryService,
}

impl AppState {
    /// Create a new application state over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                registry: RegistryService::new(store),
            }),
        }
    }

    /// Get a reference to the registry service.
    #[must_use]
    pub fn registry(&self) -> &RegistryService {
        &self.inner.registry
    }
}
