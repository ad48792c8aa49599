//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::UserRepository;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; the repository is the only shared resource
/// and provides its own atomicity, so no further synchronization exists
/// between requests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig, users: Arc<dyn UserRepository>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, users }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the user repository.
    #[must_use]
    pub fn users(&self) -> &dyn UserRepository {
        self.inner.users.as_ref()
    }
}
