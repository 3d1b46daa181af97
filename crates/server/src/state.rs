//! Application state shared across handlers.

use std::sync::Arc;

use crate::services::CustomerService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the customer service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    customers: CustomerService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(customers: CustomerService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { customers }),
        }
    }

    /// Get a reference to the customer service.
    #[must_use]
    pub fn customers(&self) -> &CustomerService {
        &self.inner.customers
    }
}
