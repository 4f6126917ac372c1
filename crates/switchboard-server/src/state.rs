//! Shared state for the axum server.

use std::sync::Arc;
use std::time::Duration;

use switchboard_core::Dispatcher;

/// Shared state accessible by all API handlers.
pub struct AppStateInner {
    pub dispatcher: Dispatcher,
    pub server_name: String,
    /// Upper bound on a single dispatch, measured at the transport.
    pub request_timeout: Duration,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    pub fn new(dispatcher: Dispatcher, server_name: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            dispatcher,
            server_name: server_name.into(),
            request_timeout,
        }
    }
}
