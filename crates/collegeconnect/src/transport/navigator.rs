//! Forced navigation seam.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::info;

/// Route the front end is sent to when the server rejects the credential.
pub const LOGIN_ROUTE: &str = "/login";

/// Moves the front end to another route.
///
/// The transport calls this from its 401 interceptor. Implementations must
/// not block; a browser shell would change location, a CLI records the
/// route and acts on it when the command finishes.
pub trait Navigator: Send + Sync + fmt::Debug {
    fn navigate(&self, route: &str);
}

/// Remembers every route it was asked to navigate to.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All routes navigated to, oldest first.
    pub fn routes(&self) -> Vec<String> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent route, if any.
    pub fn last(&self) -> Option<String> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        info!(route, "Navigating");
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route.to_string());
    }
}

/// Only logs navigation requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: &str) {
        info!(route, "Navigation requested");
    }
}
