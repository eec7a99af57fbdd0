//! Shared application state.

use std::sync::Arc;

use crate::domain::Registry;

/// State handed to every request handler.
///
/// Holds the one registry of the process; there is no other copy.
pub struct AppState {
    pub registry: Arc<Registry>,
}
