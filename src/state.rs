//! Shared application state for all routes.

use crate::config::ResolvedModel;
use crate::store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Process-wide store client; requests share it and hold no other mutable state.
    pub store: Arc<dyn DocumentStore>,
    pub model: Arc<ResolvedModel>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, model: ResolvedModel) -> Self {
        AppState {
            store,
            model: Arc::new(model),
        }
    }
}
