//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::RoutePlanner;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Route planner over the loaded network
    pub planner: Arc<RoutePlanner>,
}

impl AppState {
    pub fn new(planner: RoutePlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}
