//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::PlanCache;
use crate::network::NetworkModel;
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// The network model is loaded once and never mutated, so handlers share it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    /// Route graph and shortest paths
    pub model: Arc<NetworkModel>,

    /// Planner configuration
    pub config: Arc<PlannerConfig>,

    /// Finished searches
    pub cache: Arc<PlanCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(model: NetworkModel, config: PlannerConfig, cache: PlanCache) -> Self {
        Self {
            model: Arc::new(model),
            config: Arc::new(config),
            cache: Arc::new(cache),
        }
    }
}
