//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::{CacheConfig, CachedPlanner};
use crate::feed::Feed;
use crate::planner::EngineConfig;
use crate::segments::SegmentMap;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Feed, road segments and itinerary cache
    pub planner: Arc<CachedPlanner>,

    /// Default engine parameters
    pub config: Arc<EngineConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        feed: Feed,
        segments: SegmentMap,
        config: EngineConfig,
        cache_config: &CacheConfig,
    ) -> Self {
        let planner = CachedPlanner::new(Arc::new(feed), Arc::new(segments), cache_config);
        Self {
            planner: Arc::new(planner),
            config: Arc::new(config),
        }
    }

    pub fn feed(&self) -> &Feed {
        self.planner.feed()
    }
}
