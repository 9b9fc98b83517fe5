//! Caching layer for planned itineraries.
//!
//! The feed never changes while the server runs, so an itinerary is fully
//! determined by its start time, its stops and the engine parameters. The
//! cache is keyed on exactly those; any difference in configuration gives a
//! separate entry.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::StopId;
use crate::feed::Feed;
use crate::planner::{Engine, EngineConfig, Itinerary, PlanError};
use crate::segments::SegmentMap;

/// Error from [`CachedPlanner::plan`].
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The blocking planning task panicked or was cancelled
    #[error("planning task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Cache key for itineraries.
///
/// Multipliers are stored by bit pattern so the key can be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    start: NaiveDateTime,
    stops: Vec<StopId>,
    multipliers: Vec<u64>,
    disembark_time_mins: u32,
    max_ferry_options: usize,
}

impl PlanKey {
    pub fn new(start: NaiveDateTime, stops: &[StopId], config: &EngineConfig) -> Self {
        Self {
            start,
            stops: stops.to_vec(),
            multipliers: config.drive_multipliers.iter().map(|m| m.to_bits()).collect(),
            disembark_time_mins: config.disembark_time_mins,
            max_ferry_options: config.max_ferry_options,
        }
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 1000,
        }
    }
}

/// Cache for planned itineraries.
pub struct ItineraryCache {
    itineraries: MokaCache<PlanKey, Arc<Itinerary>>,
}

impl ItineraryCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let itineraries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { itineraries }
    }

    /// Get a cached itinerary.
    pub async fn get(&self, key: &PlanKey) -> Option<Arc<Itinerary>> {
        self.itineraries.get(key).await
    }

    /// Insert an itinerary into the cache.
    pub async fn insert(&self, key: PlanKey, itinerary: Arc<Itinerary>) {
        self.itineraries.insert(key, itinerary).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.itineraries.entry_count()
    }
}

/// Itinerary planner with caching.
///
/// Owns the feed and road segments shared by all requests and caches
/// planned itineraries.
pub struct CachedPlanner {
    feed: Arc<Feed>,
    segments: Arc<SegmentMap>,
    cache: ItineraryCache,
}

impl CachedPlanner {
    /// Create a new cached planner.
    pub fn new(feed: Arc<Feed>, segments: Arc<SegmentMap>, cache_config: &CacheConfig) -> Self {
        Self {
            feed,
            segments,
            cache: ItineraryCache::new(cache_config),
        }
    }

    /// Plan a route, using the cache if available.
    ///
    /// Expansion runs on the blocking thread pool so a large tree does not
    /// stall the async workers.
    pub async fn plan(
        &self,
        config: &EngineConfig,
        start: NaiveDateTime,
        stops: &[StopId],
    ) -> Result<Arc<Itinerary>, PlannerError> {
        let key = PlanKey::new(start, stops, config);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(%start, stops = stops.len(), "itinerary cache hit");
            return Ok(cached);
        }

        let feed = Arc::clone(&self.feed);
        let segments = Arc::clone(&self.segments);
        let config = config.clone();
        let route = stops.to_vec();
        let itinerary = tokio::task::spawn_blocking(move || {
            Engine::new(feed.as_ref(), segments.as_ref(), &config).plan(start, &route)
        })
        .await??;
        let itinerary = Arc::new(itinerary);

        self.cache.insert(key, itinerary.clone()).await;

        Ok(itinerary)
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
