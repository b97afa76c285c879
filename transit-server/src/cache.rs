//! Caching layer for trip searches.
//!
//! A widening search can run the planner many times, so finished searches
//! are cached. Coordinates are quantised before keying and planning, so
//! requests about a metre apart share an entry and get the same answer.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::geometry::Point;
use crate::planner::{Priority, WidenedSearch};

/// Cache key: quantised (source lat, source lon, destination lat,
/// destination lon) and the ranking priority.
pub type SearchKey = (i64, i64, i64, i64, Priority);

/// Cached search entry.
pub type SearchEntry = Arc<WidenedSearch>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,

    /// Decimal places of a degree kept in the key. Searches are planned
    /// from coordinates rounded to this precision.
    pub precision: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
            // ~1 m at the equator
            precision: 5,
        }
    }
}

/// Cache for widening search results.
pub struct PlanCache {
    searches: MokaCache<SearchKey, SearchEntry>,

    /// Multiplier applied to degrees before rounding.
    scale: f64,
}

impl PlanCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            searches,
            scale: 10f64.powi(config.precision.min(15) as i32),
        }
    }

    fn quantise(&self, degrees: f64) -> i64 {
        (degrees * self.scale).round() as i64
    }

    /// Rounds a point to the key's precision.
    ///
    /// Searches are planned from snapped points so that a cached entry is
    /// the same answer every request sharing its key would have got.
    pub fn snap(&self, point: Point) -> Point {
        Point::new(
            self.quantise(point.lat) as f64 / self.scale,
            self.quantise(point.lon) as f64 / self.scale,
        )
    }

    /// Compute the key for a search.
    pub fn key(&self, source: Point, destination: Point, priority: Priority) -> SearchKey {
        (
            self.quantise(source.lat),
            self.quantise(source.lon),
            self.quantise(destination.lat),
            self.quantise(destination.lon),
            priority,
        )
    }

    /// Get a cached search.
    pub async fn get(&self, key: &SearchKey) -> Option<SearchEntry> {
        self.searches.get(key).await
    }

    /// Insert a search into the cache.
    pub async fn insert(&self, key: SearchKey, entry: SearchEntry) {
        self.searches.insert(key, entry).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.searches.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.searches.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::PlanResult;

    fn search() -> WidenedSearch {
        WidenedSearch {
            result: PlanResult::empty(),
            source_radius_km: 0.5,
            destination_radius_km: 0.5,
            attempts: 1,
        }
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
        assert_eq!(config.precision, 5);
    }

    #[test]
    fn cache_creation() {
        let cache = PlanCache::new(&CacheConfig::default());
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn nearby_points_share_a_key() {
        let cache = PlanCache::new(&CacheConfig::default());
        let destination = Point::new(14.6, 121.0);

        let a = cache.key(Point::new(14.550001, 121.03), destination, Priority::Fare);
        let b = cache.key(Point::new(14.549999, 121.03), destination, Priority::Fare);
        let c = cache.key(Point::new(14.5501, 121.03), destination, Priority::Fare);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn priority_is_part_of_the_key() {
        let cache = PlanCache::new(&CacheConfig::default());
        let (s, d) = (Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert_ne!(
            cache.key(s, d, Priority::Fare),
            cache.key(s, d, Priority::Distance)
        );
    }

    #[test]
    fn snapped_points_keep_their_key() {
        let cache = PlanCache::new(&CacheConfig::default());
        let (source, destination) = (Point::new(14.5500049, 121.0312351), Point::new(-7.25, 112.75));

        let snapped = cache.snap(source);
        assert!((snapped.lat - 14.55).abs() < 1e-12);
        assert!((snapped.lon - 121.03124).abs() < 1e-12);
        assert_eq!(
            cache.key(snapped, destination, Priority::Fare),
            cache.key(source, destination, Priority::Fare)
        );
    }

    #[test]
    fn negative_coordinates_round_to_nearest() {
        let cache = PlanCache::new(&CacheConfig::default());
        let key = cache.key(Point::new(-0.000004, -0.000006), Point::new(0.0, 0.0), Priority::Fare);
        assert_eq!((key.0, key.1), (0, -1));
    }

    #[tokio::test]
    async fn insert_then_get() {
        let cache = PlanCache::new(&CacheConfig::default());
        let key = cache.key(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Priority::Transfers);

        assert!(cache.get(&key).await.is_none());
        cache.insert(key, Arc::new(search())).await;

        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached.attempts, 1);

        cache.invalidate_all();
        assert!(cache.get(&key).await.is_none());
    }
}
