//! Sync engine policy.

use chrono::{DateTime, Duration, Utc};

use crate::config::CacheConfig;

/// Staleness window, bootstrap switch and cascade fan-out for the engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// A row is fresh while `now - updated_at <= stale_after`.
    pub stale_after: Duration,
    /// Seed the whole catalog when the store starts out empty.
    pub bootstrap_on_empty: bool,
    /// Max recipe detail fetches in flight for one category read.
    pub cascade_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::hours(24),
            bootstrap_on_empty: true,
            cascade_concurrency: 4,
        }
    }
}

impl From<&CacheConfig> for SyncConfig {
    fn from(cache: &CacheConfig) -> Self {
        Self {
            stale_after: Duration::hours(i64::from(cache.stale_after_hours)),
            bootstrap_on_empty: cache.bootstrap_on_empty,
            cascade_concurrency: cache.cascade_concurrency.max(1),
        }
    }
}

impl SyncConfig {
    /// Whether a row merged at `updated_at` is still fresh at `now`.
    pub fn is_fresh(&self, updated_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(updated_at) <= self.stale_after
    }

    /// Whether a set of rows is fresh. An empty set is never fresh; otherwise
    /// the oldest row decides.
    pub fn is_set_fresh(
        &self,
        stamps: impl IntoIterator<Item = DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        match stamps.into_iter().min() {
            Some(oldest) => self.is_fresh(oldest, now),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn merged() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_fresh_just_inside_window() {
        let config = SyncConfig::default();
        let now = merged() + Duration::hours(24) - Duration::seconds(1);
        assert!(config.is_fresh(merged(), now));
    }

    #[test]
    fn test_fresh_exactly_at_window() {
        let config = SyncConfig::default();
        let now = merged() + Duration::hours(24);
        assert!(config.is_fresh(merged(), now));
    }

    #[test]
    fn test_stale_just_outside_window() {
        let config = SyncConfig::default();
        let now = merged() + Duration::hours(24) + Duration::seconds(1);
        assert!(!config.is_fresh(merged(), now));
    }

    #[test]
    fn test_empty_set_is_stale() {
        let config = SyncConfig::default();
        assert!(!config.is_set_fresh(Vec::new(), merged()));
    }

    #[test]
    fn test_set_freshness_follows_oldest_row() {
        let config = SyncConfig::default();
        let now = merged() + Duration::hours(25);
        let stamps = vec![merged() + Duration::hours(20), merged()];
        assert!(!config.is_set_fresh(stamps, now));

        let stamps = vec![merged() + Duration::hours(20), merged() + Duration::hours(2)];
        assert!(config.is_set_fresh(stamps, now));
    }

    #[test]
    fn test_from_cache_config() {
        let cache = CacheConfig {
            stale_after_hours: 6,
            bootstrap_on_empty: false,
            cascade_concurrency: 0,
        };
        let config = SyncConfig::from(&cache);
        assert_eq!(config.stale_after, Duration::hours(6));
        assert!(!config.bootstrap_on_empty);
        assert_eq!(config.cascade_concurrency, 1);
    }
}
