//! In-memory cache of registry lookups
//!
//! Entries are keyed by package manager and lowercase package name. Expiry
//! is checked lazily on every read, and an optional background sweeper
//! removes expired entries periodically. Inserting past capacity evicts the
//! oldest entries first.

use crate::domain::{PackageManager, PackageVersionInfo};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

/// TTL for successful lookups
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL for failed lookups
pub const DEFAULT_ERROR_TTL: Duration = Duration::from_secs(2 * 60);

/// Maximum number of cached packages
pub const DEFAULT_MAX_ENTRIES: usize = 500;

/// Interval of the background sweep
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Expiry horizon used when `now + ttl` is not representable
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when advanced
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cache sizing and expiry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub error_ttl: Duration,
    pub max_entries: usize,
    pub cleanup_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            error_ttl: DEFAULT_ERROR_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

/// A cached lookup result
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: PackageVersionInfo,
    pub timestamp: Instant,
    pub expires_at: Instant,
    /// Insertion order, breaks timestamp ties during eviction
    seq: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Snapshot of cache occupancy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
    pub error: usize,
    pub success: usize,
    pub max: usize,
}

type CacheKey = (PackageManager, String);

/// Shared cache of `PackageVersionInfo` results
pub struct PackageCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    next_seq: AtomicU64,
}

impl PackageCache {
    /// Create a cache with default settings and the system clock
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with custom settings and the system clock
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with custom settings and clock
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
            clock,
            next_seq: AtomicU64::new(0),
        }
    }

    /// Returns the cache settings
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn key(manager: PackageManager, name: &str) -> CacheKey {
        (manager, name.to_lowercase())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a live entry, removing it if it has expired
    pub fn get(&self, manager: PackageManager, name: &str) -> Option<PackageVersionInfo> {
        let key = Self::key(manager, name);
        let now = self.clock.now();
        let mut entries = self.lock();

        match entries.get(&key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(&key);
                None
            }
            Some(entry) => Some(entry.data.clone()),
            None => None,
        }
    }

    /// Stores a lookup result, evicting the oldest entries while over capacity
    pub fn insert(&self, manager: PackageManager, name: &str, data: PackageVersionInfo) {
        let now = self.clock.now();
        let ttl = if data.is_error() {
            self.config.error_ttl
        } else {
            self.config.ttl
        };
        let entry = CacheEntry {
            data,
            timestamp: now,
            expires_at: expiry(now, ttl),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };

        let mut entries = self.lock();
        entries.insert(Self::key(manager, name), entry);

        while entries.len() > self.config.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| (e.timestamp, e.seq))
                .map(|(k, _)| k.clone());
            match oldest {
                Some(key) => {
                    debug!(package = %key.1, manager = %key.0, "Evicting cache entry");
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Removes an entry, returning true if one was present
    pub fn remove(&self, manager: PackageManager, name: &str) -> bool {
        self.lock().remove(&Self::key(manager, name)).is_some()
    }

    /// Removes every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all expired entries, returning how many were removed
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        before - entries.len()
    }

    /// Counts entries by freshness and outcome
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.lock();
        let mut stats = CacheStats {
            total: entries.len(),
            max: self.config.max_entries,
            ..CacheStats::default()
        };
        for entry in entries.values() {
            if entry.is_expired(now) {
                stats.expired += 1;
            } else {
                stats.valid += 1;
            }
            if entry.data.is_error() {
                stats.error += 1;
            } else {
                stats.success += 1;
            }
        }
        stats
    }

    /// Starts the periodic sweep on the current tokio runtime
    ///
    /// The task only holds a weak reference, so it ends on its own once the
    /// cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let cache: Weak<Self> = Arc::downgrade(self);
        let period = self.config.cleanup_interval;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let removed = cache.sweep_expired();
                if removed > 0 {
                    debug!(removed, "Swept expired cache entries");
                }
            }
        });

        SweeperHandle { handle }
    }
}

impl Default for PackageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the background sweep task; aborts the task when dropped
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweep task
    pub fn stop(self) {
        self.handle.abort();
    }

    /// Returns true once the task has ended
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// `now + ttl`, saturating at a far-future instant
fn expiry(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with_clock(config: CacheConfig) -> (PackageCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (PackageCache::with_clock(config, clock.clone()), clock)
    }

    fn found(name: &str) -> PackageVersionInfo {
        PackageVersionInfo::found(name, "1.0.0")
    }

    #[test]
    fn test_get_is_case_insensitive_per_manager() {
        let cache = PackageCache::new();
        cache.insert(PackageManager::Pip, "Django", found("Django"));

        assert!(cache.get(PackageManager::Pip, "django").is_some());
        assert!(cache.get(PackageManager::Pip, "DJANGO").is_some());
        assert!(cache.get(PackageManager::Npm, "django").is_none());
    }

    #[test]
    fn test_success_and_error_ttls() {
        let (cache, clock) = cache_with_clock(CacheConfig::default());
        cache.insert(PackageManager::Npm, "ok", found("ok"));
        cache.insert(
            PackageManager::Npm,
            "bad",
            PackageVersionInfo::failed("bad", "Request timeout"),
        );

        clock.advance(Duration::from_secs(119));
        assert!(cache.get(PackageManager::Npm, "bad").is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get(PackageManager::Npm, "bad").is_none());
        assert!(cache.get(PackageManager::Npm, "ok").is_some());

        clock.advance(Duration::from_secs(180));
        assert!(cache.get(PackageManager::Npm, "ok").is_none());
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let config = CacheConfig {
            ttl: Duration::MAX,
            error_ttl: Duration::MAX,
            ..CacheConfig::default()
        };
        let (cache, clock) = cache_with_clock(config);
        cache.insert(PackageManager::Npm, "lodash", found("lodash"));
        cache.insert(
            PackageManager::Npm,
            "bad",
            PackageVersionInfo::failed("bad", "Package not found"),
        );

        clock.advance(Duration::from_secs(365 * 24 * 60 * 60));
        assert!(cache.get(PackageManager::Npm, "lodash").is_some());
        assert!(cache.get(PackageManager::Npm, "bad").is_some());
        assert_eq!(cache.sweep_expired(), 0);
    }

    #[test]
    fn test_expired_entry_is_removed_on_get() {
        let (cache, clock) = cache_with_clock(CacheConfig::default());
        cache.insert(PackageManager::Pub, "http", found("http"));
        clock.advance(DEFAULT_TTL);

        assert_eq!(cache.len(), 1);
        assert!(cache.get(PackageManager::Pub, "http").is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_eviction_removes_oldest_first() {
        let config = CacheConfig {
            max_entries: 3,
            ..CacheConfig::default()
        };
        let (cache, clock) = cache_with_clock(config);

        for name in ["a", "b", "c", "d", "e"] {
            cache.insert(PackageManager::Npm, name, found(name));
            clock.advance(Duration::from_millis(10));
            assert!(cache.len() <= 3);
        }

        assert_eq!(cache.len(), 3);
        assert!(cache.get(PackageManager::Npm, "a").is_none());
        assert!(cache.get(PackageManager::Npm, "b").is_none());
        assert!(cache.get(PackageManager::Npm, "c").is_some());
        assert!(cache.get(PackageManager::Npm, "e").is_some());
    }

    #[test]
    fn test_eviction_breaks_ties_by_insertion_order() {
        let config = CacheConfig {
            max_entries: 2,
            ..CacheConfig::default()
        };
        // Frozen clock: every entry has the same timestamp.
        let (cache, _clock) = cache_with_clock(config);
        for name in ["first", "second", "third"] {
            cache.insert(PackageManager::Npm, name, found(name));
        }

        assert!(cache.get(PackageManager::Npm, "first").is_none());
        assert!(cache.get(PackageManager::Npm, "second").is_some());
        assert!(cache.get(PackageManager::Npm, "third").is_some());
    }

    #[test]
    fn test_reinsert_refreshes_entry() {
        let (cache, clock) = cache_with_clock(CacheConfig::default());
        cache.insert(PackageManager::Npm, "a", found("a"));
        clock.advance(Duration::from_secs(200));
        cache.insert(PackageManager::Npm, "a", found("a"));
        clock.advance(Duration::from_secs(200));

        assert_eq!(cache.len(), 1);
        assert!(cache.get(PackageManager::Npm, "a").is_some());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = PackageCache::new();
        cache.insert(PackageManager::Npm, "a", found("a"));
        cache.insert(PackageManager::Npm, "b", found("b"));

        assert!(cache.remove(PackageManager::Npm, "A"));
        assert!(!cache.remove(PackageManager::Npm, "a"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sweep_and_stats() {
        let (cache, clock) = cache_with_clock(CacheConfig::default());
        cache.insert(PackageManager::Npm, "ok", found("ok"));
        cache.insert(
            PackageManager::Npm,
            "bad",
            PackageVersionInfo::failed("bad", "Package not found"),
        );
        clock.advance(Duration::from_secs(150));

        let stats = cache.stats();
        assert_eq!(
            stats,
            CacheStats {
                total: 2,
                valid: 1,
                expired: 1,
                error: 1,
                success: 1,
                max: DEFAULT_MAX_ENTRIES,
            }
        );

        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().error, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweeper_removes_expired_entries() {
        let cache = Arc::new(PackageCache::with_config(CacheConfig {
            ttl: Duration::from_millis(0),
            cleanup_interval: Duration::from_secs(60),
            ..CacheConfig::default()
        }));
        cache.insert(PackageManager::Npm, "a", found("a"));
        let handle = cache.spawn_sweeper();

        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert!(cache.is_empty());
        handle.stop();
    }

    #[tokio::test]
    async fn test_sweeper_ends_when_cache_dropped() {
        let cache = Arc::new(PackageCache::with_config(CacheConfig {
            cleanup_interval: Duration::from_millis(5),
            ..CacheConfig::default()
        }));
        let handle = cache.spawn_sweeper();
        drop(cache);

        for _ in 0..100 {
            if handle.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(handle.is_finished());
    }
}
