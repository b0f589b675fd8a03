//! Bounded, time-expiring write cache
//!
//! [`WriteCache`] answers one question: "was this key marked recently?".
//! It is used to suppress downstream writes that would only repeat what the
//! store already has.
//!
//! # Design
//!
//! - FxHashMap: key → (expiry, recency tick)
//! - BTreeMap: recency tick → key, oldest first, for LRU eviction
//! - Expiry is lazy: an expired entry reads as absent and is dropped on access.
//!   There is no sweeper thread.
//!
//! # False negatives
//!
//! A key that was marked may later read as absent (evicted or expired). Callers
//! must treat a miss as "write again", never as "the write was lost".

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of the current instant for expiry checks
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Monotonic system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// Used to simulate TTL expiry without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Start at the current system instant
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

#[derive(Debug)]
struct Entry {
    /// `None` when the TTL runs past the clock's range
    expires_at: Option<Instant>,
    tick: u64,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: FxHashMap<String, Entry>,
    recency: BTreeMap<u64, String>,
    next_tick: u64,
}

impl Inner {
    fn bump(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.recency.remove(&entry.tick);
        }
    }

    /// Move `key` to the most-recent end
    fn promote(&mut self, key: &str) -> Option<&mut Entry> {
        let tick = self.bump();
        let entry = self.entries.get_mut(key)?;
        self.recency.remove(&entry.tick);
        entry.tick = tick;
        self.recency.insert(tick, key.to_owned());
        Some(entry)
    }

    fn evict_oldest(&mut self) {
        if let Some((_, key)) = self.recency.pop_first() {
            self.entries.remove(&key);
        }
    }
}

/// Concurrency-safe LRU set with per-entry TTL
///
/// # Thread Safety
///
/// All operations take a single internal mutex for the duration of one map
/// update. Calls from many writers may interleave freely.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tracestore_storage::WriteCache;
///
/// let cache = WriteCache::new(1024, Duration::from_secs(60));
/// assert!(!cache.contains("frontend|GET /"));
/// cache.mark("frontend|GET /");
/// assert!(cache.contains("frontend|GET /"));
/// ```
pub struct WriteCache {
    inner: Mutex<Inner>,
    capacity: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl WriteCache {
    /// Create a cache on the system clock
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    /// Create a cache reading time from `clock`
    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            capacity: capacity.max(1),
            ttl,
            clock,
        }
    }

    /// Whether `key` was marked within the TTL and has not been evicted
    ///
    /// A hit refreshes the key's recency but not its expiry.
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let expired = match inner.entries.get(key) {
            None => return false,
            Some(entry) => entry.is_expired(now),
        };
        if expired {
            inner.remove(key);
            return false;
        }
        inner.promote(key);
        true
    }

    /// Record `key` as written now
    ///
    /// Idempotent. Re-marking an existing key restarts its TTL. When the cache
    /// is full the least recently used key is evicted, expired or not. A TTL
    /// too long for the clock to represent never expires.
    pub fn mark(&self, key: &str) {
        let expires_at = self.clock.now().checked_add(self.ttl);
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.promote(key) {
            entry.expires_at = expires_at;
            return;
        }
        if inner.entries.len() >= self.capacity {
            inner.evict_oldest();
        }
        let tick = inner.bump();
        inner.entries.insert(key.to_owned(), Entry { expires_at, tick });
        inner.recency.insert(tick, key.to_owned());
    }

    /// Number of stored keys, including expired keys not yet touched
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether no keys are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of keys
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retention window of a marked key
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl fmt::Debug for WriteCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}
