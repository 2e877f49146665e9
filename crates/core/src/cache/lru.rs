//! In-memory LRU result cache with per-entry TTL.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use super::CacheKey;
use crate::{Error, MergedResult};

struct CacheEntry {
    value: Arc<MergedResult>,
    inserted_at: Instant,
    ttl: Duration,
    /// Recency stamp; also the entry's key in `LruState::recency`.
    tick: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) >= self.ttl
    }
}

#[derive(Default)]
struct LruState {
    entries: HashMap<CacheKey, CacheEntry>,
    recency: BTreeMap<u64, CacheKey>,
    next_tick: u64,
}

impl LruState {
    fn bump(&mut self) -> u64 {
        self.next_tick += 1;
        self.next_tick
    }

    fn touch(&mut self, key: &CacheKey) {
        let tick = self.bump();
        if let Some(entry) = self.entries.get_mut(key) {
            self.recency.remove(&entry.tick);
            entry.tick = tick;
            self.recency.insert(tick, key.clone());
        }
    }

    fn remove(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.recency.remove(&entry.tick);
        Some(entry)
    }

    fn evict_lru(&mut self) -> Option<CacheKey> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<CacheKey> =
            self.entries.iter().filter(|(_, entry)| entry.is_expired(now)).map(|(key, _)| key.clone()).collect();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }
}

/// Fixed-capacity cache of merged results.
///
/// Recency is updated on hits and on stores. Lookups that find an expired
/// entry remove it and report a miss. All state transitions happen under one
/// short-lived lock, so operations are linearizable.
pub struct ResultCache {
    state: Mutex<LruState>,
    capacity: usize,
    ttl: Duration,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { state: Mutex::new(LruState::default()), capacity: capacity.max(1), ttl }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruState>, Error> {
        self.state.lock().map_err(|_| Error::CacheFault("cache lock poisoned".into()))
    }

    /// Look up a result. A cache fault is logged and reported as a miss.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<MergedResult>> {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "cache lookup degraded to miss");
                return None;
            }
        };

        let now = Instant::now();
        let expired = state.entries.get(key)?.is_expired(now);
        if expired {
            state.remove(key);
            tracing::debug!(key = %key, "cache entry expired");
            return None;
        }

        state.touch(key);
        state.entries.get(key).map(|entry| Arc::clone(&entry.value))
    }

    /// Store a result under `key`, evicting the least recently used entry if full.
    ///
    /// A cache fault is logged and the store is skipped.
    pub fn put(&self, key: CacheKey, value: impl Into<Arc<MergedResult>>) {
        let mut state = match self.lock() {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "cache store skipped");
                return;
            }
        };

        let now = Instant::now();
        state.remove(&key);

        if state.entries.len() >= self.capacity {
            let purged = state.purge_expired(now);
            if purged > 0 {
                tracing::debug!(purged, "purged expired cache entries");
            }
        }

        while state.entries.len() >= self.capacity {
            match state.evict_lru() {
                Some(evicted) => tracing::debug!(key = %evicted, "evicted least recently used cache entry"),
                None => break,
            }
        }

        let tick = state.bump();
        state.recency.insert(tick, key.clone());
        state.entries.insert(key, CacheEntry { value: value.into(), inserted_at: now, ttl: self.ttl, tick });
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, Error> {
        let mut state = self.lock()?;
        let removed = state.entries.len();
        state.entries.clear();
        state.recency.clear();
        Ok(removed)
    }

    /// Number of stored entries, expired ones included until they are looked up.
    pub fn len(&self) -> usize {
        self.lock().map(|state| state.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish()
    }
}
