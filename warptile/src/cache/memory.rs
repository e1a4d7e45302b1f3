//! In-memory tile cache with FIFO eviction.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::bitmap::Bitmap;
use crate::cache::CacheStats;
use crate::request::CacheKey;

/// The cache type owned by a fetcher.
pub type TileCache = FifoCache<Arc<Bitmap>>;

/// Bounded map that evicts in insertion order.
///
/// When full, inserting a new key evicts exactly one entry: the one inserted
/// earliest among those still present. Reads do not affect eviction order.
///
/// Evicted and cleared values are dropped immediately; for `Arc<Bitmap>`
/// the pixel buffer is freed once no caller still holds a clone.
pub struct FifoCache<V> {
    entries: HashMap<CacheKey, V>,
    /// Keys oldest first
    order: VecDeque<CacheKey>,
    capacity: usize,
    stats: CacheStats,
}

impl<V: Clone> FifoCache<V> {
    /// Create a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is raised to one; configuration validation rejects
    /// zero before a fetcher gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            stats: CacheStats::new(capacity),
        }
    }

    /// Look up a value. Counts a hit or miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert a value.
    ///
    /// A new key at capacity first evicts the oldest entry. An existing key
    /// has its value replaced in place and keeps its position.
    ///
    /// Returns the key evicted to make room, if any.
    pub fn put(&mut self, key: CacheKey, value: V) -> Option<CacheKey> {
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = value;
            trace!(key = %key, "Replaced cached tile in place");
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        self.stats.record_insert();
        self.stats.update_entry_count(self.entries.len());

        evicted
    }

    /// Look up a value without touching hit/miss counters.
    pub fn peek(&self, key: &CacheKey) -> Option<V> {
        self.entries.get(key).cloned()
    }

    /// Check if a key exists without touching hit/miss counters.
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.order.clear();
        self.entries.clear();
        self.stats.record_eviction(count as u64);
        self.stats.update_entry_count(0);
        debug!(released = count, "Cleared tile cache");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys in eviction order, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &CacheKey> {
        self.order.iter()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Mutable access for counters the cache cannot observe itself.
    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    fn evict_oldest(&mut self) -> Option<CacheKey> {
        let key = self.order.pop_front()?;
        // Dropping the value here releases its buffer.
        drop(self.entries.remove(&key));
        self.stats.record_eviction(1);
        debug!(key = %key, capacity = self.capacity, "Evicted oldest tile");
        Some(key)
    }
}
