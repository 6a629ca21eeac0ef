//! LruCache: fixed-capacity key cache with least-recently-used eviction

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, InvariantError, Result};
use crate::recency::{Handle, Iter, RecencyList};
use crate::stats::CacheStats;

/// Most slots reserved up front; larger caches grow on demand
const MAX_PREALLOC: usize = 1024;

/// Outcome of a `read` or `write`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// The key was resident
    Hit,
    /// The key was not resident
    Miss,
}

impl Access {
    /// `true` for [`Access::Hit`]
    pub fn is_hit(self) -> bool {
        matches!(self, Access::Hit)
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Hit => f.write_str("HIT"),
            Access::Miss => f.write_str("MISS"),
        }
    }
}

/// LRU cache of keys with fixed capacity
///
/// `write` populates the cache; `read` only probes it. Both promote a
/// resident key to the most-recently-used position.
pub struct LruCache<K> {
    /// Key -> entry in the recency list
    map: HashMap<K, Handle, RandomState>,

    /// Resident keys, least recently used first
    list: RecencyList<K>,

    /// Hit/miss counters since last reset
    stats: CacheStats,

    /// Maximum number of resident keys
    capacity: usize,
}

impl<K> LruCache<K>
where
    K: Hash + Eq + Clone,
{
    /// Create a new cache holding at most `capacity` keys
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` - if `capacity` is zero
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let prealloc = capacity.min(MAX_PREALLOC);
        Ok(Self {
            map: HashMap::with_capacity_and_hasher(prealloc, RandomState::new()),
            list: RecencyList::with_capacity(prealloc),
            stats: CacheStats::new(),
            capacity,
        })
    }

    /// Write a key: promote it on a hit, insert it on a miss
    ///
    /// A miss on a full cache evicts the least recently used key first.
    pub fn write(&mut self, key: K) -> Access {
        if let Some(&handle) = self.map.get(&key) {
            self.list.move_to_back(handle);
            self.stats.record_hit();
            return Access::Hit;
        }

        if self.map.len() >= self.capacity {
            self.evict();
        }

        let handle = self.list.append_back(key.clone());
        self.map.insert(key, handle);
        self.stats.record_insert();
        self.stats.record_miss();
        Access::Miss
    }

    /// Read a key: promote it on a hit, leave the cache untouched on a miss
    pub fn read<Q>(&mut self, key: &Q) -> Access
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.map.get(key) {
            Some(&handle) => {
                self.list.move_to_back(handle);
                self.stats.record_hit();
                Access::Hit
            }
            None => {
                self.stats.record_miss();
                Access::Miss
            }
        }
    }

    /// Check residency without promoting or counting
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Drop every key and zero the counters, keeping the capacity
    pub fn reset(&mut self) {
        self.map.clear();
        self.list.clear();
        self.stats.reset();
        debug!(capacity = self.capacity, "cache reset");
    }

    /// Reset and switch to a new capacity
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` - if `capacity` is zero; the cache is left as is
    pub fn reset_with_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let prealloc = capacity.min(MAX_PREALLOC);
        self.capacity = capacity;
        self.map = HashMap::with_capacity_and_hasher(prealloc, RandomState::new());
        self.list = RecencyList::with_capacity(prealloc);
        self.stats.reset();
        debug!(capacity, "cache reset with new capacity");
        Ok(())
    }

    /// Resident keys from least to most recently used
    pub fn contents(&self) -> Iter<'_, K> {
        self.list.iter()
    }

    /// Least recently used key, the next eviction candidate
    pub fn lru(&self) -> Option<&K> {
        self.list.front()
    }

    /// Most recently used key
    pub fn mru(&self) -> Option<&K> {
        self.list.back()
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Hits since last reset
    pub fn hits(&self) -> u64 {
        self.stats.hits()
    }

    /// Misses since last reset
    pub fn misses(&self) -> u64 {
        self.stats.misses()
    }

    /// Number of resident keys
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if no key is resident
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Check if the next write miss will evict
    pub fn is_full(&self) -> bool {
        self.map.len() >= self.capacity
    }

    /// Maximum number of resident keys
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Verify the map and the recency list still describe the same key set
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }

        if self.map.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "map holds {} keys but list holds {}",
                self.map.len(),
                self.list.len()
            )));
        }

        for (key, &handle) in &self.map {
            if self.list.get(handle) != Some(key) {
                return Err(InvariantError::new(format!(
                    "{:?} does not resolve to its key",
                    handle
                )));
            }
        }

        let mut seen = HashSet::with_capacity(self.list.len());
        for key in self.list.iter() {
            if !seen.insert(key) {
                return Err(InvariantError::new("duplicate key in recency list"));
            }
            if !self.map.contains_key(key) {
                return Err(InvariantError::new("recency list key missing from map"));
            }
        }

        Ok(())
    }

    fn evict(&mut self) {
        if let Some(key) = self.list.remove_front() {
            self.map.remove(&key);
            self.stats.record_eviction();
            trace!(len = self.map.len(), "evicted least recently used key");
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for LruCache<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("contents", &self.list)
            .field("stats", &self.stats)
            .finish()
    }
}
