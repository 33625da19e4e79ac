use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use crate::types::{RawTransaction, TokenMetadata};

/// Thread-safe response cache for avoiding duplicate backend calls
///
/// Cloning shares the underlying map, so one cache can be handed to several
/// processors.
#[derive(Clone)]
pub struct ResponseCache<V> {
    name: &'static str,
    /// `None` means unbounded
    max_entries: Option<usize>,
    cache: Arc<Mutex<HashMap<String, V>>>,
    hits: Arc<Mutex<u64>>,
    misses: Arc<Mutex<u64>>,
}

/// Raw transactions keyed by txid
pub type TransactionCache = ResponseCache<RawTransaction>;

/// Genesis metadata keyed by token id
pub type TokenMetadataCache = ResponseCache<TokenMetadata>;

const TRANSACTION_CACHE_ENTRIES: usize = 10_000;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            max_entries: None,
            cache: Arc::new(Mutex::new(HashMap::new())),
            hits: Arc::new(Mutex::new(0)),
            misses: Arc::new(Mutex::new(0)),
        }
    }

    /// Bounded cache; a full cache evicts an arbitrary entry per insert
    pub fn bounded(name: &'static str, max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::new(name)
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let cache = lock(&self.cache);
        match cache.get(key) {
            Some(value) => {
                *lock(&self.hits) += 1;
                debug!("{} cache hit: {}", self.name, key);
                Some(value.clone())
            }
            None => {
                *lock(&self.misses) += 1;
                debug!("{} cache miss: {}", self.name, key);
                None
            }
        }
    }

    pub fn put(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut cache = lock(&self.cache);

        if let Some(max) = self.max_entries {
            if cache.len() >= max && !cache.contains_key(&key) {
                if let Some(evicted) = cache.keys().next().cloned() {
                    debug!("{} cache full, evicting {}", self.name, evicted);
                    cache.remove(&evicted);
                }
            }
        }

        debug!("{} cached: {}", self.name, key);
        cache.insert(key, value);
    }

    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            hits: *lock(&self.hits),
            misses: *lock(&self.misses),
        }
    }

    pub fn size(&self) -> usize {
        lock(&self.cache).len()
    }
}

#[cfg(test)]
impl<V: Clone> ResponseCache<V> {
    pub fn clear(&self) {
        lock(&self.cache).clear();
        *lock(&self.hits) = 0;
        *lock(&self.misses) = 0;
    }
}

impl Default for TransactionCache {
    fn default() -> Self {
        Self::bounded("transaction", TRANSACTION_CACHE_ENTRIES)
    }
}

impl Default for TokenMetadataCache {
    fn default() -> Self {
        Self::new("token metadata")
    }
}

/// Cache performance statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Calculate the cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            (self.hits as f64 / (self.hits + self.misses) as f64) * 100.0
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }
}
