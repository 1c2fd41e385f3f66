//! Bounded LRU cache of playlist lookups.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};

use super::{Language, PlaylistEntry};

/// Cache key: the caller's mood label and language preference
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlaylistQueryKey {
    pub mood: String,
    pub language: Language,
}

impl PlaylistQueryKey {
    pub fn new(mood: impl Into<String>, language: Language) -> Self {
        Self {
            mood: mood.into(),
            language,
        }
    }
}

/// Playlist cache without expiry; entries live until evicted or invalidated
#[derive(Debug)]
pub struct PlaylistCache {
    cache: Cache<PlaylistQueryKey, Arc<Vec<PlaylistEntry>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PlaylistCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .eviction_policy(EvictionPolicy::lru())
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &PlaylistQueryKey) -> Option<Arc<Vec<PlaylistEntry>>> {
        let result = self.cache.get(key);
        if result.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    pub fn put(&self, key: PlaylistQueryKey, entries: Vec<PlaylistEntry>) {
        self.cache.insert(key, Arc::new(entries));
    }

    pub fn invalidate(&self, key: &PlaylistQueryKey) {
        self.cache.invalidate(key);
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            entry_count: self.cache.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: u64,
    pub hits: u64,
    pub misses: u64,
}
