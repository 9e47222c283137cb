//! Cached facet choice lists
//!
//! Choice lists hit several vocabulary tables per render, so they sit
//! behind a small TTL'd LRU. The cache is best-effort: lock contention or
//! a stale entry just means computing the list directly. Correctness never
//! depends on a hit.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;
use serde::Serialize;
use tracing::trace;

use crate::error::Result;

/// One selectable facet value with its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Turn a static (value, label) table into owned choices.
pub fn choices_from_pairs(pairs: &[(&str, &str)]) -> Vec<Choice> {
    pairs
        .iter()
        .map(|(value, label)| Choice::new(*value, *label))
        .collect()
}

#[derive(Debug, Clone)]
struct CachedList {
    choices: Vec<Choice>,
    cached_at: Instant,
}

/// Cache counters, cumulative since construction.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// TTL'd LRU of computed choice lists, keyed by facet name.
pub struct ChoiceCache {
    entries: Mutex<LruCache<String, CachedList>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ChoiceCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached list for `key`, computing and storing it on a
    /// miss. A contended lock skips the cache entirely.
    pub fn get_or_compute<F>(&self, key: &str, compute: F) -> Result<Vec<Choice>>
    where
        F: FnOnce() -> Result<Vec<Choice>>,
    {
        if let Ok(mut entries) = self.entries.try_lock() {
            if let Some(cached) = entries.get(key) {
                if cached.cached_at.elapsed() < self.ttl {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    trace!(key, "choice cache hit");
                    return Ok(cached.choices.clone());
                }
                entries.pop(key);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let choices = compute()?;
        if let Ok(mut entries) = self.entries.try_lock() {
            entries.put(
                key.to_string(),
                CachedList {
                    choices: choices.clone(),
                    cached_at: Instant::now(),
                },
            );
        }
        Ok(choices)
    }

    /// Drop one entry, e.g. after a vocabulary edit.
    pub fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.try_lock() {
            entries.pop(key);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.try_lock() {
            entries.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for ChoiceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChoiceCache")
            .field("ttl", &self.ttl)
            .field("stats", &self.stats())
            .finish()
    }
}
