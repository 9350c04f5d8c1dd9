use crate::error::{AnalyzerError, Result};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

const DEFAULT_CAPACITY: usize = 256;

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Unique identifier of the schema source; prefixes every cache key.
    pub key: String,
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl CacheConfig {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Key-derived memoization shared by analyzers reading the same schema source.
///
/// A disabled cache never stores anything, so every lookup recomputes.
pub struct MemoCache {
    prefix: String,
    entries: Option<Mutex<LruCache<String, Entry>>>,
}

impl std::fmt::Debug for MemoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("prefix", &self.prefix)
            .field("enabled", &self.entries.is_some())
            .field("len", &self.len())
            .finish()
    }
}

impl MemoCache {
    pub fn new(config: CacheConfig) -> Result<Self> {
        if config.key.trim().is_empty() {
            return Err(AnalyzerError::MissingCacheKey);
        }
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            prefix: config.key,
            entries: Some(Mutex::new(LruCache::new(capacity))),
        })
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            prefix: String::new(),
            entries: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Full key for an operation, e.g. `mykey_shortest_role```right`.
    #[must_use]
    pub fn key(&self, operation: &str) -> String {
        format!("{}_{operation}", self.prefix)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.as_ref().is_some_and(|entries| {
            entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(key)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| {
            entries.lock().unwrap_or_else(PoisonError::into_inner).len()
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn fetch<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let entries = self.entries.as_ref()?;
        let entry = entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()?;
        entry.downcast::<T>().ok()
    }

    pub fn save<T: Any + Send + Sync>(&self, key: &str, value: Arc<T>) {
        if let Some(entries) = &self.entries {
            entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .put(key.to_string(), value);
        }
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    /// Errors are returned as-is and never cached.
    pub fn get_or_try_insert<T, F>(&self, key: &str, compute: F) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> Result<T>,
    {
        if let Some(hit) = self.fetch::<T>(key) {
            log::debug!("cache hit: {key}");
            return Ok(hit);
        }
        if self.is_enabled() {
            log::debug!("cache miss: {key}");
        }
        let value = Arc::new(compute()?);
        self.save(key, Arc::clone(&value));
        Ok(value)
    }
}

impl Default for MemoCache {
    fn default() -> Self {
        Self::disabled()
    }
}
