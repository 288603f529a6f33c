use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::model::RawTable;

/// Default time-to-live for a fetched source: ten minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Identifies one cached fetch: the source plus the sheet that was read.
pub type CacheKey = String;

#[derive(Debug, Clone)]
struct Entry {
    fetched: Instant,
    table: Arc<RawTable>,
}

/// Process-wide time-to-live map from source identifier to the raw table
/// fetched for it.
///
/// Only successful loads are stored. A failed load returns its error and
/// leaves whatever entry was already there in place.
#[derive(Debug)]
pub struct SourceCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl SourceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh entry for `key`, if any.
    fn get(&self, key: &str) -> Option<Arc<RawTable>> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Arc<RawTable>> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        if now.saturating_duration_since(entry.fetched) < self.ttl {
            Some(Arc::clone(&entry.table))
        } else {
            None
        }
    }

    /// Return the cached table for `key` when it is younger than the TTL,
    /// otherwise run `loader` and cache its result.
    pub fn get_or_load<E>(
        &self,
        key: &str,
        loader: impl FnOnce() -> Result<RawTable, E>,
    ) -> Result<Arc<RawTable>, E> {
        if let Some(table) = self.get(key) {
            log::debug!("cache hit for {key}");
            return Ok(table);
        }

        log::debug!("cache miss for {key}");
        let table = Arc::new(loader()?);
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                fetched: Instant::now(),
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop one entry so the next request refetches.
    pub fn invalidate(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
