//! Process-lifetime cache of parsed outlook records.
//!
//! Each [`ResourceKey`] owns an async once-cell. The key map lock is held
//! only long enough to find or insert the cell, so concurrent callers for
//! the same key wait on one producer while other keys proceed independently.
//! Stored entries are never evicted. A failed producer publishes nothing,
//! its empty cell is dropped from the map and the next caller retries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use metrics::counter;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use outlook_common::{GeometryRecord, OutlookResult, ResourceKey};

/// Materialized records shared by every reader of a cache entry.
pub type Records = Arc<[GeometryRecord]>;

/// Statistics for the record cache
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl RecordCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Memoizes fetch-and-parse per resource key.
#[derive(Default)]
pub struct RecordCache {
    entries: Mutex<HashMap<ResourceKey, Arc<OnceCell<Records>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored records for `key`, running `producer` only if none are stored yet.
    ///
    /// A lookup counts as a miss only when its own producer runs. Callers that
    /// wait on another caller's producer and receive its records count as hits.
    pub async fn get_or_fetch<F, Fut>(&self, key: ResourceKey, producer: F) -> OutlookResult<Records>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = OutlookResult<Vec<GeometryRecord>>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(key).or_default().clone()
        };

        if let Some(records) = cell.get() {
            self.record_hit(&key, records);
            return Ok(records.clone());
        }

        let mut produced = false;
        let result = cell
            .get_or_try_init(|| {
                produced = true;
                self.misses.fetch_add(1, Ordering::Relaxed);
                counter!("outlook_cache_misses_total").increment(1);
                debug!(key = %key, "Record cache miss");
                async move { producer().await.map(Records::from) }
            })
            .await;

        match result {
            Ok(records) => {
                if !produced {
                    self.record_hit(&key, records);
                }
                Ok(records.clone())
            }
            Err(e) => {
                self.discard_empty(&key, &cell).await;
                Err(e)
            }
        }
    }

    fn record_hit(&self, key: &ResourceKey, records: &Records) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("outlook_cache_hits_total").increment(1);
        debug!(key = %key, records = records.len(), "Record cache hit");
    }

    /// Drops the map entry for a cell whose producer failed, unless another
    /// caller still holds the cell or has since filled it.
    async fn discard_empty(&self, key: &ResourceKey, cell: &Arc<OnceCell<Records>>) {
        let mut entries = self.entries.lock().await;
        let unshared = entries
            .get(key)
            .is_some_and(|stored| Arc::ptr_eq(stored, cell) && Arc::strong_count(cell) == 2);
        if unshared && !cell.initialized() {
            entries.remove(key);
        }
    }

    /// Stored records for `key` without producing or counting a lookup.
    pub async fn peek(&self, key: &ResourceKey) -> Option<Records> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of keys with stored records.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn stats(&self) -> RecordCacheStats {
        RecordCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len().await,
        }
    }
}
