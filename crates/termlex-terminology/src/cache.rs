//! Memoized lookup cache
//!
//! Size-bounded, idle-bounded cache with load-on-miss semantics, built on
//! moka. Entries are evicted once the cache exceeds its capacity or an entry
//! sits unused past the idle window, whichever fires first.
//!
//! A failed load is recorded as [`Lookup::Failed`] rather than being retried
//! or conflated with an empty value, so "the service answered with nothing"
//! and "the service did not answer" stay distinguishable to callers.
//! Concurrent misses on one key may each run their loader; loads are
//! idempotent reads, so duplicate work is harmless.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

/// Outcome of a memoized load.
#[derive(Debug)]
pub enum Lookup<V> {
    /// The load succeeded; the value may legitimately be empty.
    Found(Arc<V>),
    /// The load failed. Cached like any other outcome so one unresponsive
    /// key is not hammered on every access.
    Failed,
}

// Clones share the Arc; V itself need not be Clone.
impl<V> Clone for Lookup<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Found(value) => Self::Found(Arc::clone(value)),
            Self::Failed => Self::Failed,
        }
    }
}

impl<V> Lookup<V> {
    pub fn found(value: V) -> Self {
        Self::Found(Arc::new(value))
    }

    pub fn value(&self) -> Option<Arc<V>> {
        match self {
            Self::Found(value) => Some(Arc::clone(value)),
            Self::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// A memoizing cache over an async loader.
pub struct Memo<K, V> {
    inner: Cache<K, Lookup<V>>,
}

impl<K, V> Memo<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// `capacity` bounds total entries (least-recently-used evicted first);
    /// `idle` bounds how long an entry may go unaccessed.
    pub fn new(capacity: u64, idle: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Cached outcome for `key`, if present.
    pub async fn get(&self, key: &K) -> Option<Lookup<V>> {
        self.inner.get(key).await
    }

    /// Return the cached outcome for `key`, running `load` on a miss.
    ///
    /// The loader decides what is cacheable: `Ok(Lookup::Found)` and
    /// `Ok(Lookup::Failed)` are stored, while `Err` propagates without
    /// touching the cache (used for failures that must abort the caller,
    /// like authentication errors).
    pub async fn get_or_load<Fut, E>(&self, key: K, load: Fut) -> Result<Lookup<V>, E>
    where
        Fut: Future<Output = Result<Lookup<V>, E>>,
    {
        if let Some(hit) = self.inner.get(&key).await {
            return Ok(hit);
        }
        let outcome = load.await?;
        self.inner.insert(key, outcome.clone()).await;
        Ok(outcome)
    }

    pub async fn invalidate(&self, key: &K) {
        self.inner.invalidate(key).await;
    }

    /// Entry count after applying pending evictions; test and diagnostics use.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}
