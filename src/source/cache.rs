use crate::error::Result;
use crate::models::{CountRecord, FormFilter, GroupingDimension};
use crate::source::CountSource;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

type CacheKey = (GroupingDimension, FormFilter);

struct CacheEntry {
    records: Vec<CountRecord>,
    stored_at: Instant,
}

/// Wraps another count source and keeps its answers for `ttl`.
///
/// Entries are keyed by dimension and form filter. They go stale after the
/// TTL and can be dropped earlier with [`invalidate`](Self::invalidate) or
/// [`invalidate_all`](Self::invalidate_all). Failed fetches are not stored.
pub struct CachedCountSource<S> {
    inner: S,
    ttl: Duration,
    state: RwLock<CacheState>,
}

// Entries plus a generation bumped by every invalidation. A fetch only
// stores its result if no invalidation happened while it was running.
#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    generation: u64,
}

impl<S: CountSource> CachedCountSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            state: RwLock::new(CacheState::default()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub async fn invalidate(&self, dimension: GroupingDimension, form: &FormFilter) -> bool {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.entries.remove(&(dimension, form.clone())).is_some()
    }

    pub async fn invalidate_all(&self) {
        let mut state = self.state.write().await;
        state.generation += 1;
        state.entries.clear();
    }

    // Drop stale entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state
            .entries
            .retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);
        before - state.entries.len()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

#[async_trait]
impl<S: CountSource> CountSource for CachedCountSource<S> {
    async fn get_counts(
        &self,
        dimension: GroupingDimension,
        form: &FormFilter,
    ) -> Result<Vec<CountRecord>> {
        let key = (dimension, form.clone());
        let generation = {
            let state = self.state.read().await;
            if let Some(entry) = state.entries.get(&key) {
                if entry.stored_at.elapsed() < self.ttl {
                    debug!("Cache hit for {} counts ({})", dimension, form);
                    return Ok(entry.records.clone());
                }
            }
            state.generation
        };

        debug!("Cache miss for {} counts ({})", dimension, form);
        let records = self.inner.get_counts(dimension, form).await?;

        let mut state = self.state.write().await;
        if state.generation == generation {
            state.entries.insert(
                key,
                CacheEntry {
                    records: records.clone(),
                    stored_at: Instant::now(),
                },
            );
        } else {
            debug!("Cache invalidated during fetch of {} counts ({}), not storing", dimension, form);
        }
        Ok(records)
    }
}
