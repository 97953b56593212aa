//! In-memory read-through pipeline.

use crate::cache::AliasCache;
use crate::error::PipelineError;
use crate::metrics::PipelineMetrics;
use crate::pipeline::{Pipeline, RecordStream};
use crate::source::RecordSource;
use anyhow::anyhow;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use rift_keys::{derive_from_query, derive_from_query_batch, derive_from_record, AliasKey};
use rift_types::{AttrValue, CatalogRecord, Query, QueryBatch};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, trace, warn};

/// A [`Pipeline`] backed by an [`AliasCache`] and a single [`RecordSource`].
///
/// Lookup flow per alias key: cache hit, else join the in-flight fetch for
/// that key if one exists, else fetch from the source. A fetched record is
/// stored under every alias it answers to before anyone sees it, which is
/// what makes a later lookup by a different alias converge on the cached
/// entry. `Ok(None)` from the source is handed to the caller and to any
/// coalesced waiters but never cached.
///
/// Cloning is cheap; clones share the cache, the in-flight registry, and
/// the metrics.
pub struct MemoryPipeline<R: CatalogRecord, S> {
    shared: Arc<PipelineShared<R, S>>,
}

struct PipelineShared<R: CatalogRecord, S> {
    source: S,
    cache: AliasCache<R>,
    inflight: Mutex<HashMap<AliasKey, Arc<InflightFetch<R>>>>,
    metrics: PipelineMetrics,
}

impl<R, S> MemoryPipeline<R, S>
where
    R: CatalogRecord,
    S: RecordSource<R> + 'static,
{
    pub fn new(source: S) -> Self {
        MemoryPipeline {
            shared: Arc::new(PipelineShared {
                source,
                cache: AliasCache::new(),
                inflight: Mutex::new(HashMap::new()),
                metrics: PipelineMetrics::default(),
            }),
        }
    }

    pub fn cache(&self) -> &AliasCache<R> {
        &self.shared.cache
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.shared.metrics
    }

    /// Lazy bulk resolution: each element goes through the scalar path as
    /// the stream is polled, so a partially-consumed stream only fetches
    /// what was consumed.
    fn stream_batch(&self, batch: &QueryBatch) -> Result<RecordStream<R>, PipelineError> {
        let pairs: Vec<(AliasKey, Query)> = derive_from_query_batch(R::DESCRIPTOR, batch)?
            .zip(batch.elements())
            .collect();
        let shared = Arc::clone(&self.shared);
        Ok(stream::iter(pairs)
            .then(move |(key, query)| {
                let shared = Arc::clone(&shared);
                async move { resolve(shared.as_ref(), key, &query).await }
            })
            .boxed())
    }

    /// Eager bulk resolution: cache hits are taken up front and the misses
    /// go upstream as one bulk fetch.
    async fn collect_batch(&self, batch: &QueryBatch) -> Result<RecordStream<R>, PipelineError> {
        let keys: Vec<AliasKey> = derive_from_query_batch(R::DESCRIPTOR, batch)?.collect();
        let shared = self.shared.as_ref();

        let mut slots: Vec<Option<Option<R>>> = vec![None; keys.len()];
        let mut missing: Vec<usize> = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            match shared.cache.get(key) {
                Some(hit) => {
                    shared.metrics.record_hit();
                    slots[i] = Some(Some(hit.as_ref().clone()));
                }
                None => {
                    shared.metrics.record_miss();
                    missing.push(i);
                }
            }
        }

        if !missing.is_empty() {
            let subset: Vec<AttrValue> = missing.iter().map(|i| batch.keys()[*i].clone()).collect();
            let sub_batch = QueryBatch::new(batch.shared().clone(), batch.key_attr(), subset);
            shared.metrics.record_bulk_fetch();
            debug!(
                entity = R::DESCRIPTOR.entity,
                requested = missing.len(),
                "bulk source fetch"
            );
            let fetched = shared
                .source
                .fetch_many(&sub_batch)
                .await
                .map_err(PipelineError::Upstream)?;
            if fetched.len() != missing.len() {
                return Err(PipelineError::Upstream(anyhow!(
                    "bulk source returned {} results for {} queries",
                    fetched.len(),
                    missing.len()
                )));
            }
            for (slot, found) in missing.into_iter().zip(fetched) {
                let stored = found.map(Arc::new);
                if let Some(record) = &stored {
                    store_fetched(shared, &keys[slot], record);
                }
                slots[slot] = Some(stored.map(|record| record.as_ref().clone()));
            }
        }

        let results: Vec<Result<Option<R>, PipelineError>> = slots
            .into_iter()
            .map(|slot| Ok(slot.unwrap_or(None)))
            .collect();
        Ok(stream::iter(results).boxed())
    }
}

#[async_trait]
impl<R, S> Pipeline<R> for MemoryPipeline<R, S>
where
    R: CatalogRecord,
    S: RecordSource<R> + 'static,
{
    async fn get(&self, query: &Query) -> Result<Option<R>, PipelineError> {
        let key = derive_from_query(R::DESCRIPTOR, query)?;
        resolve(self.shared.as_ref(), key, query).await
    }

    async fn get_many(
        &self,
        batch: &QueryBatch,
        streaming: bool,
    ) -> Result<RecordStream<R>, PipelineError> {
        if streaming {
            self.stream_batch(batch)
        } else {
            self.collect_batch(batch).await
        }
    }
}

impl<R: CatalogRecord, S> Clone for MemoryPipeline<R, S> {
    fn clone(&self) -> Self {
        MemoryPipeline {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: CatalogRecord, S> std::fmt::Debug for MemoryPipeline<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryPipeline")
            .field("entity", &R::DESCRIPTOR.entity)
            .field("cached_aliases", &self.shared.cache.len())
            .finish()
    }
}

/// Resolves one alias key through cache, in-flight registry, and source.
async fn resolve<R, S>(
    shared: &PipelineShared<R, S>,
    key: AliasKey,
    query: &Query,
) -> Result<Option<R>, PipelineError>
where
    R: CatalogRecord,
    S: RecordSource<R>,
{
    loop {
        if let Some(hit) = shared.cache.get(&key) {
            shared.metrics.record_hit();
            trace!(entity = R::DESCRIPTOR.entity, alias = %key, "cache hit");
            return Ok(Some(hit.as_ref().clone()));
        }

        let mut joined = None;
        let mut waiter = None;
        let slot = {
            let mut inflight = shared.inflight.lock();
            if let Some(existing) = inflight.get(&key).cloned() {
                shared.metrics.record_coalesced_wait();
                trace!(entity = R::DESCRIPTOR.entity, alias = %key, "joining in-flight fetch");
                let existing = &*joined.insert(existing);
                // Arm the waiter before releasing the registry lock so the
                // owner's wakeup cannot slip between our check and our wait.
                // The waiter is heap-pinned because the guard's lexical scope
                // must close before the await for the future to stay `Send`.
                let mut notified = Box::pin(existing.notify.notified());
                notified.as_mut().enable();
                waiter = Some(notified);
                None
            } else {
                let slot = Arc::new(InflightFetch::new());
                inflight.insert(key, Arc::clone(&slot));
                Some(slot)
            }
        };

        let slot = match slot {
            Some(slot) => slot,
            None => {
                waiter.expect("waiter accompanies a joined fetch").await;
                let existing = joined.expect("joined fetch recorded before waiting");
                match existing.outcome() {
                    Some(FetchOutcome::Resolved(found)) => {
                        return Ok(found.map(|record| record.as_ref().clone()));
                    }
                    // Fetch failed or the wake was spurious: race again.
                    _ => continue,
                }
            }
        };

        shared.metrics.record_miss();
        shared.metrics.record_source_fetch();
        let mut claim = FetchClaim {
            inflight: &shared.inflight,
            key,
            slot,
            armed: true,
        };
        debug!(entity = R::DESCRIPTOR.entity, alias = %key, "source fetch");
        match shared.source.fetch(query).await {
            Ok(found) => {
                let stored = found.map(Arc::new);
                if let Some(record) = &stored {
                    store_fetched(shared, &key, record);
                }
                claim.settle(FetchOutcome::Resolved(stored.clone()));
                return Ok(stored.map(|record| record.as_ref().clone()));
            }
            Err(err) => {
                claim.settle(FetchOutcome::Failed);
                debug!(entity = R::DESCRIPTOR.entity, alias = %key, "source fetch failed");
                return Err(PipelineError::Upstream(err));
            }
        }
    }
}

/// Writes a fetched record into the cache under every alias it answers to.
fn store_fetched<R, S>(shared: &PipelineShared<R, S>, requested: &AliasKey, record: &Arc<R>)
where
    R: CatalogRecord,
{
    match derive_from_record(R::DESCRIPTOR, record.as_ref()) {
        Ok(aliases) => {
            if !aliases.contains(requested) {
                warn!(
                    entity = R::DESCRIPTOR.entity,
                    requested = %requested,
                    "fetched record does not answer to the requested alias"
                );
            }
            let written = shared.cache.insert_all(&aliases, Arc::clone(record));
            shared.metrics.record_store(written as u64);
        }
        Err(err) => {
            warn!(
                entity = R::DESCRIPTOR.entity,
                %err,
                "fetched record has no identity; serving uncached"
            );
        }
    }
}

/// One in-flight fetch, shared between its owner and coalesced waiters.
/// The outcome is written before waiters are woken.
struct InflightFetch<R> {
    notify: Notify,
    outcome: Mutex<Option<FetchOutcome<R>>>,
}

impl<R> InflightFetch<R> {
    fn new() -> Self {
        InflightFetch {
            notify: Notify::new(),
            outcome: Mutex::new(None),
        }
    }

    fn outcome(&self) -> Option<FetchOutcome<R>> {
        self.outcome.lock().clone()
    }
}

enum FetchOutcome<R> {
    Resolved(Option<Arc<R>>),
    Failed,
}

impl<R> Clone for FetchOutcome<R> {
    fn clone(&self) -> Self {
        match self {
            FetchOutcome::Resolved(found) => FetchOutcome::Resolved(found.clone()),
            FetchOutcome::Failed => FetchOutcome::Failed,
        }
    }
}

/// Ownership of an in-flight fetch slot. Settling publishes the outcome,
/// deregisters the slot, and wakes waiters; dropping an unsettled claim
/// (the owner was cancelled mid-fetch) settles it as failed so waiters can
/// retry instead of hanging.
struct FetchClaim<'a, R> {
    inflight: &'a Mutex<HashMap<AliasKey, Arc<InflightFetch<R>>>>,
    key: AliasKey,
    slot: Arc<InflightFetch<R>>,
    armed: bool,
}

impl<R> FetchClaim<'_, R> {
    fn settle(&mut self, outcome: FetchOutcome<R>) {
        self.armed = false;
        *self.slot.outcome.lock() = Some(outcome);
        self.inflight.lock().remove(&self.key);
        self.slot.notify.notify_waiters();
    }
}

impl<R> Drop for FetchClaim<'_, R> {
    fn drop(&mut self) {
        if self.armed {
            self.settle(FetchOutcome::Failed);
        }
    }
}
