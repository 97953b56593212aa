//! The upstream seam.

use async_trait::async_trait;
use rift_types::{CatalogRecord, Query, QueryBatch};

/// Fetches records from the upstream catalog.
///
/// This is the boundary where transport, authentication, and payload
/// decoding live; the pipeline above it only cares about three outcomes per
/// query: a record, a definitive absence (`Ok(None)`), or a failure.
/// Sources report failures as [`anyhow::Error`] with whatever context they
/// have; the pipeline wraps them unchanged.
#[async_trait]
pub trait RecordSource<R: CatalogRecord>: Send + Sync {
    /// Fetches the record a scalar query describes.
    async fn fetch(&self, query: &Query) -> anyhow::Result<Option<R>>;

    /// Fetches one record per batch element, in element order. The returned
    /// vector must be exactly as long as the batch.
    ///
    /// The default resolves elements one by one; sources with a real bulk
    /// endpoint should override it.
    async fn fetch_many(&self, batch: &QueryBatch) -> anyhow::Result<Vec<Option<R>>> {
        let mut results = Vec::with_capacity(batch.len());
        for query in batch.elements() {
            results.push(self.fetch(&query).await?);
        }
        Ok(results)
    }
}
