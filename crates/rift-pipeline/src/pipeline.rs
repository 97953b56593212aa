//! The pipeline abstraction entities load through.

use crate::error::PipelineError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use rift_types::{CatalogRecord, Query, QueryBatch};

/// Per-element results of a bulk request, yielded in batch order. A `None`
/// element means the catalog has no record for that position's key.
pub type RecordStream<R> = BoxStream<'static, Result<Option<R>, PipelineError>>;

/// Resolves queries for one record type.
///
/// Implementations own caching and request-collapsing policy; callers see
/// plain query-in, record-out semantics. `Ok(None)` is a definitive "no such
/// entity", distinct from `Err` (the question could not be answered).
#[async_trait]
pub trait Pipeline<R: CatalogRecord>: Send + Sync {
    /// Resolves a scalar query to at most one record.
    async fn get(&self, query: &Query) -> Result<Option<R>, PipelineError>;

    /// Resolves a bulk query to one result per element, in element order.
    ///
    /// With `streaming` set, elements are resolved as the returned stream is
    /// consumed; otherwise the whole batch is resolved before the stream
    /// yields. Either way the batch shape is validated before this method
    /// returns.
    async fn get_many(
        &self,
        batch: &QueryBatch,
        streaming: bool,
    ) -> Result<RecordStream<R>, PipelineError>;
}
