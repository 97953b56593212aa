//! The read-through pipeline between ghost entities and the upstream
//! catalog.
//!
//! A [`Pipeline`] answers queries for one record type. The bundled
//! [`MemoryPipeline`] resolves a query to its alias key, serves cache hits,
//! coalesces concurrent misses into a single upstream fetch, and stores every
//! fetched record under *all* of its alias keys so lookups by id, name, or
//! key converge on one cached entry. Absent entities are never cached;
//! asking again asks upstream again.
//!
//! The upstream itself sits behind [`RecordSource`], the one seam where
//! transport and decoding live.

mod cache;
mod error;
mod memory;
mod metrics;
mod pipeline;
mod source;

pub use cache::AliasCache;
pub use error::PipelineError;
pub use memory::MemoryPipeline;
pub use metrics::{PipelineMetrics, PipelineMetricsSnapshot};
pub use pipeline::{Pipeline, RecordStream};
pub use source::RecordSource;
