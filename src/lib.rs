//! Rift Client
//!
//! Lazy ghost entities and alias-keyed caching for the Rift game-data
//! catalog:
//!
//! - **Alias keys**: Every entity resolves to stable cache identities derived
//!   from whichever of its aliases are known
//! - **Ghost loading**: Entity proxies fetch field groups on demand, once,
//!   with concurrent readers coalesced onto a single upstream call
//! - **Pipelines**: Pluggable resolution path from cache through a record
//!   source, with bulk and streaming list support
//! - **Entity facade**: Champions, items, and summoners built over the
//!   machinery, scoped by platform, version, and locale defaults
//!
//! See [`CatalogContext`] for wiring and [`staticdata`] for the entities.

#![allow(clippy::result_large_err)]
#![allow(clippy::type_complexity)]

pub mod attrs;
pub mod context;
pub mod staticdata;
pub mod summoner;

pub use context::{CatalogContext, CatalogPipelines, RequestDefaults};
pub use rift_ghost::{Derived, Ghost, GroupState, LoadGroupTracker};
pub use rift_keys::{
    derive_from_query, derive_from_query_batch, derive_from_record, identity_query, AliasKey,
    AliasKeySet, KeyError, MalformedReason,
};
pub use rift_pipeline::{
    AliasCache, MemoryPipeline, Pipeline, PipelineError, PipelineMetrics,
    PipelineMetricsSnapshot, RecordSource, RecordStream,
};
pub use rift_types::{
    AttrSource, AttrValue, CatalogRecord, EntityDescriptor, Query, QueryBatch, QueryBuilder,
};
