//! Shared vocabulary for the Rift catalog client.
//!
//! Everything that the key-derivation, ghost, and pipeline layers agree on
//! lives here: the attribute value model ([`AttrValue`]), per-entity identity
//! metadata ([`EntityDescriptor`]), the query types ([`Query`], [`QueryBatch`]),
//! and the record traits ([`AttrSource`], [`CatalogRecord`]).
//!
//! The crate is deliberately free of async machinery and hashing so the
//! layers above can depend on it without dragging a runtime along.

mod attr;
mod descriptor;
mod query;
mod record;

pub use attr::AttrValue;
pub use descriptor::EntityDescriptor;
pub use query::{Query, QueryBatch, QueryBuilder};
pub use record::{
    flag_attr, id_attr, record_from_query, text_attr, text_set_attr, AttrSource, CatalogRecord,
};
