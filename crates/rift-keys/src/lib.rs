//! Cache identity derivation for Rift catalog entities.
//!
//! An entity can be addressed several ways (by id, by name, by key) and every
//! address must land on the same cached object. This crate turns entity
//! instances and queries into [`AliasKey`]s: stable 64-bit identities, one
//! per fully-present identifying attribute set, scoped by the entity's
//! discriminators. A record learned by id is stored under *all* of its
//! aliases, so a later lookup by name converges on the same entry.
//!
//! Hashes are XXH3-64 over a canonical byte encoding of the descriptor-ordered
//! attribute names and values, so identities are reproducible across
//! processes and hosts.
//!
//! # Example
//!
//! ```ignore
//! let key = derive_from_query(&CHAMPION, &query)?;
//! let aliases = derive_from_record(&CHAMPION, &record)?;
//! assert!(aliases.contains(&key));
//! ```

mod alias;
mod derive;
mod error;
mod hash;

pub use alias::{AliasKey, AliasKeySet};
pub use derive::{
    derive_from_query, derive_from_query_batch, derive_from_record, identity_query,
};
pub use error::{KeyError, MalformedReason};
