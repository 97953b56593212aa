//! Lazy ghost proxies over catalog backing records.
//!
//! A [`Ghost`] starts life knowing only an entity's identity and fetches the
//! rest on first demand, one named load group at a time. The concurrency
//! story is deliberately narrow:
//!
//! * per ghost and group, at most one fetch is ever in flight
//!   ([`LoadGroupTracker`] arbitrates claims),
//! * concurrent callers of a claimed group wait for the owner to settle,
//! * a failed fetch rolls its group back so a later caller can retry,
//! * the backing record is replaced wholesale on completion, never mutated
//!   field by field, so readers always see a coherent snapshot.
//!
//! [`Derived`] rides alongside for values computed from fetched state that
//! should be produced once and then frozen.

mod ghost;
mod memo;
mod tracker;

pub use ghost::Ghost;
pub use memo::Derived;
pub use tracker::{GroupState, LoadGroupTracker};
