#![allow(unused_imports, dead_code)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: Canned catalog records
//! - `mocks`: Scripted record sources with call counters
//! - `setup`: Context wiring over in-memory pipelines

pub mod fixtures;
pub mod mocks;
pub mod setup;

// Re-export commonly used items for convenience
pub use fixtures::{accounts, champion, item, roster, shop};
pub use mocks::{
    stamp_scope, ChampionListSource, ChampionSource, ItemSource, RotationSource, SummonerSource,
};
pub use setup::{na_defaults, test_catalog, test_catalog_with, TestCatalog};
