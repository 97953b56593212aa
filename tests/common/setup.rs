//! Context wiring for integration tests.
//!
//! Builds a [`CatalogContext`] over in-memory pipelines fed by the scripted
//! sources, handing back the counter handles tests assert against.

use rift_client::staticdata::{ChampionData, ChampionListData, ChampionRotationData, ItemData};
use rift_client::summoner::SummonerData;
use rift_client::{CatalogContext, CatalogPipelines, MemoryPipeline, RequestDefaults};
use std::sync::atomic::{AtomicBool, AtomicUsize};
use std::sync::Arc;

use super::fixtures::{accounts, roster, shop};
use super::mocks::{ChampionListSource, ChampionSource, ItemSource, RotationSource, SummonerSource};

pub struct TestCatalog {
    pub ctx: CatalogContext,
    pub champion_fetches: Arc<AtomicUsize>,
    pub champion_fail_next: Arc<AtomicBool>,
    pub rotation_fetches: Arc<AtomicUsize>,
    pub list_fetches: Arc<AtomicUsize>,
    pub item_fetches: Arc<AtomicUsize>,
    pub item_bulk_calls: Arc<AtomicUsize>,
    pub item_last_bulk_len: Arc<AtomicUsize>,
    pub summoner_fetches: Arc<AtomicUsize>,
}

/// The standard defaults most tests run under.
pub fn na_defaults() -> RequestDefaults {
    RequestDefaults::default()
        .platform("NA1")
        .version("7.24.2")
        .locale("en_US")
}

/// A catalog context over the standard fixtures and `NA1` defaults.
pub fn test_catalog() -> TestCatalog {
    test_catalog_with(na_defaults())
}

/// Champion ids 1 and 429 are on the mock free rotation.
pub fn test_catalog_with(defaults: RequestDefaults) -> TestCatalog {
    let champion_source = ChampionSource::new(roster());
    let champion_fetches = champion_source.fetches.clone();
    let champion_fail_next = champion_source.fail_next.clone();

    let rotation_source = RotationSource::new(vec![1, 429]);
    let rotation_fetches = rotation_source.fetches.clone();

    let list_source = ChampionListSource::new(roster());
    let list_fetches = list_source.fetches.clone();

    let item_source = ItemSource::new(shop());
    let item_fetches = item_source.fetches.clone();
    let item_bulk_calls = item_source.bulk_calls.clone();
    let item_last_bulk_len = item_source.last_bulk_len.clone();

    let summoner_source = SummonerSource::new(accounts());
    let summoner_fetches = summoner_source.fetches.clone();

    let pipelines = CatalogPipelines {
        champions: Arc::new(MemoryPipeline::<ChampionData, _>::new(champion_source)),
        rotations: Arc::new(MemoryPipeline::<ChampionRotationData, _>::new(rotation_source)),
        champion_lists: Arc::new(MemoryPipeline::<ChampionListData, _>::new(list_source)),
        items: Arc::new(MemoryPipeline::<ItemData, _>::new(item_source)),
        summoners: Arc::new(MemoryPipeline::<SummonerData, _>::new(summoner_source)),
    };

    TestCatalog {
        ctx: CatalogContext::new(defaults, pipelines),
        champion_fetches,
        champion_fail_next,
        rotation_fetches,
        list_fetches,
        item_fetches,
        item_bulk_calls,
        item_last_bulk_len,
        summoner_fetches,
    }
}
