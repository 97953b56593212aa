//! Scripted record sources backing the test pipelines.
//!
//! Each source serves from an in-memory fixture set, matches on whichever
//! identity attribute the query carries, and stamps the request scope onto
//! the returned record. Call counters are shared handles so tests can assert
//! how often the upstream was actually hit.

use async_trait::async_trait;
use rift_client::attrs;
use rift_client::staticdata::{ChampionData, ChampionListData, ChampionRotationData, ItemData};
use rift_client::summoner::SummonerData;
use rift_client::{CatalogRecord, Query, QueryBatch, RecordSource};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Copies the request-scope attributes a query carries onto a record.
pub fn stamp_scope<R: CatalogRecord>(record: &mut R, query: &Query) {
    for attr in [
        attrs::PLATFORM,
        attrs::VERSION,
        attrs::LOCALE,
        attrs::INCLUDED_DATA,
        attrs::DATA_BY_ID,
    ] {
        if let Some(value) = query.get(attr) {
            record.put_attr(attr, value.clone());
        }
    }
}

fn query_matches_int(query: &Query, attr: &str, actual: i64) -> Option<bool> {
    query.get(attr).map(|v| v.as_int() == Some(actual))
}

fn query_matches_text(query: &Query, attr: &str, actual: Option<&str>) -> Option<bool> {
    query.get(attr).map(|v| v.as_text() == actual)
}

pub struct ChampionSource {
    roster: Vec<ChampionData>,
    pub fetches: Arc<AtomicUsize>,
    pub fail_next: Arc<AtomicBool>,
}

impl ChampionSource {
    pub fn new(roster: Vec<ChampionData>) -> Self {
        ChampionSource {
            roster,
            fetches: Arc::new(AtomicUsize::new(0)),
            fail_next: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait]
impl RecordSource<ChampionData> for ChampionSource {
    async fn fetch(&self, query: &Query) -> anyhow::Result<Option<ChampionData>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        // Give concurrent readers a chance to pile up mid-fetch.
        tokio::task::yield_now().await;
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("champion catalog unavailable");
        }
        let hit = self.roster.iter().find(|c| {
            query_matches_int(query, attrs::ID, c.id)
                .or_else(|| query_matches_text(query, attrs::NAME, c.name.as_deref()))
                .or_else(|| query_matches_text(query, attrs::KEY, c.key.as_deref()))
                .unwrap_or(false)
        });
        Ok(hit.map(|c| {
            let mut record = c.clone();
            stamp_scope(&mut record, query);
            record
        }))
    }
}

pub struct RotationSource {
    free_ids: Vec<i64>,
    pub fetches: Arc<AtomicUsize>,
}

impl RotationSource {
    pub fn new(free_ids: Vec<i64>) -> Self {
        RotationSource {
            free_ids,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RecordSource<ChampionRotationData> for RotationSource {
    async fn fetch(&self, query: &Query) -> anyhow::Result<Option<ChampionRotationData>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let Some(id) = query.get(attrs::ID).and_then(|v| v.as_int()) else {
            return Ok(None);
        };
        let mut record = ChampionRotationData {
            id,
            free_to_play: Some(self.free_ids.contains(&id)),
            enabled: Some(true),
            ..ChampionRotationData::default()
        };
        stamp_scope(&mut record, query);
        Ok(Some(record))
    }
}

pub struct ChampionListSource {
    roster: Vec<ChampionData>,
    pub fetches: Arc<AtomicUsize>,
}

impl ChampionListSource {
    pub fn new(roster: Vec<ChampionData>) -> Self {
        ChampionListSource {
            roster,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RecordSource<ChampionListData> for ChampionListSource {
    async fn fetch(&self, query: &Query) -> anyhow::Result<Option<ChampionListData>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        // Members come back bare; scope inheritance is the client's job.
        let mut record = ChampionListData {
            champions: self.roster.clone(),
            ..ChampionListData::default()
        };
        stamp_scope(&mut record, query);
        Ok(Some(record))
    }
}

pub struct ItemSource {
    shop: Vec<ItemData>,
    pub fetches: Arc<AtomicUsize>,
    pub bulk_calls: Arc<AtomicUsize>,
    pub last_bulk_len: Arc<AtomicUsize>,
}

impl ItemSource {
    pub fn new(shop: Vec<ItemData>) -> Self {
        ItemSource {
            shop,
            fetches: Arc::new(AtomicUsize::new(0)),
            bulk_calls: Arc::new(AtomicUsize::new(0)),
            last_bulk_len: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn lookup(&self, query: &Query) -> Option<ItemData> {
        let hit = self.shop.iter().find(|i| {
            query_matches_int(query, attrs::ID, i.id)
                .or_else(|| query_matches_text(query, attrs::NAME, i.name.as_deref()))
                .unwrap_or(false)
        });
        hit.map(|i| {
            let mut record = i.clone();
            stamp_scope(&mut record, query);
            record
        })
    }
}

#[async_trait]
impl RecordSource<ItemData> for ItemSource {
    async fn fetch(&self, query: &Query) -> anyhow::Result<Option<ItemData>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(self.lookup(query))
    }

    async fn fetch_many(&self, batch: &QueryBatch) -> anyhow::Result<Vec<Option<ItemData>>> {
        self.bulk_calls.fetch_add(1, Ordering::SeqCst);
        self.last_bulk_len.store(batch.len(), Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(batch.elements().map(|query| self.lookup(&query)).collect())
    }
}

pub struct SummonerSource {
    accounts: Vec<SummonerData>,
    pub fetches: Arc<AtomicUsize>,
}

impl SummonerSource {
    pub fn new(accounts: Vec<SummonerData>) -> Self {
        SummonerSource {
            accounts,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RecordSource<SummonerData> for SummonerSource {
    async fn fetch(&self, query: &Query) -> anyhow::Result<Option<SummonerData>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let hit = self.accounts.iter().find(|s| {
            query_matches_int(query, attrs::ID, s.id)
                .or_else(|| query_matches_int(query, attrs::ACCOUNT_ID, s.account_id))
                .or_else(|| query_matches_text(query, attrs::NAME, s.name.as_deref()))
                .unwrap_or(false)
        });
        Ok(hit.map(|s| {
            let mut record = s.clone();
            stamp_scope(&mut record, query);
            record
        }))
    }
}
