//! Summoners: player accounts addressed by id, account id, or name.

use crate::attrs::{self, groups};
use crate::context::CatalogContext;
use rift_ghost::{Ghost, GroupState};
use rift_keys::{AliasKeySet, KeyError};
use rift_pipeline::PipelineError;
use rift_types::{id_attr, text_attr, AttrSource, AttrValue, CatalogRecord, EntityDescriptor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summoners live on one platform and carry no catalog-version scope; the
/// platform is the only discriminator.
pub static SUMMONER: EntityDescriptor = EntityDescriptor::new(
    "summoner",
    &[&[attrs::ID], &[attrs::ACCOUNT_ID], &[attrs::NAME]],
    &[attrs::PLATFORM],
    &[groups::SUMMONER],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummonerData {
    pub id: i64,
    pub account_id: i64,
    pub name: Option<String>,
    pub platform: Option<String>,
    pub level: i64,
    pub profile_icon_id: i64,
    pub revision_date: i64,
}

impl AttrSource for SummonerData {
    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            attrs::ID => id_attr(self.id),
            attrs::ACCOUNT_ID => id_attr(self.account_id),
            attrs::NAME => text_attr(&self.name),
            attrs::PLATFORM => text_attr(&self.platform),
            _ => None,
        }
    }
}

impl CatalogRecord for SummonerData {
    const DESCRIPTOR: &'static EntityDescriptor = &SUMMONER;

    fn put_attr(&mut self, name: &str, value: AttrValue) {
        match (name, value) {
            (attrs::ID, AttrValue::Int(v)) => self.id = v,
            (attrs::ACCOUNT_ID, AttrValue::Int(v)) => self.account_id = v,
            (attrs::NAME, AttrValue::Text(v)) => self.name = Some(v),
            (attrs::PLATFORM, AttrValue::Text(v)) => self.platform = Some(v),
            _ => {}
        }
    }
}

/// A lazily-loaded summoner.
///
/// Whichever identity the caller starts from, the loaded record answers to
/// all three, so later lookups by any of them hit the same cache entry.
#[derive(Clone, Debug)]
pub struct Summoner {
    inner: Arc<SummonerInner>,
}

#[derive(Debug)]
struct SummonerInner {
    ctx: CatalogContext,
    ghost: Ghost<SummonerData>,
}

impl Summoner {
    pub fn with_id(id: i64) -> SummonerBuilder {
        SummonerBuilder {
            id: Some(id),
            ..SummonerBuilder::default()
        }
    }

    pub fn with_account_id(account_id: i64) -> SummonerBuilder {
        SummonerBuilder {
            account_id: Some(account_id),
            ..SummonerBuilder::default()
        }
    }

    pub fn named(name: impl Into<String>) -> SummonerBuilder {
        SummonerBuilder {
            name: Some(name.into()),
            ..SummonerBuilder::default()
        }
    }

    pub async fn id(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.id == 0) {
            self.ensure_summoner().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.id))
    }

    pub async fn account_id(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.account_id == 0) {
            self.ensure_summoner().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.account_id))
    }

    pub async fn name(&self) -> Result<Option<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.name.is_none()) {
            self.ensure_summoner().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.name.clone()))
    }

    pub async fn level(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.level == 0) {
            self.ensure_summoner().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.level))
    }

    pub async fn profile_icon_id(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.profile_icon_id == 0) {
            self.ensure_summoner().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.profile_icon_id))
    }

    pub async fn revision_date(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.revision_date == 0) {
            self.ensure_summoner().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.revision_date))
    }

    /// Whether the account exists on this platform. The revision date is
    /// server-assigned and never zero on a real account.
    pub async fn exists(&self) -> Result<bool, PipelineError> {
        if self.inner.ghost.peek(|r| r.revision_date == 0) {
            self.ensure_summoner().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.revision_date != 0))
    }

    pub fn platform(&self) -> Option<String> {
        self.inner.ghost.peek(|r| r.platform.clone())
    }

    pub fn alias_keys(&self) -> Result<AliasKeySet, KeyError> {
        self.inner.ghost.alias_keys()
    }

    pub fn group_state(&self, group: &str) -> GroupState {
        self.inner.ghost.group_state(group)
    }

    pub fn is_loaded(&self, group: &str) -> bool {
        self.inner.ghost.is_loaded(group)
    }

    async fn ensure_summoner(&self) -> Result<(), PipelineError> {
        let ctx = self.inner.ctx.clone();
        self.inner
            .ghost
            .ensure_loaded(groups::SUMMONER, move |record: Arc<SummonerData>| {
                let ctx = ctx.clone();
                async move {
                    let query =
                        rift_keys::identity_query(SummonerData::DESCRIPTOR, record.as_ref())?;
                    ctx.summoners().get(&query).await
                }
            })
            .await
    }
}

#[derive(Debug, Default)]
pub struct SummonerBuilder {
    id: Option<i64>,
    account_id: Option<i64>,
    name: Option<String>,
    platform: Option<String>,
}

impl SummonerBuilder {
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn get(self, ctx: &CatalogContext) -> Result<Summoner, KeyError> {
        let platform = self
            .platform
            .or_else(|| ctx.defaults().default_platform().map(str::to_owned));
        let record = SummonerData {
            id: self.id.unwrap_or(0),
            account_id: self.account_id.unwrap_or(0),
            name: self.name,
            platform,
            ..SummonerData::default()
        };
        let ghost = Ghost::seeded(record)?;
        Ok(Summoner {
            inner: Arc::new(SummonerInner {
                ctx: ctx.clone(),
                ghost,
            }),
        })
    }
}
