//! Champions: static data plus free-rotation status.

use crate::attrs::{self, groups};
use crate::context::CatalogContext;
use crate::staticdata::ScopeAttrs;
use rift_ghost::{Ghost, GroupState};
use rift_keys::{AliasKeySet, KeyError};
use rift_pipeline::PipelineError;
use rift_types::{
    id_attr, text_attr, text_set_attr, AttrSource, AttrValue, CatalogRecord, EntityDescriptor,
    Query,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub static CHAMPION: EntityDescriptor = EntityDescriptor::new(
    "champion",
    &[&[attrs::ID], &[attrs::NAME], &[attrs::KEY]],
    &[
        attrs::PLATFORM,
        attrs::VERSION,
        attrs::LOCALE,
        attrs::INCLUDED_DATA,
    ],
    &[groups::CHAMPION, groups::ROTATION],
);

pub static CHAMPION_ROTATION: EntityDescriptor = EntityDescriptor::new(
    "champion_rotation",
    &[&[attrs::ID]],
    &[attrs::PLATFORM],
    &[groups::ROTATION],
);

/// Backing record for one champion. The rotation flags belong to the
/// `rotation` load group; everything else is static data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChampionData {
    pub id: i64,
    pub name: Option<String>,
    pub key: Option<String>,
    pub title: Option<String>,
    pub ally_tips: Option<Vec<String>>,
    pub enemy_tips: Option<Vec<String>>,
    pub free_to_play: Option<bool>,
    pub enabled: Option<bool>,
    pub platform: Option<String>,
    pub version: Option<String>,
    pub locale: Option<String>,
    pub included_data: Option<BTreeSet<String>>,
}

impl AttrSource for ChampionData {
    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            attrs::ID => id_attr(self.id),
            attrs::NAME => text_attr(&self.name),
            attrs::KEY => text_attr(&self.key),
            attrs::PLATFORM => text_attr(&self.platform),
            attrs::VERSION => text_attr(&self.version),
            attrs::LOCALE => text_attr(&self.locale),
            attrs::INCLUDED_DATA => text_set_attr(&self.included_data),
            _ => None,
        }
    }
}

impl CatalogRecord for ChampionData {
    const DESCRIPTOR: &'static EntityDescriptor = &CHAMPION;

    fn put_attr(&mut self, name: &str, value: AttrValue) {
        match (name, value) {
            (attrs::ID, AttrValue::Int(v)) => self.id = v,
            (attrs::NAME, AttrValue::Text(v)) => self.name = Some(v),
            (attrs::KEY, AttrValue::Text(v)) => self.key = Some(v),
            (attrs::PLATFORM, AttrValue::Text(v)) => self.platform = Some(v),
            (attrs::VERSION, AttrValue::Text(v)) => self.version = Some(v),
            (attrs::LOCALE, AttrValue::Text(v)) => self.locale = Some(v),
            (attrs::INCLUDED_DATA, AttrValue::TextSet(v)) => self.included_data = Some(v),
            _ => {}
        }
    }
}

/// Backing record for one champion's rotation status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChampionRotationData {
    pub id: i64,
    pub platform: Option<String>,
    pub free_to_play: Option<bool>,
    pub enabled: Option<bool>,
}

impl AttrSource for ChampionRotationData {
    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            attrs::ID => id_attr(self.id),
            attrs::PLATFORM => text_attr(&self.platform),
            _ => None,
        }
    }
}

impl CatalogRecord for ChampionRotationData {
    const DESCRIPTOR: &'static EntityDescriptor = &CHAMPION_ROTATION;

    fn put_attr(&mut self, name: &str, value: AttrValue) {
        match (name, value) {
            (attrs::ID, AttrValue::Int(v)) => self.id = v,
            (attrs::PLATFORM, AttrValue::Text(v)) => self.platform = Some(v),
            _ => {}
        }
    }
}

/// A lazily-loaded champion.
///
/// Addressable by id, name, or short key. Static fields load through the
/// `champion` group the first time an unfetched one is read; the rotation
/// flags load independently through the `rotation` group, merged onto the
/// backing record as a wholesale replacement.
///
/// # Example
///
/// ```ignore
/// let annie = Champion::named("Annie").platform("NA1").get(&ctx)?;
/// let title = annie.title().await?;
/// let free = annie.free_to_play().await?;
/// ```
#[derive(Clone, Debug)]
pub struct Champion {
    inner: Arc<ChampionInner>,
}

#[derive(Debug)]
struct ChampionInner {
    ctx: CatalogContext,
    ghost: Ghost<ChampionData>,
}

impl Champion {
    pub fn with_id(id: i64) -> ChampionBuilder {
        ChampionBuilder {
            id: Some(id),
            ..ChampionBuilder::default()
        }
    }

    pub fn named(name: impl Into<String>) -> ChampionBuilder {
        ChampionBuilder {
            name: Some(name.into()),
            ..ChampionBuilder::default()
        }
    }

    pub fn with_key(key: impl Into<String>) -> ChampionBuilder {
        ChampionBuilder {
            key: Some(key.into()),
            ..ChampionBuilder::default()
        }
    }

    /// Wraps an already-fetched record, pre-marking the static-data group
    /// when the payload is known to carry it.
    pub(crate) fn from_record(
        ctx: &CatalogContext,
        record: ChampionData,
        core_loaded: bool,
    ) -> Result<Champion, KeyError> {
        let ghost = if core_loaded {
            Ghost::seeded_with(record, &[groups::CHAMPION])?
        } else {
            Ghost::seeded(record)?
        };
        Ok(Champion {
            inner: Arc::new(ChampionInner {
                ctx: ctx.clone(),
                ghost,
            }),
        })
    }

    pub async fn id(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.id == 0) {
            self.ensure_champion().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.id))
    }

    pub async fn name(&self) -> Result<Option<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.name.is_none()) {
            self.ensure_champion().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.name.clone()))
    }

    pub async fn key(&self) -> Result<Option<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.key.is_none()) {
            self.ensure_champion().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.key.clone()))
    }

    pub async fn title(&self) -> Result<Option<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.title.is_none()) {
            self.ensure_champion().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.title.clone()))
    }

    pub async fn ally_tips(&self) -> Result<Vec<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.ally_tips.is_none()) {
            self.ensure_champion().await?;
        }
        Ok(self
            .inner
            .ghost
            .peek(|r| r.ally_tips.clone().unwrap_or_default()))
    }

    pub async fn enemy_tips(&self) -> Result<Vec<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.enemy_tips.is_none()) {
            self.ensure_champion().await?;
        }
        Ok(self
            .inner
            .ghost
            .peek(|r| r.enemy_tips.clone().unwrap_or_default()))
    }

    /// Whether the champion is on the current free rotation. Loads the
    /// `rotation` group, resolving the champion id first when this proxy was
    /// addressed by name or key.
    pub async fn free_to_play(&self) -> Result<bool, PipelineError> {
        if self.inner.ghost.peek(|r| r.free_to_play.is_none()) {
            self.ensure_rotation().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.free_to_play.unwrap_or(false)))
    }

    pub async fn enabled(&self) -> Result<bool, PipelineError> {
        if self.inner.ghost.peek(|r| r.enabled.is_none()) {
            self.ensure_rotation().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.enabled.unwrap_or(false)))
    }

    /// Whether the catalog has a record for this champion. Forces the
    /// static-data load; the title only comes back for real champions.
    pub async fn exists(&self) -> Result<bool, PipelineError> {
        if self.inner.ghost.peek(|r| r.title.is_none()) {
            self.ensure_champion().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.title.is_some()))
    }

    pub fn platform(&self) -> Option<String> {
        self.inner.ghost.peek(|r| r.platform.clone())
    }

    pub fn version(&self) -> Option<String> {
        self.inner.ghost.peek(|r| r.version.clone())
    }

    pub fn locale(&self) -> Option<String> {
        self.inner.ghost.peek(|r| r.locale.clone())
    }

    pub fn included_data(&self) -> Option<BTreeSet<String>> {
        self.inner.ghost.peek(|r| r.included_data.clone())
    }

    /// Every cache identity the current record answers to.
    pub fn alias_keys(&self) -> Result<AliasKeySet, KeyError> {
        self.inner.ghost.alias_keys()
    }

    pub fn group_state(&self, group: &str) -> GroupState {
        self.inner.ghost.group_state(group)
    }

    pub fn is_loaded(&self, group: &str) -> bool {
        self.inner.ghost.is_loaded(group)
    }

    async fn ensure_champion(&self) -> Result<(), PipelineError> {
        let ctx = self.inner.ctx.clone();
        self.inner
            .ghost
            .ensure_loaded(groups::CHAMPION, move |record: Arc<ChampionData>| {
                let ctx = ctx.clone();
                async move {
                    let query =
                        rift_keys::identity_query(ChampionData::DESCRIPTOR, record.as_ref())?;
                    ctx.champions().get(&query).await
                }
            })
            .await
    }

    async fn ensure_rotation(&self) -> Result<(), PipelineError> {
        // Rotation status is addressed by numeric id only.
        if self.inner.ghost.peek(|r| r.id == 0) {
            self.ensure_champion().await?;
        }
        let ctx = self.inner.ctx.clone();
        let ghost = &self.inner.ghost;
        ghost
            .ensure_loaded(groups::ROTATION, move |record: Arc<ChampionData>| {
                let ctx = ctx.clone();
                async move {
                    let query = Query::builder()
                        .attr_opt(attrs::ID, id_attr(record.id))
                        .attr_opt(attrs::PLATFORM, record.platform.clone())
                        .build();
                    match ctx.rotations().get(&query).await? {
                        Some(status) => {
                            // Merge onto the record as it stands after the
                            // fetch; a static-data load may have landed in
                            // the meantime.
                            let mut fresh = (*ghost.snapshot()).clone();
                            fresh.free_to_play = status.free_to_play;
                            fresh.enabled = status.enabled;
                            Ok(Some(fresh))
                        }
                        None => Ok(None),
                    }
                }
            })
            .await
    }
}

/// Builder for a champion proxy. Finishing with [`get`](ChampionBuilder::get)
/// seeds the proxy without touching the network; the first unfetched field
/// read triggers the load.
#[derive(Debug, Default)]
pub struct ChampionBuilder {
    id: Option<i64>,
    name: Option<String>,
    key: Option<String>,
    scope: ScopeAttrs,
}

impl ChampionBuilder {
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.scope.platform = Some(platform.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.scope.version = Some(version.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.scope.locale = Some(locale.into());
        self
    }

    pub fn included_data<I, S>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope.included_data = Some(data.into_iter().map(Into::into).collect());
        self
    }

    pub fn get(self, ctx: &CatalogContext) -> Result<Champion, KeyError> {
        let scope = self.scope.resolved(ctx.defaults());
        let record = ChampionData {
            id: self.id.unwrap_or(0),
            name: self.name,
            key: self.key,
            platform: scope.platform,
            version: scope.version,
            locale: scope.locale,
            included_data: scope.included_data,
            ..ChampionData::default()
        };
        Champion::from_record(ctx, record, false)
    }
}
