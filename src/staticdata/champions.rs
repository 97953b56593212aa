//! The full champion catalog as a single lazily-loaded list.

use crate::attrs::{self, groups};
use crate::context::CatalogContext;
use crate::staticdata::champion::Champion;
use crate::staticdata::{ChampionData, ScopeAttrs};
use rift_ghost::{Derived, Ghost, GroupState};
use rift_keys::{AliasKeySet, KeyError};
use rift_pipeline::PipelineError;
use rift_types::{
    flag_attr, text_attr, text_set_attr, AttrSource, AttrValue, CatalogRecord, EntityDescriptor,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The whole catalog is one record per scope: no identity attributes, every
/// discriminator folded into the key. Flipping any of them addresses a
/// different cached list.
pub static CHAMPION_LIST: EntityDescriptor = EntityDescriptor::new(
    "champion_list",
    &[&[]],
    &[
        attrs::PLATFORM,
        attrs::VERSION,
        attrs::LOCALE,
        attrs::INCLUDED_DATA,
        attrs::DATA_BY_ID,
    ],
    &[groups::LIST],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChampionListData {
    pub platform: Option<String>,
    pub version: Option<String>,
    pub locale: Option<String>,
    pub included_data: Option<BTreeSet<String>>,
    pub data_by_id: Option<bool>,
    pub champions: Vec<ChampionData>,
}

impl AttrSource for ChampionListData {
    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            attrs::PLATFORM => text_attr(&self.platform),
            attrs::VERSION => text_attr(&self.version),
            attrs::LOCALE => text_attr(&self.locale),
            attrs::INCLUDED_DATA => text_set_attr(&self.included_data),
            attrs::DATA_BY_ID => flag_attr(self.data_by_id),
            _ => None,
        }
    }
}

impl CatalogRecord for ChampionListData {
    const DESCRIPTOR: &'static EntityDescriptor = &CHAMPION_LIST;

    fn put_attr(&mut self, name: &str, value: AttrValue) {
        match (name, value) {
            (attrs::PLATFORM, AttrValue::Text(v)) => self.platform = Some(v),
            (attrs::VERSION, AttrValue::Text(v)) => self.version = Some(v),
            (attrs::LOCALE, AttrValue::Text(v)) => self.locale = Some(v),
            (attrs::INCLUDED_DATA, AttrValue::TextSet(v)) => self.included_data = Some(v),
            (attrs::DATA_BY_ID, AttrValue::Flag(v)) => self.data_by_id = Some(v),
            _ => {}
        }
    }
}

/// Lazy proxy over the full champion catalog for one request scope.
///
/// The list itself is a ghost: building one performs no fetch, and the first
/// call that needs members pulls the whole payload in a single pipeline get.
/// Children come back wrapped as [`Champion`] proxies with their static data
/// pre-marked loaded, so reading their fields costs nothing further.
#[derive(Clone, Debug)]
pub struct Champions {
    inner: Arc<ChampionsInner>,
}

#[derive(Debug)]
struct ChampionsInner {
    ctx: CatalogContext,
    ghost: Ghost<ChampionListData>,
    children: Derived<Arc<Vec<Champion>>>,
}

impl Champions {
    pub fn builder() -> ChampionsBuilder {
        ChampionsBuilder::default()
    }

    /// Wrapped members of the list, fetching the catalog on first call.
    pub async fn champions(&self) -> Result<Arc<Vec<Champion>>, PipelineError> {
        self.ensure_list().await?;
        let inner = &self.inner;
        inner
            .children
            .get_or_compute(|| async {
                let snapshot = inner.ghost.snapshot();
                let mut wrapped = Vec::with_capacity(snapshot.champions.len());
                for data in &snapshot.champions {
                    let mut child = data.clone();
                    // Payload members often omit the request scope; they
                    // inherit the list's.
                    if child.platform.is_none() {
                        child.platform = snapshot.platform.clone();
                    }
                    if child.version.is_none() {
                        child.version = snapshot.version.clone();
                    }
                    if child.locale.is_none() {
                        child.locale = snapshot.locale.clone();
                    }
                    if child.included_data.is_none() {
                        child.included_data = snapshot.included_data.clone();
                    }
                    wrapped.push(Champion::from_record(&inner.ctx, child, true)?);
                }
                Ok(Arc::new(wrapped))
            })
            .await
    }

    /// Whether the catalog came back non-empty for this scope.
    pub async fn exists(&self) -> Result<bool, PipelineError> {
        if self.inner.ghost.peek(|r| r.champions.is_empty()) {
            self.ensure_list().await?;
        }
        Ok(self.inner.ghost.peek(|r| !r.champions.is_empty()))
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

    pub fn alias_keys(&self) -> Result<AliasKeySet, KeyError> {
        self.inner.ghost.alias_keys()
    }

    pub fn group_state(&self, group: &str) -> GroupState {
        self.inner.ghost.group_state(group)
    }

    async fn ensure_list(&self) -> Result<(), PipelineError> {
        let ctx = self.inner.ctx.clone();
        self.inner
            .ghost
            .ensure_loaded(groups::LIST, move |record: Arc<ChampionListData>| {
                let ctx = ctx.clone();
                async move {
                    let query =
                        rift_keys::identity_query(ChampionListData::DESCRIPTOR, record.as_ref())?;
                    ctx.champion_lists().get(&query).await
                }
            })
            .await
    }
}

/// Builder for the catalog proxy. Only discriminators are configurable;
/// there is no per-entity identity to supply.
#[derive(Debug, Default)]
pub struct ChampionsBuilder {
    scope: ScopeAttrs,
    data_by_id: Option<bool>,
}

impl ChampionsBuilder {
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

    /// Asks the catalog to key its payload map by numeric id instead of
    /// name. Participates in the cache identity like any discriminator.
    pub fn indexed_by_id(mut self, data_by_id: bool) -> Self {
        self.data_by_id = Some(data_by_id);
        self
    }

    pub fn get(self, ctx: &CatalogContext) -> Result<Champions, KeyError> {
        let scope = self.scope.resolved(ctx.defaults());
        let record = ChampionListData {
            platform: scope.platform,
            version: scope.version,
            locale: scope.locale,
            included_data: scope.included_data,
            data_by_id: Some(self.data_by_id.unwrap_or(false)),
            champions: Vec::new(),
        };
        let ghost = Ghost::seeded(record)?;
        Ok(Champions {
            inner: Arc::new(ChampionsInner {
                ctx: ctx.clone(),
                ghost,
                children: Derived::new(),
            }),
        })
    }
}
