//! Pipeline wiring and per-context request defaults.

use crate::staticdata::{ChampionData, ChampionListData, ChampionRotationData, ItemData};
use crate::summoner::SummonerData;
use rift_pipeline::Pipeline;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Discriminator values applied when an entity builder leaves them unset.
///
/// There is no implicit platform: a request that reaches key derivation
/// without one fails as a malformed query rather than guessing a region.
/// The requested-field-set falls back to `{"all"}` when neither the builder
/// nor the defaults name one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDefaults {
    platform: Option<String>,
    version: Option<String>,
    locale: Option<String>,
    included_data: Option<BTreeSet<String>>,
}

impl RequestDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn included_data<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.included_data = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn default_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn default_locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn default_included_data(&self) -> Option<&BTreeSet<String>> {
        self.included_data.as_ref()
    }
}

/// The requested-field-set used when nothing else names one.
pub(crate) fn all_included_data() -> BTreeSet<String> {
    BTreeSet::from(["all".to_owned()])
}

/// One pipeline per entity type. Every slot is typically a
/// [`MemoryPipeline`](rift_pipeline::MemoryPipeline) over the caller's
/// transport, but any [`Pipeline`] implementation slots in.
pub struct CatalogPipelines {
    pub champions: Arc<dyn Pipeline<ChampionData>>,
    pub rotations: Arc<dyn Pipeline<ChampionRotationData>>,
    pub champion_lists: Arc<dyn Pipeline<ChampionListData>>,
    pub items: Arc<dyn Pipeline<ItemData>>,
    pub summoners: Arc<dyn Pipeline<SummonerData>>,
}

/// Shared handle tying entity proxies to their pipelines and request
/// defaults. Cloning is cheap; clones address the same pipelines, so ghost
/// loads from any clone converge on the same caches.
#[derive(Clone)]
pub struct CatalogContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    defaults: RequestDefaults,
    pipelines: CatalogPipelines,
}

impl CatalogContext {
    pub fn new(defaults: RequestDefaults, pipelines: CatalogPipelines) -> Self {
        CatalogContext {
            inner: Arc::new(ContextInner {
                defaults,
                pipelines,
            }),
        }
    }

    pub fn defaults(&self) -> &RequestDefaults {
        &self.inner.defaults
    }

    pub fn champions(&self) -> &dyn Pipeline<ChampionData> {
        self.inner.pipelines.champions.as_ref()
    }

    pub fn rotations(&self) -> &dyn Pipeline<ChampionRotationData> {
        self.inner.pipelines.rotations.as_ref()
    }

    pub fn champion_lists(&self) -> &dyn Pipeline<ChampionListData> {
        self.inner.pipelines.champion_lists.as_ref()
    }

    pub fn items(&self) -> &dyn Pipeline<ItemData> {
        self.inner.pipelines.items.as_ref()
    }

    pub fn summoners(&self) -> &dyn Pipeline<SummonerData> {
        self.inner.pipelines.summoners.as_ref()
    }
}

impl fmt::Debug for CatalogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogContext")
            .field("defaults", &self.inner.defaults)
            .finish_non_exhaustive()
    }
}
