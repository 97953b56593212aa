//! Static game-data entities: champions and items, individually and as
//! catalog lists.
//!
//! Every entity here is a ghost proxy. Builders seed a backing record from
//! whatever identity the caller provides plus the request scope, and the
//! first read of an unfetched field pulls the rest through the context's
//! pipelines.

use crate::context::{all_included_data, RequestDefaults};
use std::collections::BTreeSet;

mod champion;
mod champions;
mod item;
mod items;

pub use champion::{
    Champion, ChampionBuilder, ChampionData, ChampionRotationData, CHAMPION, CHAMPION_ROTATION,
};
pub use champions::{ChampionListData, Champions, ChampionsBuilder, CHAMPION_LIST};
pub use item::{Item, ItemBuilder, ItemData, ITEM};
pub use items::{Items, ItemsBuilder};

/// Request-scope discriminators shared by the static-data builders.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScopeAttrs {
    pub platform: Option<String>,
    pub version: Option<String>,
    pub locale: Option<String>,
    pub included_data: Option<BTreeSet<String>>,
}

impl ScopeAttrs {
    /// Fills unset discriminators from the context defaults. The
    /// included-data set always comes back populated, falling back to the
    /// full `"all"` selection.
    pub(crate) fn resolved(mut self, defaults: &RequestDefaults) -> Self {
        if self.platform.is_none() {
            self.platform = defaults.default_platform().map(str::to_owned);
        }
        if self.version.is_none() {
            self.version = defaults.default_version().map(str::to_owned);
        }
        if self.locale.is_none() {
            self.locale = defaults.default_locale().map(str::to_owned);
        }
        if self.included_data.is_none() {
            self.included_data = Some(
                defaults
                    .default_included_data()
                    .cloned()
                    .unwrap_or_else(all_included_data),
            );
        }
        self
    }
}
