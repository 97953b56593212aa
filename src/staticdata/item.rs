//! Items: static data plus derived navigation to build-path neighbours.

use crate::attrs::{self, groups};
use crate::context::CatalogContext;
use crate::staticdata::champion::Champion;
use crate::staticdata::items::Items;
use crate::staticdata::ScopeAttrs;
use rift_ghost::{Derived, Ghost, GroupState};
use rift_keys::{AliasKeySet, KeyError};
use rift_pipeline::PipelineError;
use rift_types::{
    id_attr, text_attr, text_set_attr, AttrSource, AttrValue, CatalogRecord, EntityDescriptor,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

pub static ITEM: EntityDescriptor = EntityDescriptor::new(
    "item",
    &[&[attrs::ID], &[attrs::NAME]],
    &[
        attrs::PLATFORM,
        attrs::VERSION,
        attrs::LOCALE,
        attrs::INCLUDED_DATA,
    ],
    &[groups::ITEM],
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemData {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub plaintext: Option<String>,
    pub base_price: i64,
    pub total_price: i64,
    pub tags: Option<Vec<String>>,
    pub builds_from: Option<Vec<i64>>,
    pub builds_into: Option<Vec<i64>>,
    pub required_champion_key: Option<String>,
    pub platform: Option<String>,
    pub version: Option<String>,
    pub locale: Option<String>,
    pub included_data: Option<BTreeSet<String>>,
}

impl AttrSource for ItemData {
    fn attr(&self, name: &str) -> Option<AttrValue> {
        match name {
            attrs::ID => id_attr(self.id),
            attrs::NAME => text_attr(&self.name),
            attrs::PLATFORM => text_attr(&self.platform),
            attrs::VERSION => text_attr(&self.version),
            attrs::LOCALE => text_attr(&self.locale),
            attrs::INCLUDED_DATA => text_set_attr(&self.included_data),
            _ => None,
        }
    }
}

impl CatalogRecord for ItemData {
    const DESCRIPTOR: &'static EntityDescriptor = &ITEM;

    fn put_attr(&mut self, name: &str, value: AttrValue) {
        match (name, value) {
            (attrs::ID, AttrValue::Int(v)) => self.id = v,
            (attrs::NAME, AttrValue::Text(v)) => self.name = Some(v),
            (attrs::PLATFORM, AttrValue::Text(v)) => self.platform = Some(v),
            (attrs::VERSION, AttrValue::Text(v)) => self.version = Some(v),
            (attrs::LOCALE, AttrValue::Text(v)) => self.locale = Some(v),
            (attrs::INCLUDED_DATA, AttrValue::TextSet(v)) => self.included_data = Some(v),
            _ => {}
        }
    }
}

/// A lazily-loaded item.
///
/// Build-path navigation (`builds_from`, `builds_into`, `required_champion`)
/// is derived from the loaded record and memoized per proxy: repeated calls
/// hand back the same neighbouring proxies without recomputing.
#[derive(Clone, Debug)]
pub struct Item {
    inner: Arc<ItemInner>,
}

#[derive(Debug)]
struct ItemInner {
    ctx: CatalogContext,
    ghost: Ghost<ItemData>,
    builds_from: Derived<Option<Items>>,
    builds_into: Derived<Option<Items>>,
    required_champion: Derived<Option<Champion>>,
}

impl Item {
    pub fn with_id(id: i64) -> ItemBuilder {
        ItemBuilder {
            id: Some(id),
            ..ItemBuilder::default()
        }
    }

    pub fn named(name: impl Into<String>) -> ItemBuilder {
        ItemBuilder {
            name: Some(name.into()),
            ..ItemBuilder::default()
        }
    }

    pub(crate) fn from_record(
        ctx: &CatalogContext,
        record: ItemData,
        core_loaded: bool,
    ) -> Result<Item, KeyError> {
        let ghost = if core_loaded {
            Ghost::seeded_with(record, &[groups::ITEM])?
        } else {
            Ghost::seeded(record)?
        };
        Ok(Item {
            inner: Arc::new(ItemInner {
                ctx: ctx.clone(),
                ghost,
                builds_from: Derived::new(),
                builds_into: Derived::new(),
                required_champion: Derived::new(),
            }),
        })
    }

    pub async fn id(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.id == 0) {
            self.ensure_item().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.id))
    }

    pub async fn name(&self) -> Result<Option<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.name.is_none()) {
            self.ensure_item().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.name.clone()))
    }

    pub async fn description(&self) -> Result<Option<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.description.is_none()) {
            self.ensure_item().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.description.clone()))
    }

    pub async fn plaintext(&self) -> Result<Option<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.plaintext.is_none()) {
            self.ensure_item().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.plaintext.clone()))
    }

    pub async fn base_price(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.base_price == 0) {
            self.ensure_item().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.base_price))
    }

    pub async fn total_price(&self) -> Result<i64, PipelineError> {
        if self.inner.ghost.peek(|r| r.total_price == 0) {
            self.ensure_item().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.total_price))
    }

    pub async fn tags(&self) -> Result<Vec<String>, PipelineError> {
        if self.inner.ghost.peek(|r| r.tags.is_none()) {
            self.ensure_item().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.tags.clone().unwrap_or_default()))
    }

    /// Items this one is assembled from, as a fresh list proxy scoped like
    /// this item. `None` when the record carries no build path.
    pub async fn builds_from(&self) -> Result<Option<Items>, PipelineError> {
        if self.inner.ghost.peek(|r| r.builds_from.is_none()) {
            self.ensure_item().await?;
        }
        let inner = &self.inner;
        inner
            .builds_from
            .get_or_compute(|| async {
                let snapshot = inner.ghost.snapshot();
                let Some(ids) = snapshot.builds_from.clone() else {
                    return Ok(None);
                };
                Ok(Some(Self::neighbours(&inner.ctx, &snapshot, ids)?))
            })
            .await
    }

    /// Items this one assembles into.
    pub async fn builds_into(&self) -> Result<Option<Items>, PipelineError> {
        if self.inner.ghost.peek(|r| r.builds_into.is_none()) {
            self.ensure_item().await?;
        }
        let inner = &self.inner;
        inner
            .builds_into
            .get_or_compute(|| async {
                let snapshot = inner.ghost.snapshot();
                let Some(ids) = snapshot.builds_into.clone() else {
                    return Ok(None);
                };
                Ok(Some(Self::neighbours(&inner.ctx, &snapshot, ids)?))
            })
            .await
    }

    /// The champion this item is restricted to, if any.
    pub async fn required_champion(&self) -> Result<Option<Champion>, PipelineError> {
        if self.inner.ghost.peek(|r| r.required_champion_key.is_none()) {
            self.ensure_item().await?;
        }
        let inner = &self.inner;
        inner
            .required_champion
            .get_or_compute(|| async {
                let snapshot = inner.ghost.snapshot();
                let Some(key) = snapshot.required_champion_key.clone() else {
                    return Ok(None);
                };
                let mut builder = Champion::with_key(key);
                if let Some(platform) = snapshot.platform.clone() {
                    builder = builder.platform(platform);
                }
                if let Some(version) = snapshot.version.clone() {
                    builder = builder.version(version);
                }
                if let Some(locale) = snapshot.locale.clone() {
                    builder = builder.locale(locale);
                }
                if let Some(data) = snapshot.included_data.clone() {
                    builder = builder.included_data(data);
                }
                Ok(Some(builder.get(&inner.ctx)?))
            })
            .await
    }

    /// Whether the catalog has a record for this item. The description only
    /// comes back on a successful load.
    pub async fn exists(&self) -> Result<bool, PipelineError> {
        if self.inner.ghost.peek(|r| r.description.is_none()) {
            self.ensure_item().await?;
        }
        Ok(self.inner.ghost.peek(|r| r.description.is_some()))
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

    pub fn is_loaded(&self, group: &str) -> bool {
        self.inner.ghost.is_loaded(group)
    }

    fn neighbours(
        ctx: &CatalogContext,
        snapshot: &ItemData,
        ids: Vec<i64>,
    ) -> Result<Items, KeyError> {
        let mut builder = Items::with_ids(ids);
        if let Some(platform) = snapshot.platform.clone() {
            builder = builder.platform(platform);
        }
        if let Some(version) = snapshot.version.clone() {
            builder = builder.version(version);
        }
        if let Some(locale) = snapshot.locale.clone() {
            builder = builder.locale(locale);
        }
        if let Some(data) = snapshot.included_data.clone() {
            builder = builder.included_data(data);
        }
        builder.get(ctx)
    }

    async fn ensure_item(&self) -> Result<(), PipelineError> {
        let ctx = self.inner.ctx.clone();
        self.inner
            .ghost
            .ensure_loaded(groups::ITEM, move |record: Arc<ItemData>| {
                let ctx = ctx.clone();
                async move {
                    let query = rift_keys::identity_query(ItemData::DESCRIPTOR, record.as_ref())?;
                    ctx.items().get(&query).await
                }
            })
            .await
    }
}

#[derive(Debug, Default)]
pub struct ItemBuilder {
    id: Option<i64>,
    name: Option<String>,
    scope: ScopeAttrs,
}

impl ItemBuilder {
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

    pub fn get(self, ctx: &CatalogContext) -> Result<Item, KeyError> {
        let scope = self.scope.resolved(ctx.defaults());
        let record = ItemData {
            id: self.id.unwrap_or(0),
            name: self.name,
            platform: scope.platform,
            version: scope.version,
            locale: scope.locale,
            included_data: scope.included_data,
            ..ItemData::default()
        };
        Item::from_record(ctx, record, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rift_keys::{derive_from_query, derive_from_record};
    use rift_types::Query;

    fn boots(name: Option<&str>) -> ItemData {
        ItemData {
            id: 1001,
            name: name.map(str::to_owned),
            platform: Some("NA1".to_owned()),
            version: Some("7.24.2".to_owned()),
            locale: Some("en_US".to_owned()),
            included_data: Some(BTreeSet::from(["all".to_owned()])),
            ..ItemData::default()
        }
    }

    #[test]
    fn test_record_aliases_match_query_aliases() {
        let record = boots(Some("Boots of Speed"));
        let from_record = derive_from_record(&ITEM, &record).unwrap();
        assert_eq!(from_record.len(), 2);

        let query = Query::builder()
            .attr(attrs::ID, 1001i64)
            .attr(attrs::NAME, "Boots of Speed")
            .attr(attrs::PLATFORM, "NA1")
            .attr(attrs::VERSION, "7.24.2")
            .attr(attrs::LOCALE, "en_US")
            .attr(attrs::INCLUDED_DATA, BTreeSet::from(["all".to_owned()]))
            .build();
        let from_query = derive_from_query(&ITEM, &query).unwrap();
        assert!(from_record.contains(&from_query));
    }

    #[test]
    fn test_name_only_record_gets_one_alias() {
        let record = ItemData {
            id: 0,
            ..boots(Some("Boots of Speed"))
        };
        assert_eq!(derive_from_record(&ITEM, &record).unwrap().len(), 1);
    }

    #[test]
    fn test_put_attr_ignores_undeclared_fields() {
        let mut record = ItemData::default();
        record.put_attr(attrs::ID, AttrValue::Int(1001));
        record.put_attr("description", AttrValue::text("ignored"));
        assert_eq!(record.id, 1001);
        assert_eq!(record.description, None);
    }
}
