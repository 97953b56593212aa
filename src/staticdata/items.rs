//! A chosen subset of the item catalog, fetched in one bulk operation.

use crate::attrs::{self, groups};
use crate::context::CatalogContext;
use crate::staticdata::item::Item;
use crate::staticdata::{ItemData, ScopeAttrs};
use anyhow::anyhow;
use futures::stream::BoxStream;
use futures::StreamExt;
use rift_ghost::Derived;
use rift_keys::KeyError;
use rift_pipeline::PipelineError;
use rift_types::{record_from_query, AttrValue, CatalogRecord, Query, QueryBatch};
use std::sync::Arc;
use tracing::warn;

/// Lazy proxy over a set of items addressed by id or by name.
///
/// Results preserve request order, holes included: an element the catalog
/// has no record for comes back as an unloaded [`Item`] proxy carrying just
/// the requested identity. Eager mode materializes every member on the
/// first access; streaming mode fetches elements as the consumer pulls.
///
/// # Example
///
/// ```ignore
/// let trinity = Items::with_ids([3057, 3044, 3101]).platform("NA1").get(&ctx)?;
/// for item in trinity.all().await?.iter() {
///     println!("{:?}", item.name().await?);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Items {
    inner: Arc<ItemsInner>,
}

#[derive(Debug)]
struct ItemsInner {
    ctx: CatalogContext,
    batch: QueryBatch,
    streaming: bool,
    children: Derived<Arc<Vec<Item>>>,
}

impl Items {
    pub fn with_ids(ids: impl IntoIterator<Item = i64>) -> ItemsBuilder {
        ItemsBuilder {
            key_attr: attrs::ID,
            keys: ids.into_iter().map(AttrValue::from).collect(),
            scope: ScopeAttrs::default(),
            streaming: false,
        }
    }

    pub fn named<I, S>(names: I) -> ItemsBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ItemsBuilder {
            key_attr: attrs::NAME,
            keys: names
                .into_iter()
                .map(|name| AttrValue::text(name.into()))
                .collect(),
            scope: ScopeAttrs::default(),
            streaming: false,
        }
    }

    /// How many items were requested. Available without fetching.
    pub fn len(&self) -> usize {
        self.inner.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.batch.is_empty()
    }

    /// Every member, in request order, fetching on first call. Later calls
    /// reuse the memoized result.
    pub async fn all(&self) -> Result<Arc<Vec<Item>>, PipelineError> {
        let inner = &self.inner;
        inner
            .children
            .get_or_compute(|| async {
                let mut results = inner
                    .ctx
                    .items()
                    .get_many(&inner.batch, inner.streaming)
                    .await?;
                let mut wrapped = Vec::with_capacity(inner.batch.len());
                let mut index = 0usize;
                while let Some(result) = results.next().await {
                    wrapped.push(wrap_element(&inner.ctx, &inner.batch, index, result?)?);
                    index += 1;
                }
                Ok(Arc::new(wrapped))
            })
            .await
    }

    pub async fn get(&self, index: usize) -> Result<Option<Item>, PipelineError> {
        Ok(self.all().await?.get(index).cloned())
    }

    /// Whether at least one requested item has a catalog record.
    pub async fn exists(&self) -> Result<bool, PipelineError> {
        let children = self.all().await?;
        Ok(children.iter().any(|item| item.is_loaded(groups::ITEM)))
    }

    /// One-shot streaming pass over the members. Each element is fetched as
    /// the consumer pulls it; nothing is retained on this proxy.
    pub async fn stream(
        &self,
    ) -> Result<BoxStream<'static, Result<Item, PipelineError>>, PipelineError> {
        let ctx = self.inner.ctx.clone();
        let batch = self.inner.batch.clone();
        let results = self.inner.ctx.items().get_many(&self.inner.batch, true).await?;
        Ok(results
            .enumerate()
            .map(move |(index, result)| wrap_element(&ctx, &batch, index, result?))
            .boxed())
    }
}

fn wrap_element(
    ctx: &CatalogContext,
    batch: &QueryBatch,
    index: usize,
    payload: Option<ItemData>,
) -> Result<Item, PipelineError> {
    let item = match payload {
        Some(data) => Item::from_record(ctx, data, true)?,
        None => {
            let Some(query) = batch.element(index) else {
                warn!(index, "bulk response longer than the request batch");
                return Err(PipelineError::Upstream(anyhow!(
                    "bulk response longer than the request batch"
                )));
            };
            let seed: ItemData = record_from_query(&query);
            Item::from_record(ctx, seed, false)?
        }
    };
    Ok(item)
}

/// Builder for a subset proxy. Finishing with [`get`](ItemsBuilder::get)
/// validates the batch shape against the item descriptor; nothing is
/// fetched until the proxy is first read.
#[derive(Debug)]
pub struct ItemsBuilder {
    key_attr: &'static str,
    keys: Vec<AttrValue>,
    scope: ScopeAttrs,
    streaming: bool,
}

impl ItemsBuilder {
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

    /// Fetch members lazily as the consumer iterates instead of up front.
    pub fn streaming(mut self) -> Self {
        self.streaming = true;
        self
    }

    pub fn get(self, ctx: &CatalogContext) -> Result<Items, KeyError> {
        let scope = self.scope.resolved(ctx.defaults());
        let mut shared = Query::builder()
            .attr_opt(attrs::PLATFORM, scope.platform)
            .attr_opt(attrs::VERSION, scope.version)
            .attr_opt(attrs::LOCALE, scope.locale);
        if let Some(data) = scope.included_data {
            shared = shared.attr(attrs::INCLUDED_DATA, data);
        }
        let batch = QueryBatch::new(shared.build(), self.key_attr, self.keys);
        // Malformed subsets fail here, before any proxy exists.
        let _ = rift_keys::derive_from_query_batch(ItemData::DESCRIPTOR, &batch)?;
        Ok(Items {
            inner: Arc::new(ItemsInner {
                ctx: ctx.clone(),
                batch,
                streaming: self.streaming,
                children: Derived::new(),
            }),
        })
    }
}
