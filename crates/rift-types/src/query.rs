//! Request descriptions handed to the pipeline.

use crate::attr::AttrValue;
use crate::record::AttrSource;

/// An ordered mapping of attribute names to values describing one requested
/// entity: identifying attributes plus the discriminators that scope them.
///
/// Queries are assembled with [`Query::builder`]. Insertion order is kept so
/// that logs and debug output read the way the caller wrote the request;
/// identity derivation never depends on it (it walks the descriptor order).
///
/// # Example
///
/// ```ignore
/// let query = Query::builder()
///     .attr("id", 3153)
///     .attr("platform", "NA1")
///     .attr("version", "7.24.2")
///     .build();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    attrs: Vec<(&'static str, AttrValue)>,
}

impl Query {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&'static str, &AttrValue)> + '_ {
        self.attrs.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl AttrSource for Query {
    fn attr(&self, name: &str) -> Option<AttrValue> {
        self.get(name).cloned()
    }
}

/// Builder for [`Query`]. Setting the same attribute twice replaces the
/// earlier value in place.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    attrs: Vec<(&'static str, AttrValue)>,
}

impl QueryBuilder {
    pub fn attr(mut self, name: &'static str, value: impl Into<AttrValue>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(attr, _)| *attr == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Sets the attribute only when a value is present. Convenient when
    /// filling a query from optional defaults.
    pub fn attr_opt(self, name: &'static str, value: Option<impl Into<AttrValue>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    pub fn build(self) -> Query {
        Query { attrs: self.attrs }
    }
}

/// A bulk request: one shared discriminator/attribute query plus an ordered
/// list of values for a single identifying attribute.
///
/// Element `i` of the batch is equivalent to the scalar query
/// `shared + (key_attr = keys[i])`. Results must come back in `keys` order.
#[derive(Debug, Clone)]
pub struct QueryBatch {
    shared: Query,
    key_attr: &'static str,
    keys: Vec<AttrValue>,
}

impl QueryBatch {
    pub fn new(shared: Query, key_attr: &'static str, keys: Vec<AttrValue>) -> Self {
        QueryBatch {
            shared,
            key_attr,
            keys,
        }
    }

    pub fn shared(&self) -> &Query {
        &self.shared
    }

    pub fn key_attr(&self) -> &'static str {
        self.key_attr
    }

    pub fn keys(&self) -> &[AttrValue] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The scalar query equivalent to element `index`.
    pub fn element(&self, index: usize) -> Option<Query> {
        let key = self.keys.get(index)?;
        let mut query = self.shared.clone();
        match query.attrs.iter_mut().find(|(attr, _)| *attr == self.key_attr) {
            Some(slot) => slot.1 = key.clone(),
            None => query.attrs.push((self.key_attr, key.clone())),
        }
        Some(query)
    }

    /// Scalar queries for every element, in batch order.
    pub fn elements(&self) -> impl Iterator<Item = Query> + '_ {
        (0..self.keys.len()).filter_map(|i| self.element(i))
    }
}
