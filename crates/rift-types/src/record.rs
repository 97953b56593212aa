//! Record traits and attribute presence helpers.

use crate::attr::AttrValue;
use crate::descriptor::EntityDescriptor;
use crate::query::Query;
use std::collections::BTreeSet;

/// Read access to named attributes. Implemented by backing records and by
/// [`Query`](crate::Query), so identity derivation treats both uniformly.
pub trait AttrSource {
    /// The current value of `name`, or `None` when the attribute is absent.
    ///
    /// Absence is a semantic judgement, not a representation detail: a
    /// numeric id field holding its unfetched sentinel (`0`) and a `None`
    /// string field both report `None` here.
    fn attr(&self, name: &str) -> Option<AttrValue>;
}

/// A plain-data backing record for one catalog entity type.
///
/// Records carry the fetched state of an entity. The ghost layer replaces
/// them wholesale after a fetch and uses [`put_attr`](CatalogRecord::put_attr)
/// to carry identifying attributes forward onto the replacement, so a record
/// learned under one alias keeps answering for the aliases it was reached by.
pub trait CatalogRecord: AttrSource + Clone + Send + Sync + 'static {
    /// The identity table for this entity type.
    const DESCRIPTOR: &'static EntityDescriptor;

    /// Stores `value` into the named attribute. Unknown names and mismatched
    /// value variants are ignored; records only accept what they declare.
    fn put_attr(&mut self, name: &str, value: AttrValue);
}

/// Presence-aware wrapper for numeric id fields: `0` is the unfetched
/// sentinel and reads as absent.
pub fn id_attr(value: i64) -> Option<AttrValue> {
    (value != 0).then_some(AttrValue::Int(value))
}

/// Presence-aware wrapper for optional text fields.
pub fn text_attr(value: &Option<String>) -> Option<AttrValue> {
    value.as_ref().map(|v| AttrValue::Text(v.clone()))
}

/// Presence-aware wrapper for optional flag fields.
pub fn flag_attr(value: Option<bool>) -> Option<AttrValue> {
    value.map(AttrValue::Flag)
}

/// Presence-aware wrapper for optional text-set fields.
pub fn text_set_attr(value: &Option<BTreeSet<String>>) -> Option<AttrValue> {
    value.as_ref().map(|v| AttrValue::TextSet(v.clone()))
}

/// Builds a record carrying exactly the attributes of `query`. Proxies that
/// know their identity but have fetched nothing yet are seeded this way.
pub fn record_from_query<R: CatalogRecord + Default>(query: &Query) -> R {
    let mut record = R::default();
    for (name, value) in query.attrs() {
        record.put_attr(name, value.clone());
    }
    record
}
