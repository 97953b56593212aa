//! Alias key and key set types.

use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// One cache identity for an entity instance or query.
///
/// The entity tag rides alongside the hash, so identities of different
/// entity types never compare equal even on a 64-bit hash collision. Keys
/// are plain `Copy` values and hash/compare cheaply; they are what the
/// pipeline cache is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AliasKey {
    entity: &'static str,
    hash: u64,
}

impl AliasKey {
    pub(crate) fn new(entity: &'static str, hash: u64) -> Self {
        AliasKey { entity, hash }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

impl fmt::Display for AliasKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:016x}", self.entity, self.hash)
    }
}

/// The full set of cache identities one entity instance answers to.
///
/// Derivation yields one key per fully-present identifying attribute set, in
/// descriptor precedence order, so [`primary`](AliasKeySet::primary) is the
/// most selective identity. Never empty: derivation fails instead of
/// producing an identity-less set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasKeySet {
    keys: SmallVec<[AliasKey; 4]>,
}

impl AliasKeySet {
    pub(crate) fn from_keys(keys: SmallVec<[AliasKey; 4]>) -> Self {
        debug_assert!(!keys.is_empty());
        AliasKeySet { keys }
    }

    /// The most selective identity, per descriptor precedence.
    pub fn primary(&self) -> AliasKey {
        self.keys[0]
    }

    pub fn keys(&self) -> &[AliasKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, key: &AliasKey) -> bool {
        self.keys.contains(key)
    }

    /// True when the two sets share at least one identity, i.e. both
    /// describe the same logical entity instance.
    pub fn intersects(&self, other: &AliasKeySet) -> bool {
        self.keys.iter().any(|key| other.contains(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AliasKey> + '_ {
        self.keys.iter()
    }
}

impl fmt::Display for AliasKeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{key}")?;
        }
        write!(f, "]")
    }
}

impl<'a> IntoIterator for &'a AliasKeySet {
    type Item = &'a AliasKey;
    type IntoIter = std::slice::Iter<'a, AliasKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn key(entity: &'static str, hash: u64) -> AliasKey {
        AliasKey::new(entity, hash)
    }

    #[test]
    fn test_keys_of_different_entities_never_equal() {
        assert_ne!(key("champion", 7), key("item", 7));
    }

    #[test]
    fn test_intersects_on_any_shared_key() {
        let a = AliasKeySet::from_keys(smallvec![key("item", 1), key("item", 2)]);
        let b = AliasKeySet::from_keys(smallvec![key("item", 2), key("item", 3)]);
        let c = AliasKeySet::from_keys(smallvec![key("item", 9)]);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_primary_is_first_key() {
        let set = AliasKeySet::from_keys(smallvec![key("item", 5), key("item", 6)]);
        assert_eq!(set.primary(), key("item", 5));
    }

    #[test]
    fn test_display_is_tagged_hex() {
        let k = key("champion", 0xabcd);
        assert_eq!(k.to_string(), "champion:000000000000abcd");
    }
}
