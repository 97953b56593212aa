//! Static identity metadata for catalog entity types.

/// Declarative description of how one entity type is identified and loaded.
///
/// A descriptor is a `'static` table, one per entity type, declaring:
///
/// * `entity` - the type tag mixed into every cache identity hash, so two
///   entity types can never collide even when their attributes agree.
/// * `identity_sets` - the alternative identifying attribute sets, ordered
///   most-selective first. An entity instance produces one cache alias per
///   fully-present set. An *empty* set is legal and marks a singleton type
///   (a full-catalog list): it is always satisfiable, and the discriminators
///   alone scope the identity.
/// * `discriminators` - the scoping attributes (platform, version, locale,
///   requested field groups) that are part of every identity for this type.
/// * `load_groups` - the named field groups that can be fetched on demand.
///
/// Attribute order inside each slice is meaningful: hashing walks the
/// declared order, so reordering a table changes every derived identity.
#[derive(Debug)]
pub struct EntityDescriptor {
    pub entity: &'static str,
    pub identity_sets: &'static [&'static [&'static str]],
    pub discriminators: &'static [&'static str],
    pub load_groups: &'static [&'static str],
}

impl EntityDescriptor {
    pub const fn new(
        entity: &'static str,
        identity_sets: &'static [&'static [&'static str]],
        discriminators: &'static [&'static str],
        load_groups: &'static [&'static str],
    ) -> Self {
        EntityDescriptor {
            entity,
            identity_sets,
            discriminators,
            load_groups,
        }
    }

    /// All attributes that appear in any identity set, in declaration order.
    /// An attribute shared by several sets is yielded once per set.
    pub fn identity_attrs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.identity_sets.iter().flat_map(|set| set.iter().copied())
    }

    /// True when this type has a trivially-satisfied (empty) identity set,
    /// i.e. one instance exists per discriminator scope.
    pub fn is_singleton(&self) -> bool {
        self.identity_sets.iter().any(|set| set.is_empty())
    }

    pub fn has_load_group(&self, group: &str) -> bool {
        self.load_groups.contains(&group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static WARD: EntityDescriptor = EntityDescriptor::new(
        "ward",
        &[&["id"], &["name"]],
        &["platform", "version"],
        &["ward"],
    );

    static WARD_LIST: EntityDescriptor =
        EntityDescriptor::new("ward_list", &[&[]], &["platform", "version"], &["list"]);

    #[test]
    fn test_identity_attrs_walks_declared_order() {
        let attrs: Vec<_> = WARD.identity_attrs().collect();
        assert_eq!(attrs, vec!["id", "name"]);
    }

    #[test]
    fn test_singleton_detection() {
        assert!(!WARD.is_singleton());
        assert!(WARD_LIST.is_singleton());
    }

    #[test]
    fn test_load_group_lookup() {
        assert!(WARD.has_load_group("ward"));
        assert!(!WARD.has_load_group("list"));
    }
}
