//! Derivation of alias keys from entity instances and queries.

use crate::alias::{AliasKey, AliasKeySet};
use crate::error::{KeyError, MalformedReason};
use crate::hash::IdentityHasher;
use rift_types::{AttrSource, AttrValue, EntityDescriptor, Query, QueryBatch};
use smallvec::SmallVec;

/// Derives every cache identity an entity instance answers to: one key per
/// identifying attribute set that is fully present on `record`, in
/// descriptor precedence order.
///
/// Discriminators contribute to every key whether present or not; an absent
/// discriminator is encoded as absent rather than skipped, so an instance
/// scoped to an unknown locale cannot collide with one scoped to a known
/// locale.
///
/// Fails with [`KeyError::InsufficientIdentity`] when no set is fully
/// present. A descriptor with an empty identity set never fails here.
pub fn derive_from_record<S>(
    descriptor: &'static EntityDescriptor,
    record: &S,
) -> Result<AliasKeySet, KeyError>
where
    S: AttrSource + ?Sized,
{
    let mut keys: SmallVec<[AliasKey; 4]> = SmallVec::new();
    for set in descriptor.identity_sets {
        if let Some(key) = hash_present_set(descriptor, record, set) {
            keys.push(key);
        }
    }
    if keys.is_empty() {
        return Err(KeyError::InsufficientIdentity {
            entity: descriptor.entity,
        });
    }
    Ok(AliasKeySet::from_keys(keys))
}

/// Derives the single cache identity a scalar query resolves to.
///
/// Every declared discriminator must be present, and the first identifying
/// attribute set fully present in the query wins; with several identity
/// attributes supplied, descriptor precedence decides (id over name over
/// key). The winning key always equals the corresponding member of
/// [`derive_from_record`]'s result for the instance the query describes.
pub fn derive_from_query(
    descriptor: &'static EntityDescriptor,
    query: &Query,
) -> Result<AliasKey, KeyError> {
    require_discriminators(descriptor, query)?;

    for set in descriptor.identity_sets {
        if set.iter().all(|attr| query.contains(attr)) {
            let mut hasher = IdentityHasher::new(descriptor.entity);
            for attr in descriptor.discriminators {
                hasher.attr(attr, query.get(attr));
            }
            for attr in *set {
                hasher.attr(attr, query.get(attr));
            }
            return Ok(AliasKey::new(descriptor.entity, hasher.finish()));
        }
    }
    Err(KeyError::MalformedQuery {
        entity: descriptor.entity,
        reason: MalformedReason::UnsatisfiedIdentity,
    })
}

/// Derives one key per bulk-query element, lazily and in element order.
///
/// The batch shape is validated up front: discriminators must be present in
/// the shared query, and some identity set must be satisfied by the shared
/// attributes plus the batch's designated key attribute. After that, keys
/// are hashed only as the iterator is advanced, so a caller streaming a
/// large batch never materializes the whole key list.
pub fn derive_from_query_batch<'a>(
    descriptor: &'static EntityDescriptor,
    batch: &'a QueryBatch,
) -> Result<impl Iterator<Item = AliasKey> + 'a, KeyError> {
    require_discriminators(descriptor, batch.shared())?;

    let chosen = descriptor
        .identity_sets
        .iter()
        .find(|set| {
            set.contains(&batch.key_attr())
                && set
                    .iter()
                    .all(|attr| *attr == batch.key_attr() || batch.shared().contains(attr))
        })
        .ok_or(KeyError::MalformedQuery {
            entity: descriptor.entity,
            reason: MalformedReason::UnsatisfiedIdentity,
        })?;

    Ok(batch.keys().iter().map(move |key_value| {
        let mut hasher = IdentityHasher::new(descriptor.entity);
        for attr in descriptor.discriminators {
            hasher.attr(attr, batch.shared().get(attr));
        }
        for attr in *chosen {
            if *attr == batch.key_attr() {
                hasher.attr(attr, Some(key_value));
            } else {
                hasher.attr(attr, batch.shared().get(attr));
            }
        }
        AliasKey::new(descriptor.entity, hasher.finish())
    }))
}

/// Builds the refetch query for an instance: its most selective fully-known
/// identifying attribute set plus every discriminator that is currently
/// known. Deriving a key from the result always lands inside the instance's
/// own alias set.
pub fn identity_query<S>(
    descriptor: &'static EntityDescriptor,
    record: &S,
) -> Result<Query, KeyError>
where
    S: AttrSource + ?Sized,
{
    let chosen = descriptor
        .identity_sets
        .iter()
        .find(|set| set.iter().all(|attr| record.attr(attr).is_some()))
        .ok_or(KeyError::InsufficientIdentity {
            entity: descriptor.entity,
        })?;

    let mut builder = Query::builder();
    for attr in *chosen {
        builder = builder.attr_opt(attr, record.attr(attr));
    }
    for attr in descriptor.discriminators {
        builder = builder.attr_opt(attr, record.attr(attr));
    }
    Ok(builder.build())
}

fn require_discriminators(
    descriptor: &'static EntityDescriptor,
    query: &Query,
) -> Result<(), KeyError> {
    for attr in descriptor.discriminators {
        if !query.contains(attr) {
            return Err(KeyError::MalformedQuery {
                entity: descriptor.entity,
                reason: MalformedReason::MissingDiscriminator(attr),
            });
        }
    }
    Ok(())
}

/// One key for `set` if every member is present on `record`, else `None`.
fn hash_present_set<S>(
    descriptor: &'static EntityDescriptor,
    record: &S,
    set: &'static [&'static str],
) -> Option<AliasKey>
where
    S: AttrSource + ?Sized,
{
    let mut values: SmallVec<[AttrValue; 4]> = SmallVec::new();
    for attr in set {
        values.push(record.attr(attr)?);
    }

    let mut hasher = IdentityHasher::new(descriptor.entity);
    for attr in descriptor.discriminators {
        hasher.attr(attr, record.attr(attr).as_ref());
    }
    for (attr, value) in set.iter().zip(values.iter()) {
        hasher.attr(attr, Some(value));
    }
    Some(AliasKey::new(descriptor.entity, hasher.finish()))
}
