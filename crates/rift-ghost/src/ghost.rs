//! The ghost proxy itself.

use crate::tracker::{GroupState, LoadGroupTracker};
use parking_lot::RwLock;
use rift_keys::{AliasKeySet, KeyError};
use rift_types::{CatalogRecord, Query};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// A lazily-loaded proxy around one backing record.
///
/// A ghost starts from a partial record (usually just identity attributes and
/// discriminators) and fills in field groups on demand through
/// [`ensure_loaded`](Ghost::ensure_loaded). The record behind the proxy is
/// immutable once published: completing a fetch swaps in a whole replacement
/// record, with the previously known identifying attributes carried forward
/// onto it so the instance keeps answering to every alias it was reachable
/// by.
///
/// # Example
///
/// ```ignore
/// let ghost = Ghost::seeded(partial)?;
/// ghost.ensure_loaded("item", |snapshot| fetch_item(snapshot)).await?;
/// let record = ghost.snapshot();
/// ```
#[derive(Debug)]
pub struct Ghost<R: CatalogRecord> {
    record: RwLock<Arc<R>>,
    tracker: LoadGroupTracker,
}

impl<R: CatalogRecord> Ghost<R> {
    /// Wraps a partial record with every load group unloaded.
    ///
    /// Fails with [`KeyError::InsufficientIdentity`] when the record carries
    /// no fully-present identifying attribute set; an unidentifiable ghost
    /// could never be fetched or cached.
    pub fn seeded(record: R) -> Result<Self, KeyError> {
        Self::seeded_with(record, &[])
    }

    /// Wraps a record with the named load groups already completed. Bulk
    /// responses use this to hand out children that will not refetch what
    /// the bulk payload already carried.
    pub fn seeded_with(record: R, completed: &[&str]) -> Result<Self, KeyError> {
        rift_keys::derive_from_record(R::DESCRIPTOR, &record)?;
        Ok(Ghost {
            record: RwLock::new(Arc::new(record)),
            tracker: LoadGroupTracker::with_completed(R::DESCRIPTOR.load_groups, completed),
        })
    }

    /// Wraps a fully-loaded record; no accessor will ever trigger a fetch.
    pub fn loaded(record: R) -> Result<Self, KeyError> {
        Self::seeded_with(record, R::DESCRIPTOR.load_groups)
    }

    /// The current backing record. The snapshot is immutable; a concurrent
    /// load replaces the record behind the proxy without disturbing handed-
    /// out snapshots.
    pub fn snapshot(&self) -> Arc<R> {
        self.record.read().clone()
    }

    /// Reads a value out of the current record without cloning the `Arc`.
    pub fn peek<T>(&self, read: impl FnOnce(&R) -> T) -> T {
        read(&self.record.read())
    }

    /// Every cache identity the current record answers to.
    pub fn alias_keys(&self) -> Result<AliasKeySet, KeyError> {
        rift_keys::derive_from_record(R::DESCRIPTOR, &*self.snapshot())
    }

    /// The refetch query for this instance: most selective known identity
    /// set plus the known discriminators.
    pub fn identity_query(&self) -> Result<Query, KeyError> {
        rift_keys::identity_query(R::DESCRIPTOR, &*self.snapshot())
    }

    pub fn group_state(&self, group: &str) -> GroupState {
        self.tracker.state(group)
    }

    pub fn is_loaded(&self, group: &str) -> bool {
        self.tracker.is_loaded(group)
    }

    /// Makes sure `group` has been loaded, fetching it at most once.
    ///
    /// Exactly one caller per group becomes the fetch owner; everyone else
    /// waits for the owner to settle. The owner calls `fetch` with a
    /// snapshot of the current record:
    ///
    /// * `Ok(Some(fresh))` replaces the backing record and completes the
    ///   group,
    /// * `Ok(None)` completes the group without touching the record, so an
    ///   entity that does not exist upstream is not refetched on every
    ///   accessor,
    /// * `Err(_)` rolls the group back to unloaded and propagates the error
    ///   to the owner only; a waiter then retries with its own fetch.
    ///
    /// Dropping the owner's future mid-fetch also rolls the group back, so
    /// a timed-out caller cannot wedge the group in progress.
    pub async fn ensure_loaded<E, F, Fut>(&self, group: &'static str, fetch: F) -> Result<(), E>
    where
        F: Fn(Arc<R>) -> Fut,
        Fut: Future<Output = Result<Option<R>, E>>,
    {
        loop {
            if self.tracker.is_loaded(group) {
                return Ok(());
            }

            if self.tracker.mark_in_progress(group) {
                let mut claim = Claim {
                    tracker: &self.tracker,
                    group,
                    armed: true,
                };
                match fetch(self.snapshot()).await {
                    Ok(Some(fresh)) => {
                        self.install(fresh);
                        claim.settle();
                        debug!(entity = R::DESCRIPTOR.entity, group, "load group fetched");
                        return Ok(());
                    }
                    Ok(None) => {
                        claim.settle();
                        debug!(
                            entity = R::DESCRIPTOR.entity,
                            group, "load group empty upstream"
                        );
                        return Ok(());
                    }
                    Err(err) => {
                        drop(claim);
                        debug!(entity = R::DESCRIPTOR.entity, group, "load group fetch failed");
                        return Err(err);
                    }
                }
            }

            if self.tracker.wait_until_settled(group).await == GroupState::Completed {
                return Ok(());
            }
            // The owner rolled back; race for the claim again.
        }
    }

    /// Publishes a replacement record, carrying forward identifying and
    /// discriminator attributes the old record knew but the fresh one lacks.
    fn install(&self, mut fresh: R) {
        let current = self.snapshot();
        let carried = R::DESCRIPTOR
            .identity_attrs()
            .chain(R::DESCRIPTOR.discriminators.iter().copied());
        for attr in carried {
            if fresh.attr(attr).is_none() {
                if let Some(value) = current.attr(attr) {
                    fresh.put_attr(attr, value);
                }
            }
        }
        *self.record.write() = Arc::new(fresh);
    }
}

/// Rollback-on-drop ownership of an `InProgress` group.
struct Claim<'a> {
    tracker: &'a LoadGroupTracker,
    group: &'static str,
    armed: bool,
}

impl Claim<'_> {
    fn settle(&mut self) {
        self.armed = false;
        self.tracker.mark_loaded(self.group);
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.tracker.mark_failed(self.group);
        }
    }
}
