//! Per-group load state tracking.

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Lifecycle of one load group on one ghost instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    NotStarted,
    InProgress,
    Completed,
}

struct GroupSlot {
    name: &'static str,
    state: Mutex<GroupState>,
    settled: Notify,
}

/// Tracks which of an entity's load groups have been fetched.
///
/// One tracker per ghost instance; the group list comes from the entity's
/// descriptor. Transitions are `NotStarted -> InProgress -> Completed`, with
/// `InProgress -> NotStarted` as the failure rollback. `Completed` is
/// terminal. The tracker hands out the `InProgress` claim to exactly one
/// caller at a time, which is what makes the at-most-one-fetch guarantee
/// hold.
///
/// Group names are static metadata: asking about a group the descriptor
/// does not declare is a programming error and panics.
pub struct LoadGroupTracker {
    groups: Box<[GroupSlot]>,
}

impl LoadGroupTracker {
    /// A tracker with every group `NotStarted`.
    pub fn new(groups: &'static [&'static str]) -> Self {
        Self::with_completed(groups, &[])
    }

    /// A tracker with the named groups already `Completed`. Used when a
    /// record arrives pre-loaded, e.g. a child of a bulk response.
    pub fn with_completed(groups: &'static [&'static str], completed: &[&str]) -> Self {
        let groups = groups
            .iter()
            .map(|name| {
                let state = if completed.contains(name) {
                    GroupState::Completed
                } else {
                    GroupState::NotStarted
                };
                GroupSlot {
                    name,
                    state: Mutex::new(state),
                    settled: Notify::new(),
                }
            })
            .collect();
        LoadGroupTracker { groups }
    }

    pub fn state(&self, group: &str) -> GroupState {
        *self.slot(group).state.lock()
    }

    pub fn is_loaded(&self, group: &str) -> bool {
        self.state(group) == GroupState::Completed
    }

    /// Claims the group for loading. Returns `true` only for the single
    /// caller that moved it `NotStarted -> InProgress`; that caller must
    /// later settle the group with [`mark_loaded`](Self::mark_loaded) or
    /// [`mark_failed`](Self::mark_failed).
    pub fn mark_in_progress(&self, group: &str) -> bool {
        let slot = self.slot(group);
        let mut state = slot.state.lock();
        if *state == GroupState::NotStarted {
            *state = GroupState::InProgress;
            true
        } else {
            false
        }
    }

    /// Settles the group as `Completed` and wakes waiters. Idempotent.
    pub fn mark_loaded(&self, group: &str) {
        let slot = self.slot(group);
        {
            let mut state = slot.state.lock();
            *state = GroupState::Completed;
        }
        slot.settled.notify_waiters();
    }

    /// Rolls an `InProgress` group back to `NotStarted` and wakes waiters so
    /// one of them can claim the retry. No effect on settled groups.
    pub fn mark_failed(&self, group: &str) {
        let slot = self.slot(group);
        {
            let mut state = slot.state.lock();
            if *state != GroupState::InProgress {
                return;
            }
            *state = GroupState::NotStarted;
        }
        slot.settled.notify_waiters();
    }

    /// Waits until the group leaves `InProgress`, returning the settled
    /// state. Returns immediately when no load is in flight.
    pub async fn wait_until_settled(&self, group: &str) -> GroupState {
        let slot = self.slot(group);
        loop {
            let notified = slot.settled.notified();
            tokio::pin!(notified);
            {
                let state = *slot.state.lock();
                if state != GroupState::InProgress {
                    return state;
                }
                // Arm the waiter while holding the state lock so a
                // notify_waiters after this point cannot be missed.
                notified.as_mut().enable();
            }
            notified.await;
        }
    }

    fn slot(&self, group: &str) -> &GroupSlot {
        self.groups
            .iter()
            .find(|slot| slot.name == group)
            .unwrap_or_else(|| panic!("unknown load group `{group}`"))
    }
}

impl std::fmt::Debug for LoadGroupTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for slot in self.groups.iter() {
            map.entry(&slot.name, &*slot.state.lock());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const GROUPS: &[&str] = &["core", "status"];

    #[test]
    fn test_new_tracker_starts_unloaded() {
        let tracker = LoadGroupTracker::new(GROUPS);
        assert_eq!(tracker.state("core"), GroupState::NotStarted);
        assert_eq!(tracker.state("status"), GroupState::NotStarted);
        assert!(!tracker.is_loaded("core"));
    }

    #[test]
    fn test_with_completed_premarks_groups() {
        let tracker = LoadGroupTracker::with_completed(GROUPS, &["core"]);
        assert!(tracker.is_loaded("core"));
        assert!(!tracker.is_loaded("status"));
    }

    #[test]
    fn test_only_one_caller_claims_a_group() {
        let tracker = LoadGroupTracker::new(GROUPS);
        assert!(tracker.mark_in_progress("core"));
        assert!(!tracker.mark_in_progress("core"));
        // An independent group is unaffected.
        assert!(tracker.mark_in_progress("status"));
    }

    #[test]
    fn test_completed_group_cannot_be_reclaimed() {
        let tracker = LoadGroupTracker::new(GROUPS);
        assert!(tracker.mark_in_progress("core"));
        tracker.mark_loaded("core");
        assert!(!tracker.mark_in_progress("core"));
        assert_eq!(tracker.state("core"), GroupState::Completed);
    }

    #[test]
    fn test_failure_rolls_back_and_allows_reclaim() {
        let tracker = LoadGroupTracker::new(GROUPS);
        assert!(tracker.mark_in_progress("core"));
        tracker.mark_failed("core");
        assert_eq!(tracker.state("core"), GroupState::NotStarted);
        assert!(tracker.mark_in_progress("core"));
    }

    #[test]
    fn test_mark_failed_never_unsettles_completed() {
        let tracker = LoadGroupTracker::new(GROUPS);
        tracker.mark_loaded("core");
        tracker.mark_failed("core");
        assert_eq!(tracker.state("core"), GroupState::Completed);
    }

    #[test]
    #[should_panic(expected = "unknown load group")]
    fn test_unknown_group_panics() {
        let tracker = LoadGroupTracker::new(GROUPS);
        tracker.state("lore");
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_settled() {
        let tracker = LoadGroupTracker::new(GROUPS);
        assert_eq!(
            tracker.wait_until_settled("core").await,
            GroupState::NotStarted
        );
        tracker.mark_loaded("core");
        assert_eq!(
            tracker.wait_until_settled("core").await,
            GroupState::Completed
        );
    }

    #[tokio::test]
    async fn test_waiters_wake_on_completion() {
        let tracker = Arc::new(LoadGroupTracker::new(GROUPS));
        assert!(tracker.mark_in_progress("core"));

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let tracker = tracker.clone();
            waiters.push(tokio::spawn(async move {
                tracker.wait_until_settled("core").await
            }));
        }
        // Let the waiters reach the wait before settling.
        tokio::task::yield_now().await;

        tracker.mark_loaded("core");
        for waiter in waiters {
            assert_eq!(waiter.await.unwrap(), GroupState::Completed);
        }
    }

    #[tokio::test]
    async fn test_waiters_wake_on_rollback() {
        let tracker = Arc::new(LoadGroupTracker::new(GROUPS));
        assert!(tracker.mark_in_progress("core"));

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_until_settled("core").await })
        };
        tokio::task::yield_now().await;

        tracker.mark_failed("core");
        assert_eq!(waiter.await.unwrap(), GroupState::NotStarted);
    }

    #[tokio::test]
    async fn test_concurrent_claims_admit_exactly_one() {
        let tracker = Arc::new(LoadGroupTracker::new(GROUPS));
        let barrier = Arc::new(tokio::sync::Barrier::new(8));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let tracker = tracker.clone();
            let barrier = barrier.clone();
            tasks.push(tokio::spawn(async move {
                barrier.wait().await;
                tracker.mark_in_progress("core")
            }));
        }

        let mut claimed = 0;
        for task in tasks {
            if task.await.unwrap() {
                claimed += 1;
            }
        }
        assert_eq!(claimed, 1);
    }
}
