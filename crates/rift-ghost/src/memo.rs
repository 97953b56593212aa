//! Compute-once derived values.

use std::future::Future;
use tokio::sync::OnceCell;

/// A derived value computed from fetched state on first demand, then frozen
/// for the life of the owning instance.
///
/// The computation may itself trigger loads (and fail); a failed computation
/// leaves the cell empty so a later caller retries. Once a computation
/// succeeds the value never changes, even if the backing record is replaced
/// afterwards.
#[derive(Debug)]
pub struct Derived<T> {
    cell: OnceCell<T>,
}

impl<T> Derived<T> {
    pub fn new() -> Self {
        Derived {
            cell: OnceCell::new(),
        }
    }

    /// The frozen value, if a computation has succeeded.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }
}

impl<T: Clone> Derived<T> {
    /// Returns the frozen value, running `compute` first if none exists.
    /// Concurrent callers share one computation.
    pub async fn get_or_compute<E, F, Fut>(&self, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cell.get_or_try_init(compute).await.map(T::clone)
    }
}

impl<T> Default for Derived<T> {
    fn default() -> Self {
        Self::new()
    }
}
