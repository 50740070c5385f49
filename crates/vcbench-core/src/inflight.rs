//! The set of exchanges awaiting acknowledgement.

use crate::exchange::ExchangeHandle;

/// Unordered collection of exchange handles that have been submitted but not
/// yet acknowledged.
///
/// Owned by the batch issuer's control loop; not shared across tasks.
#[derive(Debug, Default, Clone)]
pub struct InFlightSet {
    handles: Vec<ExchangeHandle>,
}

impl InFlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: ExchangeHandle) {
        self.handles.push(handle);
    }

    /// Remove `handle`; returns `false` if it was not tracked.
    pub fn remove(&mut self, handle: &ExchangeHandle) -> bool {
        match self.handles.iter().position(|h| h == handle) {
            Some(idx) => {
                self.handles.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    /// Copy of the current handles, so a poll round can remove entries while iterating.
    pub fn snapshot(&self) -> Vec<ExchangeHandle> {
        self.handles.clone()
    }

    /// Remove and return every tracked handle.
    pub fn drain(&mut self) -> Vec<ExchangeHandle> {
        std::mem::take(&mut self.handles)
    }

    pub fn contains(&self, handle: &ExchangeHandle) -> bool {
        self.handles.contains(handle)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
