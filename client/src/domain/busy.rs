//! Busy flags for actions that must not run twice at once.
//!
//! A flag is claimed with [`InFlight::try_begin`] and released when the
//! returned guard drops, whether the action succeeded or failed.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Set of keys whose action is currently running.
#[derive(Debug)]
pub struct InFlight<K> {
    active: Arc<Mutex<HashSet<K>>>,
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            active: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}

impl<K> Clone for InFlight<K> {
    fn clone(&self) -> Self {
        Self {
            active: Arc::clone(&self.active),
        }
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or `None` when its action is already running.
    ///
    /// # Examples
    /// ```
    /// use loanflow_client::domain::InFlight;
    ///
    /// let busy = InFlight::new();
    /// let guard = busy.try_begin(7_i64).expect("first claim");
    /// assert!(busy.try_begin(7_i64).is_none());
    /// drop(guard);
    /// assert!(!busy.is_busy(&7));
    /// ```
    pub fn try_begin(&self, key: K) -> Option<InFlightGuard<K>> {
        if !lock(&self.active).insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            active: Arc::clone(&self.active),
            key,
        })
    }

    /// Whether `key` is claimed.
    pub fn is_busy(&self, key: &K) -> bool {
        lock(&self.active).contains(key)
    }
}

/// Releases its key on drop.
#[derive(Debug)]
pub struct InFlightGuard<K: Eq + Hash> {
    active: Arc<Mutex<HashSet<K>>>,
    key: K,
}

impl<K: Eq + Hash> Drop for InFlightGuard<K> {
    fn drop(&mut self) {
        lock(&self.active).remove(&self.key);
    }
}

// A panic while holding the lock cannot leave the set half-updated.
fn lock<K>(active: &Mutex<HashSet<K>>) -> MutexGuard<'_, HashSet<K>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}
