//! Collection aggregator: one keyed snapshot of every live partition.

use crate::cell::{SharedCell, Subscription, Versioned};
use crate::registry::Transition;
use std::collections::BTreeMap;

/// Every live partition's latest state, ordered by key.
pub type Snapshot<K, S> = BTreeMap<K, S>;

/// Folds partition transitions into a published [`Snapshot`].
///
/// Each transition that changes the set of live entities or any entity's
/// state produces exactly one new snapshot version. Transitions that leave
/// the snapshot as it was (unrouted events, updates to an identical state)
/// publish nothing.
pub struct Aggregator<K, S> {
    snapshot: SharedCell<Snapshot<K, S>>,
}

impl<K, S> Aggregator<K, S>
where
    K: Ord + Clone,
    S: Clone + PartialEq,
{
    /// Create an aggregator with an empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: SharedCell::new("aggregate", BTreeMap::new()),
        }
    }

    /// Apply a transition; returns true if a new snapshot was published.
    pub fn apply(&self, transition: &Transition<K, S>) -> bool {
        let changes = self.snapshot.read(|snapshot| match transition {
            Transition::Opened { key, state } | Transition::Updated { key, state } => {
                snapshot.get(key) != Some(state)
            },
            Transition::Terminated { key } => snapshot.contains_key(key),
            Transition::Unrouted { .. } => false,
        });

        if !changes {
            return false;
        }

        self.snapshot.update(|snapshot| match transition {
            Transition::Opened { key, state } | Transition::Updated { key, state } => {
                snapshot.insert(key.clone(), state.clone());
            },
            Transition::Terminated { key } => {
                snapshot.remove(key);
            },
            Transition::Unrouted { .. } => {},
        });
        true
    }

    /// Latest snapshot
    #[must_use]
    pub fn current(&self) -> Versioned<Snapshot<K, S>> {
        self.snapshot.current()
    }

    /// Read the latest snapshot through a closure
    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Snapshot<K, S>) -> T,
    {
        self.snapshot.read(f)
    }

    /// Subscribe to snapshot changes
    #[must_use]
    pub fn subscribe(&self) -> Subscription<Snapshot<K, S>> {
        self.snapshot.subscribe()
    }
}

impl<K, S> Default for Aggregator<K, S>
where
    K: Ord + Clone,
    S: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}
