//! Partition registry: routes each event to the reducer state of its key.
//!
//! The registry is an explicit table `key -> state` plus a dispatcher:
//!
//! ```text
//! event ──► key present? ──yes──► reduce ──► Effect::None     ──► Updated
//!              │                         └─► Effect::Complete ──► Terminated (entry removed)
//!              no
//!              │
//!              ▼
//!         opens partition? ──yes──► seed + reduce ──► Opened
//!              │
//!              no ──► Unrouted (dropped, no state touched)
//! ```
//!
//! Completed partitions are removed rather than kept as tombstones. Since
//! only opening events create entries, an event for a removed key can never
//! reach a reducer again.

use crate::metrics::PartitionMetrics;
use std::collections::HashMap;
use streamstore_core::partition::{KeyOf, KeyedReducer, Partitioned};

/// Lifecycle of a partition after one reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle<S> {
    /// The partition is live with this state
    Active(S),
    /// The partition ended; absorbing
    Terminated,
}

/// What one dispatched event did to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<K, S> {
    /// A new partition was created and folded its opening event
    Opened {
        /// Partition key
        key: K,
        /// State after the opening event
        state: S,
    },
    /// A live partition folded an event
    Updated {
        /// Partition key
        key: K,
        /// State after the event
        state: S,
    },
    /// A live partition folded its final event and was removed
    Terminated {
        /// Partition key
        key: K,
    },
    /// No live partition matched and the event could not open one
    Unrouted {
        /// Key the event was addressed to
        key: K,
    },
}

impl<K, S> Transition<K, S> {
    /// Key the event was addressed to
    #[must_use]
    pub const fn key(&self) -> &K {
        match self {
            Self::Opened { key, .. }
            | Self::Updated { key, .. }
            | Self::Terminated { key }
            | Self::Unrouted { key } => key,
        }
    }

    /// Consume the transition, keeping its key
    #[must_use]
    pub fn into_key(self) -> K {
        match self {
            Self::Opened { key, .. }
            | Self::Updated { key, .. }
            | Self::Terminated { key }
            | Self::Unrouted { key } => key,
        }
    }
}

/// Registry of live partitions for one keyed reducer.
pub struct PartitionRegistry<R>
where
    R: KeyedReducer,
    R::Action: Partitioned,
{
    reducer: R,
    partitions: HashMap<KeyOf<R>, R::State>,
}

impl<R> PartitionRegistry<R>
where
    R: KeyedReducer,
    R::Action: Partitioned,
    R::State: Clone,
{
    /// Create an empty registry
    #[must_use]
    pub fn new(reducer: R) -> Self {
        Self {
            reducer,
            partitions: HashMap::new(),
        }
    }

    /// Route `event` to its partition and fold it.
    pub fn dispatch(
        &mut self,
        event: R::Action,
        env: &R::Environment,
    ) -> Transition<KeyOf<R>, R::State> {
        let key = event.partition_key();
        let kind = event.kind();

        if let Some(state) = self.partitions.get_mut(&key) {
            return match fold(&self.reducer, state, event, env) {
                Lifecycle::Active(state) => Transition::Updated { key, state },
                Lifecycle::Terminated => {
                    self.partitions.remove(&key);
                    tracing::debug!(?key, kind, "Partition terminated");
                    PartitionMetrics::record_terminated();
                    PartitionMetrics::record_live(self.partitions.len());
                    Transition::Terminated { key }
                },
            };
        }

        if !event.opens_partition() {
            tracing::debug!(?key, kind, "Dropping event for absent partition");
            PartitionMetrics::record_unrouted(kind);
            return Transition::Unrouted { key };
        }

        let mut state = self.reducer.seed(&key);
        match fold(&self.reducer, &mut state, event, env) {
            Lifecycle::Active(state) => {
                self.partitions.insert(key.clone(), state.clone());
                tracing::debug!(?key, kind, "Partition opened");
                PartitionMetrics::record_opened();
                PartitionMetrics::record_live(self.partitions.len());
                Transition::Opened { key, state }
            },
            // An opening event that also completes never becomes visible.
            Lifecycle::Terminated => Transition::Unrouted { key },
        }
    }

    /// State of a live partition
    #[must_use]
    pub fn get(&self, key: &KeyOf<R>) -> Option<&R::State> {
        self.partitions.get(key)
    }

    /// Whether `key` has a live partition
    #[must_use]
    pub fn contains(&self, key: &KeyOf<R>) -> bool {
        self.partitions.contains_key(key)
    }

    /// Number of live partitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// Whether no partition is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }
}

fn fold<R>(
    reducer: &R,
    state: &mut R::State,
    event: R::Action,
    env: &R::Environment,
) -> Lifecycle<R::State>
where
    R: KeyedReducer,
    R::Action: Partitioned,
    R::State: Clone,
{
    if reducer.reduce(state, event, env).is_complete() {
        Lifecycle::Terminated
    } else {
        Lifecycle::Active(state.clone())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use streamstore_core::effect::Effect;
    use streamstore_core::reducer::Reducer;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TallyEvent {
        Open { id: u32, start: i64 },
        Add { id: u32, amount: i64 },
        Close { id: u32 },
    }

    impl Partitioned for TallyEvent {
        type Key = u32;

        fn partition_key(&self) -> u32 {
            match self {
                Self::Open { id, .. } | Self::Add { id, .. } | Self::Close { id } => *id,
            }
        }

        fn opens_partition(&self) -> bool {
            matches!(self, Self::Open { .. })
        }

        fn kind(&self) -> &'static str {
            match self {
                Self::Open { .. } => "open",
                Self::Add { .. } => "add",
                Self::Close { .. } => "close",
            }
        }
    }

    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = i64;
        type Action = TallyEvent;
        type Environment = ();

        fn reduce(&self, total: &mut i64, event: TallyEvent, _env: &()) -> Effect {
            match event {
                TallyEvent::Open { start, .. } => {
                    *total = start;
                    Effect::None
                },
                TallyEvent::Add { amount, .. } => {
                    *total += amount;
                    Effect::None
                },
                TallyEvent::Close { .. } => Effect::Complete,
            }
        }
    }

    impl KeyedReducer for TallyReducer {
        fn seed(&self, _key: &u32) -> i64 {
            0
        }
    }

    #[test]
    fn test_opening_event_creates_partition() {
        let mut registry = PartitionRegistry::new(TallyReducer);

        let transition = registry.dispatch(TallyEvent::Open { id: 1, start: 10 }, &());

        assert_eq!(transition, Transition::Opened { key: 1, state: 10 });
        assert_eq!(registry.get(&1), Some(&10));
    }

    #[test]
    fn test_events_route_only_to_their_key() {
        let mut registry = PartitionRegistry::new(TallyReducer);
        registry.dispatch(TallyEvent::Open { id: 1, start: 0 }, &());
        registry.dispatch(TallyEvent::Open { id: 2, start: 100 }, &());

        let transition = registry.dispatch(TallyEvent::Add { id: 1, amount: 5 }, &());

        assert_eq!(transition, Transition::Updated { key: 1, state: 5 });
        assert_eq!(registry.get(&2), Some(&100));
    }

    #[test]
    fn test_non_opening_event_for_absent_key_is_unrouted() {
        let mut registry = PartitionRegistry::new(TallyReducer);

        let transition = registry.dispatch(TallyEvent::Add { id: 9, amount: 5 }, &());

        assert_eq!(transition, Transition::Unrouted { key: 9 });
        assert!(registry.is_empty());
    }

    #[test]
    fn test_completion_removes_partition() {
        let mut registry = PartitionRegistry::new(TallyReducer);
        registry.dispatch(TallyEvent::Open { id: 1, start: 3 }, &());

        let transition = registry.dispatch(TallyEvent::Close { id: 1 }, &());

        assert_eq!(transition, Transition::Terminated { key: 1 });
        assert!(!registry.contains(&1));
    }

    #[test]
    fn test_terminated_partition_ignores_later_events() {
        let mut registry = PartitionRegistry::new(TallyReducer);
        registry.dispatch(TallyEvent::Open { id: 1, start: 3 }, &());
        registry.dispatch(TallyEvent::Close { id: 1 }, &());

        assert_eq!(
            registry.dispatch(TallyEvent::Add { id: 1, amount: 1 }, &()),
            Transition::Unrouted { key: 1 }
        );
        assert_eq!(
            registry.dispatch(TallyEvent::Close { id: 1 }, &()),
            Transition::Unrouted { key: 1 }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_transition_key_accessors() {
        let transition: Transition<u32, i64> = Transition::Terminated { key: 4 };
        assert_eq!(*transition.key(), 4);
        assert_eq!(transition.into_key(), 4);
    }
}
