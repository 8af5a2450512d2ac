//! The Store - runtime coordinator for a keyed reducer.

use crate::aggregate::{Aggregator, Snapshot};
use crate::bus::{Envelope, EventBus, EventTap};
use crate::cell::{Subscription, Versioned};
use crate::metrics::StoreMetrics;
use crate::registry::{PartitionRegistry, Transition};
use crate::StoreConfig;
use std::sync::Arc;
use std::time::Instant;
use streamstore_core::environment::{IdGenerator, SequentialIdGenerator};
use streamstore_core::partition::{Intent, KeyOf, KeyedReducer, Partitioned};

/// How one submitted intent affected the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// A new entity appeared
    Opened,
    /// An existing entity changed
    Updated,
    /// The event reached its entity but left it as it was
    Unchanged,
    /// An entity was removed
    Closed,
    /// The event addressed no live entity and was dropped
    Unrouted,
}

impl Change {
    fn of<K, S>(transition: &Transition<K, S>, published: bool) -> Self {
        match transition {
            Transition::Opened { .. } => Self::Opened,
            Transition::Updated { .. } if published => Self::Updated,
            Transition::Updated { .. } => Self::Unchanged,
            Transition::Terminated { .. } => Self::Closed,
            Transition::Unrouted { .. } => Self::Unrouted,
        }
    }

    /// Returns true if a new snapshot was published
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Opened | Self::Updated | Self::Closed)
    }
}

/// Result of [`Store::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<K> {
    /// Position of the event in the merged stream
    pub sequence: u64,
    /// Partition the event was routed to
    pub key: K,
    /// Effect on the aggregate
    pub change: Change,
}

/// The Store - runtime coordinator for a keyed reducer
///
/// The Store manages:
/// 1. The event bus (tagging, sequencing, taps)
/// 2. The partition registry (one reducer state per live key)
/// 3. The aggregate snapshot (published to subscribers)
/// 4. Environment (injected dependencies)
///
/// Every call to [`Store::send`] completes routing, reduction and
/// aggregation before returning. Sending requires `&mut self`, so a store
/// has exactly one writer; readers use subscriptions.
///
/// # Type Parameters
///
/// - `I`: Intent type accepted by the store
/// - `R`: Keyed reducer folding the tagged events
///
/// # Example
///
/// ```ignore
/// let mut store = Store::new(TodoReducer::new(), TodoEnvironment::new());
///
/// let outcome = store.send(TodoIntent::Create { text: "buy milk".into() });
/// assert_eq!(outcome.change, Change::Opened);
///
/// let live = store.state(|snapshot| snapshot.len());
/// ```
pub struct Store<I, R>
where
    I: Intent<Event = R::Action>,
    R: KeyedReducer,
    R::Action: Partitioned,
{
    bus: EventBus<I>,
    registry: PartitionRegistry<R>,
    aggregate: Aggregator<KeyOf<R>, R::State>,
    environment: R::Environment,
}

impl<I, R> Store<I, R>
where
    I: Intent<Event = R::Action>,
    R: KeyedReducer,
    R::Action: Partitioned + Clone,
    R::State: Clone + PartialEq,
{
    /// Create a store with default configuration
    ///
    /// Identities come from a [`SequentialIdGenerator`] starting at zero.
    #[must_use]
    pub fn new(reducer: R, environment: R::Environment) -> Self {
        Self::with_config(reducer, environment, &StoreConfig::default())
    }

    /// Create a store with custom configuration
    #[must_use]
    pub fn with_config(reducer: R, environment: R::Environment, config: &StoreConfig) -> Self {
        let ids = Arc::new(SequentialIdGenerator::starting_at(config.first_id));
        Self::with_id_generator(reducer, environment, ids, config)
    }

    /// Create a store drawing identities from a custom generator
    ///
    /// `config.first_id` is ignored; the generator decides the sequence.
    #[must_use]
    pub fn with_id_generator(
        reducer: R,
        environment: R::Environment,
        ids: Arc<dyn IdGenerator>,
        config: &StoreConfig,
    ) -> Self {
        Self {
            bus: EventBus::new(ids, config.event_capacity),
            registry: PartitionRegistry::new(reducer),
            aggregate: Aggregator::new(),
            environment,
        }
    }

    /// Submit an intent and run it through the pipeline
    ///
    /// 1. Merges the intent onto the bus (tagging, sequencing, taps)
    /// 2. Routes the tagged event to its partition and folds it
    /// 3. Publishes a new snapshot if the aggregate changed
    #[tracing::instrument(skip_all, name = "store_send")]
    pub fn send(&mut self, intent: I) -> Outcome<KeyOf<R>> {
        let start = Instant::now();

        let Envelope { sequence, event } = self.bus.publish(intent);
        let kind = event.kind();
        tracing::debug!(sequence, kind, "Processing event");

        let transition = self.registry.dispatch(event, &self.environment);
        let published = self.aggregate.apply(&transition);
        let change = Change::of(&transition, published);

        StoreMetrics::record_dispatch(kind, start.elapsed());
        tracing::debug!(sequence, ?change, "Event processed");

        Outcome {
            sequence,
            key: transition.into_key(),
            change,
        }
    }

    /// Latest aggregate snapshot
    #[must_use]
    pub fn snapshot(&self) -> Versioned<Snapshot<KeyOf<R>, R::State>> {
        self.aggregate.current()
    }

    /// Read the aggregate through a closure
    ///
    /// ```ignore
    /// let done = store.state(|snapshot| snapshot.values().filter(|t| t.done).count());
    /// ```
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Snapshot<KeyOf<R>, R::State>) -> T,
    {
        self.aggregate.read(f)
    }

    /// Subscribe to aggregate snapshots
    #[must_use]
    pub fn subscribe_snapshot(&self) -> Subscription<Snapshot<KeyOf<R>, R::State>> {
        self.aggregate.subscribe()
    }

    /// Observe every event merged from now on
    #[must_use]
    pub fn subscribe_events(&self) -> EventTap<R::Action> {
        self.bus.tap()
    }

    /// Number of events merged so far
    #[must_use]
    pub const fn events_published(&self) -> u64 {
        self.bus.published()
    }

    /// Number of live partitions
    #[must_use]
    pub fn live_partitions(&self) -> usize {
        self.registry.len()
    }

    /// Injected dependencies
    #[must_use]
    pub const fn environment(&self) -> &R::Environment {
        &self.environment
    }
}
