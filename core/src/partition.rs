//! Partition routing types.
//!
//! A store splits one heterogeneous event stream into independent
//! partitions, one per entity identity. This module defines what an event
//! must expose to be routed, how an untagged intent becomes such an event,
//! and how a reducer seeds the state of a freshly opened partition.
//!
//! # Routing Rules
//!
//! - Every event names exactly one partition via [`Partitioned::partition_key`]
//! - Only events reporting [`Partitioned::opens_partition`] may create a partition
//! - Events addressed to an absent partition are dropped by the router
//!
//! Because absent partitions can only be created by opening events, and
//! opening events carry identities that were never issued before, an entity
//! cannot be resurrected after its partition completes.

use crate::environment::IdGenerator;
use crate::reducer::Reducer;
use std::fmt::Debug;
use std::hash::Hash;

/// An event that can be routed to a single partition.
///
/// # Examples
///
/// ```
/// use streamstore_core::partition::Partitioned;
///
/// enum SessionEvent {
///     Opened { id: u64 },
///     Ping { id: u64 },
/// }
///
/// impl Partitioned for SessionEvent {
///     type Key = u64;
///
///     fn partition_key(&self) -> u64 {
///         match self {
///             Self::Opened { id } | Self::Ping { id } => *id,
///         }
///     }
///
///     fn opens_partition(&self) -> bool {
///         matches!(self, Self::Opened { .. })
///     }
///
///     fn kind(&self) -> &'static str {
///         match self {
///             Self::Opened { .. } => "opened",
///             Self::Ping { .. } => "ping",
///         }
///     }
/// }
///
/// assert_eq!(SessionEvent::Ping { id: 7 }.partition_key(), 7);
/// assert!(!SessionEvent::Ping { id: 7 }.opens_partition());
/// ```
pub trait Partitioned {
    /// Identity of the partition this event belongs to
    type Key: Clone + Eq + Ord + Hash + Debug;

    /// The partition this event is addressed to
    fn partition_key(&self) -> Self::Key;

    /// Whether this event creates its partition when the partition is absent
    fn opens_partition(&self) -> bool;

    /// Short, stable name of the event variant (used for logs and metric labels)
    fn kind(&self) -> &'static str;
}

/// An untagged request that becomes a routable event when merged onto the bus.
///
/// Merging is where identities are assigned: an intent that creates an
/// entity draws a fresh id from the generator, every other intent already
/// names its target.
pub trait Intent {
    /// The tagged event this intent merges into
    type Event: Partitioned;

    /// Tag the intent, drawing an identity from `ids` if it creates an entity
    fn into_event(self, ids: &dyn IdGenerator) -> Self::Event;
}

/// A reducer that folds the events of a single partition.
///
/// The runtime creates one state per live key by calling
/// [`KeyedReducer::seed`] and then immediately folding the opening event
/// into it, so the opening event's payload is always applied.
pub trait KeyedReducer: Reducer
where
    Self::Action: Partitioned,
{
    /// Initial state of a partition, before its opening event is applied
    fn seed(&self, key: &<Self::Action as Partitioned>::Key) -> Self::State;
}

/// Convenience alias for the key type of a keyed reducer.
pub type KeyOf<R> = <<R as Reducer>::Action as Partitioned>::Key;
