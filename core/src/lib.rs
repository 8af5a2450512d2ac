//! # Streamstore Core
//!
//! Core traits and types for partitioned reactive stores.
//!
//! A store turns a stream of user intents into a keyed collection of entity
//! states and a set of derived views. This crate holds the pure pieces of
//! that pipeline; the runtime crate wires them together.
//!
//! ## Core Concepts
//!
//! - **Intent**: An untagged user request (e.g. "create a todo with this text")
//! - **Event**: A tagged, routable fact produced by merging an intent onto the bus
//! - **Partition**: The isolated state of one entity, addressed by the event's key
//! - **Reducer**: Pure function `(State, Event, Environment) → (State, Effect)`
//! - **Effect**: What the runtime must do with the partition after reduction
//! - **Projection**: Pure, named derivation from one value to another
//!
//! ## Data Flow
//!
//! ```text
//! intent ─► bus (tag + id) ─► registry (route by key) ─► reducer (per key)
//!                                                             │
//!            views ◄── projections ◄── snapshot ◄── aggregator ┘
//! ```
//!
//! ## Example
//!
//! ```
//! use streamstore_core::effect::Effect;
//! use streamstore_core::reducer::Reducer;
//!
//! #[derive(Clone, Debug, Default)]
//! struct Counter {
//!     value: i64,
//! }
//!
//! enum CounterEvent {
//!     Add(i64),
//!     Close,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = Counter;
//!     type Action = CounterEvent;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut Counter, action: CounterEvent, _env: &()) -> Effect {
//!         match action {
//!             CounterEvent::Add(n) => {
//!                 state.value += n;
//!                 Effect::None
//!             }
//!             CounterEvent::Close => Effect::Complete,
//!         }
//!     }
//! }
//!
//! let mut state = Counter::default();
//! assert_eq!(CounterReducer.reduce(&mut state, CounterEvent::Add(2), &()), Effect::None);
//! assert_eq!(state.value, 2);
//! assert!(CounterReducer.reduce(&mut state, CounterEvent::Close, &()).is_complete());
//! ```

/// Partition routing: keyed events, intents and keyed reducers
pub mod partition;

/// Named pure derivations over store outputs
pub mod projection;

/// Reducer module - The core trait for per-partition business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effect)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state of a single partition
    /// - `Action`: The event type this reducer folds
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for TodoReducer {
    ///     type State = Todo;
    ///     type Action = TodoEvent;
    ///     type Environment = TodoEnvironment;
    ///
    ///     fn reduce(&self, todo: &mut Todo, event: TodoEvent, _env: &TodoEnvironment) -> Effect {
    ///         match event {
    ///             TodoEvent::Toggle { .. } => {
    ///                 todo.done = !todo.done;
    ///                 Effect::None
    ///             }
    ///             TodoEvent::Delete { .. } => Effect::Complete,
    ///             // ...
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and an effect
        ///
        /// This is a pure function that:
        /// 1. Updates state in place
        /// 2. Returns the effect the runtime must apply to the partition
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to the partition's current state
        /// - `action`: The event to fold
        /// - `env`: Reference to injected dependencies
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Effect;
    }
}

/// Effect module - What a reducer asks of the runtime
///
/// Effects are descriptions, not execution. The partition registry reads
/// them after each reduction and applies them to the partition lifecycle.
pub mod effect {
    /// Effect type - describes what happens to a partition after a reduction
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[must_use]
    pub enum Effect {
        /// The partition stays active and its (possibly changed) state is published
        None,

        /// The partition ends with this event
        ///
        /// The state produced by this reduction is discarded, not re-emitted,
        /// and the entity leaves the aggregate.
        Complete,
    }

    impl Effect {
        /// Returns true if this effect terminates the partition
        #[must_use]
        pub const fn is_complete(self) -> bool {
            matches!(self, Self::Complete)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All sources of non-determinism (here: identity generation) are abstracted
/// behind traits and injected, so tests can substitute predictable versions.
pub mod environment {
    use std::sync::atomic::{AtomicU64, Ordering};

    /// `IdGenerator` trait - hands out identities for newly created entities
    ///
    /// Implementations must never return the same value twice over the
    /// lifetime of a store; deleted identities are not reused.
    ///
    /// # Examples
    ///
    /// ```
    /// use streamstore_core::environment::{IdGenerator, SequentialIdGenerator};
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), 0);
    /// assert_eq!(ids.next_id(), 1);
    /// ```
    pub trait IdGenerator: Send + Sync {
        /// Get the next unused identity
        fn next_id(&self) -> u64;
    }

    /// Monotonic in-memory counter
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator starting at zero
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(0)
        }

        /// Create a generator whose first identity is `first`
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> u64 {
            self.next.fetch_add(1, Ordering::Relaxed)
        }
    }
}
