//! # Streamstore Runtime
//!
//! Runtime implementation for partitioned reactive stores.
//!
//! This crate provides the Store that turns intents into a keyed aggregate
//! snapshot, plus the cells that share derived views with any number of
//! subscribers.
//!
//! ## Core Components
//!
//! - **Event Bus**: Tags intents, assigns identities, sequences and fans out events
//! - **Partition Registry**: One reducer state per live key, explicit routing table
//! - **Aggregator**: Folds partition transitions into a published snapshot
//! - **Shared Cells**: Versioned, retained-last-value broadcast of each output
//! - **Projection Cells**: Derived views recomputed once per upstream change
//!
//! ## Execution Model
//!
//! Everything is synchronous. [`Store::send`] routes, reduces and aggregates
//! before it returns, so there is never more than one update in flight.
//! Readers hold [`Subscription`]s that can read the latest value at any time
//! and await the next one from any task.
//!
//! ## Example
//!
//! ```ignore
//! use streamstore_runtime::Store;
//!
//! let mut store = Store::new(TodoReducer::new(), TodoEnvironment::new());
//! let mut snapshots = store.subscribe_snapshot();
//!
//! store.send(TodoIntent::Create { text: "buy milk".into() });
//!
//! assert_eq!(snapshots.current().len(), 1);
//! ```

/// Collection aggregator and snapshot type
pub mod aggregate;

/// Event bus and taps
pub mod bus;

/// Shared value cells and subscriptions
pub mod cell;

/// Prometheus metrics for observability
pub mod metrics;

/// Projection cells for derived views
pub mod projection;

/// Partition registry and lifecycle
pub mod registry;

/// Store runtime
pub mod store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while observing a Store
    ///
    /// Sending intents never fails; these errors only concern readers.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// The store owning this subscription or tap was dropped
        ///
        /// The last published value stays readable through `current()`.
        #[error("Store channel closed")]
        ChannelClosed,

        /// An event tap fell behind and lost events
        ///
        /// The tap resumes with the oldest event still buffered.
        #[error("Event tap lagged behind by {skipped} events")]
        Lagged {
            /// Number of events that were dropped for this tap
            skipped: u64,
        },
    }
}

pub use aggregate::{Aggregator, Snapshot};
pub use bus::{Envelope, EventBus, EventTap};
pub use cell::{SharedCell, Subscription, Versioned};
pub use error::StoreError;
pub use projection::ProjectionCell;
pub use registry::{Lifecycle, PartitionRegistry, Transition};
pub use store::{Change, Outcome, Store};

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use streamstore_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_event_capacity(256)
///     .with_first_id(1);
///
/// assert_eq!(config.event_capacity, 256);
/// assert_eq!(config.first_id, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// How many events an event tap may fall behind before losing events
    pub event_capacity: usize,
    /// First identity handed out by the default id generator
    pub first_id: u64,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    ///
    /// # Arguments
    ///
    /// - `event_capacity`: Buffer size of each event tap (raised to 1 if zero)
    /// - `first_id`: Origin of the sequential id generator
    #[must_use]
    pub const fn new(event_capacity: usize, first_id: u64) -> Self {
        Self {
            event_capacity,
            first_id,
        }
    }

    /// Set the event tap capacity
    #[must_use]
    pub const fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Set the first generated identity
    #[must_use]
    pub const fn with_first_id(mut self, first_id: u64) -> Self {
        self.first_id = first_id;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            first_id: 0,
        }
    }
}
