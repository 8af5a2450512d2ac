//! Reactive todo store built on streamstore.
//!
//! Todos are independent entities driven by four events: create, edit,
//! toggle and delete. Each todo lives in its own partition; the store
//! recombines the partitions into one snapshot and derives three views from
//! it:
//!
//! - the materialized list, in creation order
//! - the list narrowed by the selected [`Filter`]
//! - summary [`Stats`]
//!
//! # Quick Start
//!
//! ```
//! use todo_store::{Stats, TodoStore};
//!
//! let mut store = TodoStore::new();
//! let a = store.submit_create("a");
//! let b = store.submit_create("b");
//! if let (Some(a), Some(b)) = (a, b) {
//!     store.submit_toggle(a);
//!     store.submit_delete(b);
//! }
//!
//! assert_eq!(
//!     store.stats(),
//!     Stats { total: 1, completed: 1, uncompleted: 0, percent_completed: 100 }
//! );
//! ```
//!
//! Every output can also be watched from another task:
//!
//! ```no_run
//! use futures::StreamExt;
//! use todo_store::TodoStore;
//!
//! # async fn example(store: &TodoStore) {
//! let mut stats = Box::pin(store.subscribe_stats().into_stream());
//! while let Some(stats) = stats.next().await {
//!     println!("{} of {} done", stats.completed, stats.total);
//! }
//! # }
//! ```

pub mod filter;
pub mod reducer;
pub mod store;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use filter::{Filter, FilterSelector, ParseFilterError};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use store::{Recomputations, TodoStore};
pub use streamstore_runtime::{Change, StoreConfig, StoreError, Subscription, Versioned};
pub use types::{Stats, Todo, TodoEvent, TodoId, TodoIntent};
