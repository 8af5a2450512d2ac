//! Projections: named, pure derivations over store outputs.
//!
//! # Overview
//!
//! Projections are the **read side** of a store. The write side turns events
//! into an aggregate snapshot; projections turn that snapshot (or another
//! projection's output) into views optimized for consumers: lists, filtered
//! subsets, summary statistics.
//!
//! ```text
//! Write Side:                       Read Side:
//! ┌─────────────────┐              ┌──────────────────┐
//! │  Partitions     │   snapshot   │  list projection │──┬──► stats
//! │  (one per key)  │ ───────────► │                  │  │
//! └─────────────────┘              └──────────────────┘  └──► filtered list
//! ```
//!
//! ## Philosophy
//!
//! - **Pure**: the output depends only on the input, never on hidden state
//! - **Recomputed, not patched**: each upstream change produces a fresh output
//! - **Shared**: the runtime computes each projection once per change and
//!   hands the same value to every consumer
//!
//! ## Example
//!
//! ```
//! use streamstore_core::projection::Projection;
//!
//! struct WordCount;
//!
//! impl Projection for WordCount {
//!     type Input = String;
//!     type Output = usize;
//!
//!     fn name(&self) -> &'static str {
//!         "word_count"
//!     }
//!
//!     fn project(&self, input: &String) -> usize {
//!         input.split_whitespace().count()
//!     }
//! }
//!
//! assert_eq!(WordCount.project(&"buy more milk".to_string()), 3);
//! ```

/// A projection derives an output value from an input value.
///
/// Implementations must be deterministic: the runtime relies on equal
/// inputs producing equal outputs to suppress redundant notifications.
pub trait Projection: Send + Sync {
    /// Value the projection reads
    type Input: ?Sized;

    /// Value the projection produces
    type Output;

    /// Stable projection name, used in logs and metric labels
    fn name(&self) -> &'static str;

    /// Compute the output for `input`
    fn project(&self, input: &Self::Input) -> Self::Output;
}
