//! Projection cells: a projection plus the shared cell holding its output.

use crate::cell::{SharedCell, Subscription, Versioned};
use crate::metrics::ViewMetrics;
use std::sync::atomic::{AtomicU64, Ordering};
use streamstore_core::projection::Projection;

/// Owns one derived view.
///
/// The view is computed eagerly at construction, so subscribers always find
/// a value, and then recomputed once per [`ProjectionCell::refresh`]. All
/// subscribers share the single result.
pub struct ProjectionCell<P>
where
    P: Projection,
{
    projection: P,
    output: SharedCell<P::Output>,
    recomputations: AtomicU64,
}

impl<P> ProjectionCell<P>
where
    P: Projection,
    P::Output: PartialEq,
{
    /// Create the cell and compute the initial output from `input`
    #[must_use]
    pub fn new(projection: P, input: &P::Input) -> Self {
        let initial = projection.project(input);
        let output = SharedCell::new(projection.name(), initial);
        Self {
            projection,
            output,
            recomputations: AtomicU64::new(0),
        }
    }

    /// Recompute from `input`; returns true if the published output changed.
    pub fn refresh(&self, input: &P::Input) -> bool {
        let name = self.projection.name();
        let published = self.output.publish(self.projection.project(input));
        self.recomputations.fetch_add(1, Ordering::Relaxed);
        ViewMetrics::record_recompute(name, published);
        tracing::trace!(view = name, published, "Projection recomputed");
        published
    }

    /// Latest output
    #[must_use]
    pub fn current(&self) -> Versioned<P::Output> {
        self.output.current()
    }

    /// Subscribe to output changes
    #[must_use]
    pub fn subscribe(&self) -> Subscription<P::Output> {
        self.output.subscribe()
    }

    /// Projection name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.projection.name()
    }

    /// Number of refreshes since construction
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.recomputations.load(Ordering::Relaxed)
    }
}
