//! Prometheus metrics for observability and monitoring.
//!
//! This module provides metric collection for the store pipeline:
//! - Events merged onto the bus (by kind)
//! - Partition lifecycle (live partitions, unrouted events)
//! - Dispatch latency
//! - View recomputations (by projection name)
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed.
//!
//! # Example
//!
//! ```rust,no_run
//! use streamstore_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = MetricsExporter::new();
//! exporter.install()?;
//!
//! // ... drive a store ...
//!
//! if let Some(text) = exporter.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// In-process Prometheus exporter.
///
/// Installs the global recorder and renders the collected metrics in the
/// Prometheus text format on demand.
#[derive(Default)]
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl MetricsExporter {
    /// Create an exporter that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the global recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a metrics recorder is already installed (e.g., in tests), the
    /// existing recorder keeps receiving metrics and this exporter renders
    /// nothing.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005,
                    0.01,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Metrics recorder installed");
                Ok(())
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this exporter did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Store Metrics
    describe_counter!(
        "store_events_total",
        "Total number of events merged onto the bus, by kind"
    );
    describe_histogram!(
        "store_dispatch_duration_seconds",
        "Time taken to route, reduce and aggregate one event"
    );

    // Partition Metrics
    describe_gauge!(
        "store_partitions_live",
        "Number of partitions currently active"
    );
    describe_counter!(
        "store_partitions_opened_total",
        "Total number of partitions opened"
    );
    describe_counter!(
        "store_partitions_terminated_total",
        "Total number of partitions terminated"
    );
    describe_counter!(
        "store_events_unrouted_total",
        "Total number of events addressed to an absent partition"
    );

    // View Metrics
    describe_counter!(
        "view_recomputations_total",
        "Total number of projection recomputations, by view"
    );
    describe_counter!(
        "view_publications_total",
        "Total number of recomputations that changed the published value, by view"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record one dispatched event.
    pub fn record_dispatch(kind: &'static str, duration: Duration) {
        counter!("store_events_total", "kind" => kind).increment(1);
        histogram!("store_dispatch_duration_seconds").record(duration.as_secs_f64());
    }
}

/// Partition metrics recorder.
pub struct PartitionMetrics;

impl PartitionMetrics {
    /// Record the number of live partitions.
    #[allow(clippy::cast_precision_loss)] // Partition counts stay far below 2^52
    pub fn record_live(count: usize) {
        gauge!("store_partitions_live").set(count as f64);
    }

    /// Record a partition being opened.
    pub fn record_opened() {
        counter!("store_partitions_opened_total").increment(1);
    }

    /// Record a partition being terminated.
    pub fn record_terminated() {
        counter!("store_partitions_terminated_total").increment(1);
    }

    /// Record an event that had no partition to go to.
    pub fn record_unrouted(kind: &'static str) {
        counter!("store_events_unrouted_total", "kind" => kind).increment(1);
    }
}

/// View metrics recorder.
pub struct ViewMetrics;

impl ViewMetrics {
    /// Record a projection recomputation and whether it published a new value.
    pub fn record_recompute(view: &'static str, published: bool) {
        counter!("view_recomputations_total", "view" => view).increment(1);
        if published {
            counter!("view_publications_total", "view" => view).increment(1);
        }
    }
}
