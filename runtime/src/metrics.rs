//! Prometheus metrics for the trip store and lifecycle operations.
//!
//! Recording is always on (the `metrics` facade is a no-op until a recorder
//! is installed). [`MetricsExporter::install`] installs the Prometheus
//! recorder so the text exposition can be rendered.
//!
//! # Example
//!
//! ```rust,no_run
//! use film_roll_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut exporter = MetricsExporter::new();
//! exporter.install()?;
//!
//! // ... run lifecycle operations ...
//!
//! if let Some(text) = exporter.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use film_roll_core::{ErrorKind, TripEvent};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

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

/// Prometheus recorder handle.
#[derive(Default)]
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl MetricsExporter {
    /// Create an exporter with no recorder installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., by another test), this logs a
    /// warning and succeeds without a handle; metrics still go to the
    /// existing recorder.
    pub fn install(&mut self) -> Result<(), MetricsError> {
        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                register_metrics();
                self.handle = Some(handle);
                tracing::info!("Prometheus metrics recorder installed");
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
    describe_counter!(
        "film_roll_trips_created_total",
        "Total number of rolls loaded"
    );
    describe_counter!(
        "film_roll_photos_exposed_total",
        "Total number of frames exposed"
    );
    describe_counter!(
        "film_roll_rolls_completed_total",
        "Rolls developed, labelled by trigger (last_frame or manual)"
    );
    describe_counter!(
        "film_roll_trips_deleted_total",
        "Total number of trips deleted"
    );
    describe_counter!(
        "film_roll_lifecycle_rejections_total",
        "Lifecycle commands rejected, labelled by operation and error kind"
    );
    describe_histogram!(
        "film_roll_store_load_duration_seconds",
        "Time taken to read the trip collection from the backend"
    );
    describe_histogram!(
        "film_roll_store_save_duration_seconds",
        "Time taken to write the trip collection to the backend"
    );
    describe_counter!(
        "film_roll_store_errors_total",
        "Backend failures, labelled by direction (load or save)"
    );
    describe_gauge!(
        "film_roll_store_trips",
        "Number of trips in the last committed collection"
    );
}

/// Lifecycle metrics recorder.
pub struct LifecycleMetrics;

impl LifecycleMetrics {
    /// Record an accepted command.
    pub fn record_event(event: &TripEvent) {
        match event {
            TripEvent::TripCreated { .. } => {
                counter!("film_roll_trips_created_total").increment(1);
            }
            TripEvent::PhotoExposed {
                roll_finished_at, ..
            } => {
                counter!("film_roll_photos_exposed_total").increment(1);
                if roll_finished_at.is_some() {
                    counter!("film_roll_rolls_completed_total", "trigger" => "last_frame")
                        .increment(1);
                }
            }
            TripEvent::TripCompleted { .. } => {
                counter!("film_roll_rolls_completed_total", "trigger" => "manual").increment(1);
            }
            TripEvent::TripDeleted { .. } => {
                counter!("film_roll_trips_deleted_total").increment(1);
            }
        }
    }

    /// Record a rejected command.
    pub fn record_rejection(operation: &'static str, kind: ErrorKind) {
        counter!(
            "film_roll_lifecycle_rejections_total",
            "operation" => operation,
            "kind" => kind.as_str()
        )
        .increment(1);
    }
}

/// Trip store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record a backend read.
    pub fn record_load(duration: Duration) {
        histogram!("film_roll_store_load_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a backend write.
    pub fn record_save(duration: Duration) {
        histogram!("film_roll_store_save_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a backend failure.
    pub fn record_error(direction: &'static str) {
        counter!("film_roll_store_errors_total", "direction" => direction).increment(1);
    }

    /// Record the size of the committed collection.
    #[allow(clippy::cast_precision_loss)] // Trip counts stay far below 2^52
    pub fn record_trip_count(count: usize) {
        gauge!("film_roll_store_trips").set(count as f64);
    }
}
