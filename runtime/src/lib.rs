//! # Film Roll Runtime
//!
//! Runtime for the film-roll lifecycle: a durable [`TripStore`] over a
//! pluggable backend, and the [`Lifecycle`] service the screens call.
//!
//! ## Core Components
//!
//! - **`TripStore`**: serialized load → mutate → save over a [`TripBackend`]
//! - **`Lifecycle`**: create, expose, develop and delete trips
//! - **`FileBackend`**: one JSON record per key under a data directory
//! - **Metrics**: Prometheus counters and histograms for both
//!
//! ## Example
//!
//! ```ignore
//! use film_roll_runtime::{FileBackend, Lifecycle, StoreConfig, TripStore};
//! use film_roll_core::TripEnvironment;
//! use std::sync::Arc;
//!
//! let config = StoreConfig::from_env();
//! let backend = Arc::new(FileBackend::new(&config.data_dir));
//! let lifecycle = Lifecycle::new(
//!     TripStore::new(backend, config.storage_key),
//!     TripEnvironment::production(),
//! );
//!
//! let trip = lifecycle.create_trip("Lisbon").await?;
//! lifecycle.add_photo(&trip.id, "data:image/jpeg;base64,...").await?;
//! ```
//!
//! [`TripBackend`]: film_roll_core::TripBackend

/// File-backed persistence
pub mod backend;

/// Configuration loaded from the environment
pub mod config;

/// Lifecycle operations over the store
pub mod lifecycle;

/// Prometheus metrics for observability
pub mod metrics;

/// The trip store
pub mod store;

pub use backend::FileBackend;
pub use config::{DEFAULT_STORAGE_KEY, StoreConfig};
pub use lifecycle::Lifecycle;
pub use metrics::{MetricsError, MetricsExporter};
pub use store::TripStore;
