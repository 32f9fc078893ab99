//! The trip store: an owned snapshot of the collection over an injected backend.
//!
//! Storage is whole-collection read-modify-write. Every mutation goes
//! through [`TripStore::transact`], which holds one async mutex across the
//! backend read, the in-memory change, and the backend write. Two mutations
//! against the same store therefore never interleave their windows, which is
//! what keeps two near-simultaneous captures from both seeing 35 exposures.

use crate::metrics::StoreMetrics;
use film_roll_core::{LifecycleError, StorageError, Trip, TripBackend, TripState, codec};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

/// Durable, serialized access to the trip collection
///
/// # Example
///
/// ```ignore
/// let store = TripStore::new(Arc::new(FileBackend::new("./data")), "trips");
///
/// let trips = store.load_all().await?;
/// store.save_all(trips).await?;
/// ```
pub struct TripStore {
    backend: Arc<dyn TripBackend>,
    key: String,
    snapshot: RwLock<TripState>,
    write_lock: Mutex<()>,
}

impl TripStore {
    /// Create a store over `backend`, keeping the collection under `key`
    #[must_use]
    pub fn new(backend: Arc<dyn TripBackend>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            snapshot: RwLock::new(TripState::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Storage key of the collection
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted collection and refresh the snapshot
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Storage`] if the backend fails or the record
    /// is corrupt; the snapshot is then left as it was.
    #[tracing::instrument(skip(self), fields(key = %self.key), name = "trip_store_load_all")]
    pub async fn load_all(&self) -> Result<Vec<Trip>, LifecycleError> {
        let _guard = self.write_lock.lock().await;
        let state = self.read_backend().await?;
        let trips = state.trips.clone();
        self.commit(state).await;
        Ok(trips)
    }

    /// Replace the persisted collection
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Storage`] if encoding or the write fails; the
    /// snapshot and the persisted record are then unchanged.
    #[tracing::instrument(skip(self, trips), fields(key = %self.key, trips = trips.len()), name = "trip_store_save_all")]
    pub async fn save_all(&self, trips: Vec<Trip>) -> Result<(), LifecycleError> {
        let _guard = self.write_lock.lock().await;
        let state = TripState::from_trips(trips);
        self.write_backend(&state).await?;
        self.commit(state).await;
        Ok(())
    }

    /// Last committed collection, without touching the backend
    pub async fn snapshot(&self) -> TripState {
        self.snapshot.read().await.clone()
    }

    /// Run `f` against the freshly loaded collection and persist the result
    ///
    /// The sequence is load → `f` on a working copy → save → commit, all under
    /// the store's mutex. If `f` leaves the collection equal to what was
    /// loaded, nothing is written.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or [`LifecycleError::Storage`] if loading
    /// or saving fails. In every error case the persisted record is the one
    /// that was loaded and the snapshot reflects it.
    #[tracing::instrument(skip(self, f), fields(key = %self.key), name = "trip_store_transact")]
    pub async fn transact<T, F>(&self, f: F) -> Result<T, LifecycleError>
    where
        F: FnOnce(&mut TripState) -> Result<T, LifecycleError> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        tracing::trace!("Acquired store write lock");

        let current = self.read_backend().await?;
        let mut working = current.clone();

        let outcome = f(&mut working);
        if outcome.is_err() || working == current {
            self.commit(current).await;
            return outcome;
        }

        if let Err(err) = self.write_backend(&working).await {
            self.commit(current).await;
            return Err(err.into());
        }

        tracing::debug!(trips = working.count(), "Committed collection");
        self.commit(working).await;
        outcome
    }

    async fn commit(&self, state: TripState) {
        StoreMetrics::record_trip_count(state.count());
        *self.snapshot.write().await = state;
    }

    async fn read_backend(&self) -> Result<TripState, StorageError> {
        let start = Instant::now();
        let result = self.backend.get(&self.key).await;
        StoreMetrics::record_load(start.elapsed());

        let decoded = result.and_then(|bytes| codec::decode_record(&self.key, bytes.as_deref()));
        match decoded {
            Ok(trips) => {
                tracing::trace!(trips = trips.len(), "Loaded collection");
                Ok(TripState::from_trips(trips))
            }
            Err(err) => {
                StoreMetrics::record_error("load");
                tracing::error!(error = %err, "Failed to load trip collection");
                Err(err)
            }
        }
    }

    async fn write_backend(&self, state: &TripState) -> Result<(), StorageError> {
        let start = Instant::now();
        let result = match codec::encode(&state.trips) {
            Ok(bytes) => self.backend.set(&self.key, bytes).await,
            Err(err) => Err(err),
        };
        StoreMetrics::record_save(start.elapsed());

        if let Err(err) = &result {
            StoreMetrics::record_error("save");
            tracing::error!(error = %err, "Failed to save trip collection");
        }
        result
    }
}

impl std::fmt::Debug for TripStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripStore")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
