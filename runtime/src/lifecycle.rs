//! Boundary service used by the camera, gallery and new-trip screens.
//!
//! Each mutation is one store transaction: load → validate → mutate → save →
//! return. Rejections come back as [`LifecycleError`] and are logged and
//! counted; nothing is retried here.

use crate::metrics::LifecycleMetrics;
use crate::store::TripStore;
use film_roll_core::{
    LifecycleError, Reducer, Trip, TripCommand, TripEnvironment, TripEvent, TripId, TripReducer,
    TripState,
};

/// Lifecycle operations over a [`TripStore`]
///
/// # Example
///
/// ```ignore
/// let lifecycle = Lifecycle::new(store, TripEnvironment::production());
///
/// let trip = lifecycle.create_trip("Paris").await?;
/// let trip = lifecycle.add_photo(&trip.id, "data:image/jpeg;base64,...").await?;
/// println!("{} exposures left", trip.exposures_left());
/// ```
#[derive(Debug)]
pub struct Lifecycle {
    store: TripStore,
    reducer: TripReducer,
    environment: TripEnvironment,
}

impl Lifecycle {
    /// Create a lifecycle service over `store`
    #[must_use]
    pub fn new(store: TripStore, environment: TripEnvironment) -> Self {
        Self {
            store,
            reducer: TripReducer::new(),
            environment,
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TripStore {
        &self.store
    }

    /// Load a new roll
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::InvalidName`] if `name` is blank after trimming
    /// - [`LifecycleError::ActiveTripExists`] if another roll is active
    /// - [`LifecycleError::Storage`] if persistence fails
    #[tracing::instrument(skip(self), name = "create_trip")]
    pub async fn create_trip(&self, name: &str) -> Result<Trip, LifecycleError> {
        self.run("create_trip", |state| {
            let trip = TripReducer::new_trip(state, name, &self.environment)?;
            let event = TripEvent::TripCreated { trip: trip.clone() };
            TripReducer::apply_event(state, &event);
            Ok((Some(event), trip))
        })
        .await
    }

    /// Expose one frame on `trip_id`
    ///
    /// Returns the updated trip; the 36th frame returns it already completed.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::TripNotFound`] if the trip does not exist
    /// - [`LifecycleError::RollFinished`] if the roll is full or developed
    /// - [`LifecycleError::Storage`] if persistence fails
    #[tracing::instrument(skip(self, path), name = "add_photo")]
    pub async fn add_photo(
        &self,
        trip_id: &TripId,
        path: impl Into<String> + Send,
    ) -> Result<Trip, LifecycleError> {
        let command = TripCommand::AddPhoto {
            trip_id: trip_id.clone(),
            path: path.into(),
        };

        self.execute_for(trip_id, command).await
    }

    /// Develop the roll now, whatever its exposure count
    ///
    /// Completing an already completed trip succeeds and keeps its end date.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::TripNotFound`] if the trip does not exist
    /// - [`LifecycleError::Storage`] if persistence fails
    #[tracing::instrument(skip(self), name = "complete_trip")]
    pub async fn complete_trip(&self, trip_id: &TripId) -> Result<Trip, LifecycleError> {
        let command = TripCommand::CompleteTrip {
            trip_id: trip_id.clone(),
        };

        self.execute_for(trip_id, command).await
    }

    /// Remove a trip and its photos
    ///
    /// Deleting an id that does not exist succeeds without writing.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Storage`] if persistence fails.
    #[tracing::instrument(skip(self), name = "delete_trip")]
    pub async fn delete_trip(&self, trip_id: &TripId) -> Result<(), LifecycleError> {
        let command = TripCommand::DeleteTrip {
            trip_id: trip_id.clone(),
        };

        let deleted = self.execute(command, |_, event| event.is_some()).await?;
        if !deleted {
            tracing::debug!(%trip_id, "Trip already absent, nothing to delete");
        }
        Ok(())
    }

    /// All trips in persisted order
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Storage`] if the backend cannot be read.
    pub async fn list_trips(&self) -> Result<Vec<Trip>, LifecycleError> {
        self.store.load_all().await
    }

    /// One trip by id
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Storage`] if the backend cannot be read.
    pub async fn get_trip(&self, trip_id: &TripId) -> Result<Option<Trip>, LifecycleError> {
        Ok(self
            .store
            .load_all()
            .await?
            .into_iter()
            .find(|t| &t.id == trip_id))
    }

    /// The roll currently being shot
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Storage`] if the backend cannot be read.
    pub async fn get_active_trip(&self) -> Result<Option<Trip>, LifecycleError> {
        let state = TripState::from_trips(self.store.load_all().await?);
        Ok(state.active_trip().cloned())
    }

    /// Developed rolls for the gallery, most recently started first
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Storage`] if the backend cannot be read.
    pub async fn completed_trips(&self) -> Result<Vec<Trip>, LifecycleError> {
        let state = TripState::from_trips(self.store.load_all().await?);
        Ok(state.completed_trips().into_iter().cloned().collect())
    }

    /// Run a command that targets one trip and return that trip afterwards
    async fn execute_for(
        &self,
        trip_id: &TripId,
        command: TripCommand,
    ) -> Result<Trip, LifecycleError> {
        self.execute(command, |state, _| state.get(trip_id).cloned())
            .await?
            .ok_or_else(|| LifecycleError::TripNotFound {
                trip_id: trip_id.clone(),
            })
    }

    /// Reduce `command` inside a store transaction, then project the result
    async fn execute<T, P>(&self, command: TripCommand, project: P) -> Result<T, LifecycleError>
    where
        P: FnOnce(&TripState, Option<&TripEvent>) -> T + Send,
        T: Send,
    {
        self.run(command.name(), |state| {
            let event = self.reducer.reduce(state, command, &self.environment)?;
            let projected = project(state, event.as_ref());
            Ok((event, projected))
        })
        .await
    }

    /// Run one mutation step as a store transaction, logging and counting
    /// the event it produced or the rejection
    async fn run<T, F>(&self, operation: &'static str, step: F) -> Result<T, LifecycleError>
    where
        F: FnOnce(&mut TripState) -> Result<(Option<TripEvent>, T), LifecycleError> + Send,
        T: Send,
    {
        let result = self.store.transact(step).await;

        match result {
            Ok((Some(event), projected)) => {
                LifecycleMetrics::record_event(&event);
                Self::log_event(&event);
                Ok(projected)
            }
            Ok((None, projected)) => {
                tracing::debug!(operation, "Command changed nothing");
                Ok(projected)
            }
            Err(err) => {
                LifecycleMetrics::record_rejection(operation, err.kind());
                tracing::warn!(operation, kind = %err.kind(), error = %err, "Command rejected");
                Err(err)
            }
        }
    }

    fn log_event(event: &TripEvent) {
        match event {
            TripEvent::TripCreated { trip } => {
                tracing::info!(trip_id = %trip.id, name = %trip.name, "Roll loaded");
            }
            TripEvent::PhotoExposed {
                trip_id,
                photo,
                roll_finished_at,
            } => {
                tracing::debug!(%trip_id, photo_id = %photo.id, "Frame exposed");
                if roll_finished_at.is_some() {
                    tracing::info!(%trip_id, "Last frame exposed, roll developed");
                }
            }
            TripEvent::TripCompleted { trip_id, .. } => {
                tracing::info!(%trip_id, "Roll developed early");
            }
            TripEvent::TripDeleted { trip_id } => {
                tracing::info!(%trip_id, "Trip deleted");
            }
        }
    }
}
