//! Lifecycle rules for a roll of film.
//!
//! The reducer is the only code that builds or mutates [`Trip`] and [`Photo`]
//! records. It validates a [`TripCommand`] against the current [`TripState`],
//! turns it into a [`TripEvent`], and applies that event. It performs no I/O;
//! loading and saving around it is the store's job.
//!
//! ```text
//! ACTIVE(n < 35) --AddPhoto-------> ACTIVE(n + 1)
//! ACTIVE(35)     --AddPhoto-------> COMPLETED(36)   (automatic)
//! ACTIVE(n)      --CompleteTrip---> COMPLETED(n)    (manual)
//! any            --DeleteTrip-----> removed
//! ```

use crate::environment::TripEnvironment;
use crate::error::LifecycleError;
use crate::types::{EXPOSURES_PER_ROLL, Photo, PhotoId, Trip, TripId, TripState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many times a colliding id is redrawn before giving up.
const MAX_ID_ATTEMPTS: usize = 8;

/// The Reducer trait - validates a command and applies the resulting event
///
/// # Type Parameters
///
/// - `State`: The domain state this reducer operates on
/// - `Command`: Requests to change state
/// - `Event`: Facts produced by accepted commands
/// - `Environment`: The injected dependencies this reducer needs
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The command type this reducer accepts
    type Command;

    /// The event type produced by accepted commands
    type Event;

    /// The rejection type
    type Error;

    /// The environment type with injected dependencies
    type Environment;

    /// Reduce a command into a state change
    ///
    /// On success the returned event has already been applied to `state`.
    /// `Ok(None)` means the command was legal but changed nothing.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the command is rejected; `state` is then
    /// untouched.
    fn reduce(
        &self,
        state: &mut Self::State,
        command: Self::Command,
        env: &Self::Environment,
    ) -> Result<Option<Self::Event>, Self::Error>;
}

/// Requests issued by the camera, gallery and new-trip screens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripCommand {
    /// Load a new roll
    CreateTrip {
        /// Display name, trimmed before use
        name: String,
    },

    /// Expose one frame
    AddPhoto {
        /// Trip to add to
        trip_id: TripId,
        /// Opaque image reference from the camera
        path: String,
    },

    /// Develop the roll early
    CompleteTrip {
        /// Trip to complete
        trip_id: TripId,
    },

    /// Throw the roll away
    DeleteTrip {
        /// Trip to delete
        trip_id: TripId,
    },
}

impl TripCommand {
    /// Operation name, used in logs and metric labels
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateTrip { .. } => "create_trip",
            Self::AddPhoto { .. } => "add_photo",
            Self::CompleteTrip { .. } => "complete_trip",
            Self::DeleteTrip { .. } => "delete_trip",
        }
    }
}

/// Facts produced by accepted commands
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripEvent {
    /// A new, empty, active trip was created
    TripCreated {
        /// The new trip
        trip: Trip,
    },

    /// A photo was appended
    PhotoExposed {
        /// Trip it was appended to
        trip_id: TripId,
        /// The photo
        photo: Photo,
        /// Set when this was the last frame; the roll completes in the same event
        roll_finished_at: Option<DateTime<Utc>>,
    },

    /// The roll was completed on request
    TripCompleted {
        /// Trip that was completed
        trip_id: TripId,
        /// Completion time
        completed_at: DateTime<Utc>,
    },

    /// The trip and its photos were removed
    TripDeleted {
        /// Trip that was removed
        trip_id: TripId,
    },
}

impl TripEvent {
    /// The trip this event concerns
    #[must_use]
    pub const fn trip_id(&self) -> &TripId {
        match self {
            Self::TripCreated { trip } => &trip.id,
            Self::PhotoExposed { trip_id, .. }
            | Self::TripCompleted { trip_id, .. }
            | Self::TripDeleted { trip_id } => trip_id,
        }
    }

    /// Whether this event finished a roll
    #[must_use]
    pub const fn completes_roll(&self) -> bool {
        matches!(
            self,
            Self::TripCompleted { .. }
                | Self::PhotoExposed {
                    roll_finished_at: Some(_),
                    ..
                }
        )
    }
}

/// Reducer for the trip collection
#[derive(Clone, Copy, Debug, Default)]
pub struct TripReducer;

impl TripReducer {
    /// Creates a new `TripReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a trip name, returning the trimmed form
    fn validate_name(name: &str) -> Result<String, LifecycleError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(LifecycleError::InvalidName {
                reason: "Trip name cannot be empty".to_string(),
            });
        }

        Ok(trimmed.to_string())
    }

    /// Validates a `CreateTrip` command
    fn validate_create_trip(state: &TripState) -> Result<(), LifecycleError> {
        if let Some(active) = state.active_trip() {
            return Err(LifecycleError::ActiveTripExists {
                active_trip_id: active.id.clone(),
            });
        }

        Ok(())
    }

    /// Validates an `AddPhoto` command, returning the current exposure count
    fn validate_add_photo(state: &TripState, trip_id: &TripId) -> Result<usize, LifecycleError> {
        let Some(trip) = state.get(trip_id) else {
            return Err(LifecycleError::TripNotFound {
                trip_id: trip_id.clone(),
            });
        };

        if trip.is_completed || trip.is_full() {
            return Err(LifecycleError::RollFinished {
                trip_id: trip_id.clone(),
                exposures: trip.exposures(),
            });
        }

        Ok(trip.exposures())
    }

    /// Draws an id unused by any trip or photo in `state`
    fn fresh_id(state: &TripState, env: &TripEnvironment) -> Result<String, LifecycleError> {
        let mut last = String::new();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = env.ids.next_id();
            if !state.id_in_use(&id) {
                return Ok(id);
            }
            last = id;
        }

        Err(LifecycleError::IdCollision { id: last })
    }

    /// Validates a `CreateTrip` and builds the trip it would add
    ///
    /// Does not touch `state`; pair it with [`TripReducer::apply_event`] on a
    /// [`TripEvent::TripCreated`] to commit.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::InvalidName`] if `name` is blank after trimming
    /// - [`LifecycleError::ActiveTripExists`] if another roll is active
    /// - [`LifecycleError::IdCollision`] if no unused id could be drawn
    pub fn new_trip(
        state: &TripState,
        name: &str,
        env: &TripEnvironment,
    ) -> Result<Trip, LifecycleError> {
        let name = Self::validate_name(name)?;
        Self::validate_create_trip(state)?;

        let id = TripId::new(Self::fresh_id(state, env)?);
        Ok(Trip::new(id, name, env.now_millis()))
    }

    /// Applies an event to state
    ///
    /// Also used to replay a recorded event sequence onto a state.
    pub fn apply_event(state: &mut TripState, event: &TripEvent) {
        match event {
            TripEvent::TripCreated { trip } => {
                state.trips.push(trip.clone());
            }
            TripEvent::PhotoExposed {
                trip_id,
                photo,
                roll_finished_at,
            } => {
                if let Some(trip) = state.get_mut(trip_id) {
                    trip.photos.push(photo.clone());
                    if let Some(at) = roll_finished_at {
                        trip.complete(*at);
                    }
                }
            }
            TripEvent::TripCompleted {
                trip_id,
                completed_at,
            } => {
                if let Some(trip) = state.get_mut(trip_id) {
                    trip.complete(*completed_at);
                }
            }
            TripEvent::TripDeleted { trip_id } => {
                state.trips.retain(|t| &t.id != trip_id);
            }
        }
    }
}

impl Reducer for TripReducer {
    type State = TripState;
    type Command = TripCommand;
    type Event = TripEvent;
    type Error = LifecycleError;
    type Environment = TripEnvironment;

    fn reduce(
        &self,
        state: &mut TripState,
        command: TripCommand,
        env: &TripEnvironment,
    ) -> Result<Option<TripEvent>, LifecycleError> {
        let event = match command {
            TripCommand::CreateTrip { name } => TripEvent::TripCreated {
                trip: Self::new_trip(state, &name, env)?,
            },

            TripCommand::AddPhoto { trip_id, path } => {
                let exposures = Self::validate_add_photo(state, &trip_id)?;

                let now = env.now_millis();
                let photo = Photo::new(PhotoId::new(Self::fresh_id(state, env)?), path, now);
                let roll_finished_at = (exposures + 1 == EXPOSURES_PER_ROLL).then_some(now);

                TripEvent::PhotoExposed {
                    trip_id,
                    photo,
                    roll_finished_at,
                }
            }

            TripCommand::CompleteTrip { trip_id } => {
                let Some(trip) = state.get(&trip_id) else {
                    return Err(LifecycleError::TripNotFound { trip_id });
                };

                if trip.is_completed {
                    return Ok(None);
                }

                TripEvent::TripCompleted {
                    trip_id,
                    completed_at: env.now_millis(),
                }
            }

            TripCommand::DeleteTrip { trip_id } => {
                if !state.exists(&trip_id) {
                    return Ok(None);
                }

                TripEvent::TripDeleted { trip_id }
            }
        };

        Self::apply_event(state, &event);
        Ok(Some(event))
    }
}
