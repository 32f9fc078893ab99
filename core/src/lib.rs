//! # Film Roll Core
//!
//! Data model and lifecycle rules for a 36-exposure disposable camera.
//!
//! A user loads a roll (a [`Trip`]), shoots up to [`EXPOSURES_PER_ROLL`]
//! photos, and the roll is developed once the last frame is exposed or the
//! user finishes early. This crate holds the pure part of that system:
//!
//! - **Types**: [`Trip`], [`Photo`], and the ordered [`TripState`] collection
//! - **Reducer**: [`TripReducer`] validates a [`TripCommand`] and applies the
//!   resulting [`TripEvent`]
//! - **Environment**: injected [`Clock`] and [`IdGenerator`]
//! - **Persistence**: the [`TripBackend`] key-value contract and its codec
//! - **Errors**: [`LifecycleError`] tagged by [`ErrorKind`]
//!
//! The runtime crate wraps these in a store that serializes every
//! load-validate-save cycle.
//!
//! ## Example
//!
//! ```
//! use film_roll_core::{Reducer, TripCommand, TripEnvironment, TripEvent, TripReducer, TripState};
//!
//! let env = TripEnvironment::production();
//! let mut state = TripState::new();
//!
//! let event = TripReducer::new()
//!     .reduce(&mut state, TripCommand::CreateTrip { name: "Paris".to_string() }, &env)?;
//!
//! assert!(matches!(event, Some(TripEvent::TripCreated { .. })));
//! assert_eq!(state.active_trip().map(|t| t.name.as_str()), Some("Paris"));
//! # Ok::<(), film_roll_core::LifecycleError>(())
//! ```

pub mod environment;
pub mod error;
pub mod persistence;
pub mod reducer;
pub mod types;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use environment::{Clock, IdGenerator, SystemClock, TripEnvironment, UuidGenerator};
pub use error::{ErrorKind, LifecycleError, StorageError};
pub use persistence::{BackendFuture, TripBackend, codec};
pub use reducer::{Reducer, TripCommand, TripEvent, TripReducer};
pub use types::{EXPOSURES_PER_ROLL, Photo, PhotoId, Trip, TripId, TripState};
