//! Domain types for a disposable camera roll.
//!
//! A [`Trip`] is one roll of film: it starts empty and active, accumulates up
//! to [`EXPOSURES_PER_ROLL`] photos in capture order, and is developed
//! (completed) either by the last exposure or by an explicit request.
//!
//! Field names serialize in camelCase and timestamps as integer milliseconds
//! since the Unix epoch, which is the persisted layout callers already rely on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of exposures on a roll.
pub const EXPOSURES_PER_ROLL: usize = 36;

/// Unique identifier for a trip
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Creates a `TripId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TripId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TripId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Unique identifier for a photo
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(String);

impl PhotoId {
    /// Creates a `PhotoId` from any string-like value
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PhotoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for PhotoId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single exposure on a roll.
///
/// `path` is an opaque reference to the image bytes (a data URI from the
/// camera, a file path, a blob key). The core never looks inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Unique identifier
    pub id: PhotoId,
    /// Opaque reference to the image
    pub path: String,
    /// Capture time
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Photo {
    /// Creates a new photo
    #[must_use]
    pub const fn new(id: PhotoId, path: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            path,
            timestamp,
        }
    }
}

/// One roll of film
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Unique identifier
    pub id: TripId,
    /// Display label, trimmed and non-empty
    pub name: String,
    /// When the roll was loaded
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_date: DateTime<Utc>,
    /// When the roll was developed (present iff `is_completed`)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub end_date: Option<DateTime<Utc>>,
    /// Exposures in capture order
    pub photos: Vec<Photo>,
    /// Whether the roll is finished
    pub is_completed: bool,
}

impl Trip {
    /// Creates a new, active, empty trip
    #[must_use]
    pub const fn new(id: TripId, name: String, start_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            start_date,
            end_date: None,
            photos: Vec::new(),
            is_completed: false,
        }
    }

    /// Number of photos taken on this roll
    #[must_use]
    pub fn exposures(&self) -> usize {
        self.photos.len()
    }

    /// Number of exposures still available (the film counter)
    #[must_use]
    pub fn exposures_left(&self) -> usize {
        EXPOSURES_PER_ROLL.saturating_sub(self.photos.len())
    }

    /// Whether the roll is full
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.photos.len() >= EXPOSURES_PER_ROLL
    }

    /// Whether the roll can still be shot
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_completed
    }

    /// First photo on the roll, used as the gallery thumbnail
    #[must_use]
    pub fn thumbnail(&self) -> Option<&Photo> {
        self.photos.first()
    }

    /// Whether a photo with this id is on the roll
    #[must_use]
    pub fn contains_photo(&self, id: &str) -> bool {
        self.photos.iter().any(|p| p.id.as_str() == id)
    }

    /// Marks the roll as developed
    ///
    /// Completion is terminal: a second call keeps the first `end_date`.
    pub fn complete(&mut self, completed_at: DateTime<Utc>) {
        if self.is_completed {
            return;
        }
        self.is_completed = true;
        self.end_date = Some(completed_at);
    }
}

/// The full, ordered collection of trips
///
/// Order is insertion order, which is also the persisted order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripState {
    /// All trips in persisted order
    pub trips: Vec<Trip>,
}

impl TripState {
    /// Creates an empty state
    #[must_use]
    pub const fn new() -> Self {
        Self { trips: Vec::new() }
    }

    /// Wraps an already loaded collection
    #[must_use]
    pub const fn from_trips(trips: Vec<Trip>) -> Self {
        Self { trips }
    }

    /// Returns the number of trips
    #[must_use]
    pub fn count(&self) -> usize {
        self.trips.len()
    }

    /// Returns a trip by ID
    #[must_use]
    pub fn get(&self, id: &TripId) -> Option<&Trip> {
        self.trips.iter().find(|t| &t.id == id)
    }

    /// Returns a mutable trip by ID
    pub fn get_mut(&mut self, id: &TripId) -> Option<&mut Trip> {
        self.trips.iter_mut().find(|t| &t.id == id)
    }

    /// Checks if a trip exists
    #[must_use]
    pub fn exists(&self, id: &TripId) -> bool {
        self.get(id).is_some()
    }

    /// The trip currently being shot, if any
    #[must_use]
    pub fn active_trip(&self) -> Option<&Trip> {
        self.trips.iter().find(|t| t.is_active())
    }

    /// Number of trips not yet completed
    ///
    /// Always 0 or 1 for a state produced by the lifecycle rules.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.trips.iter().filter(|t| t.is_active()).count()
    }

    /// Completed trips, most recently started first
    #[must_use]
    pub fn completed_trips(&self) -> Vec<&Trip> {
        let mut done: Vec<&Trip> = self.trips.iter().filter(|t| t.is_completed).collect();
        done.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        done
    }

    /// Whether `id` is already used by any trip or photo in the collection
    #[must_use]
    pub fn id_in_use(&self, id: &str) -> bool {
        self.trips
            .iter()
            .any(|t| t.id.as_str() == id || t.contains_photo(id))
    }

    /// Consumes the state, returning the collection
    #[must_use]
    pub fn into_trips(self) -> Vec<Trip> {
        self.trips
    }
}
