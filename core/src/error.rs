//! Error types for lifecycle operations and persistence.
//!
//! Every variant carries the identifiers involved so callers can branch on
//! [`LifecycleError::kind`] without parsing messages.

use crate::types::TripId;
use thiserror::Error;

/// Errors raised by a persistence backend or the codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend could not be reached (quota, permissions, closed handle).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing failed part way.
    #[error("I/O error: {0}")]
    Io(String),

    /// The stored record exists but cannot be decoded.
    #[error("Corrupt record under key '{key}': {reason}")]
    Corrupt {
        /// Key of the unreadable record.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// The collection could not be encoded.
    #[error("Encoding error: {0}")]
    Encode(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// The five error kinds a caller can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input; ask the user to correct it.
    Validation,
    /// Would break the single-active-roll rule.
    Conflict,
    /// Stale reference; refresh the view.
    NotFound,
    /// The roll takes no more photos.
    Capacity,
    /// Persistence failed; retry or surface.
    Storage,
}

impl ErrorKind {
    /// Stable lowercase label, used for metrics and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Capacity => "capacity",
            Self::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by lifecycle operations.
///
/// None of these leave a partial write behind: when an operation fails the
/// persisted collection is exactly what it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The trip name was rejected.
    #[error("Invalid trip name: {reason}")]
    InvalidName {
        /// What was wrong with it.
        reason: String,
    },

    /// Another roll is still being shot.
    #[error("Trip {active_trip_id} is still active; complete or delete it first")]
    ActiveTripExists {
        /// The trip currently active.
        active_trip_id: TripId,
    },

    /// The id generator kept returning identifiers already in the store.
    #[error("Identifier '{id}' is already in use")]
    IdCollision {
        /// The last colliding id.
        id: String,
    },

    /// No trip with this id.
    #[error("Trip {trip_id} not found")]
    TripNotFound {
        /// The id that was looked up.
        trip_id: TripId,
    },

    /// The roll is developed and takes no more photos.
    #[error("Trip {trip_id} is finished with {exposures} exposures")]
    RollFinished {
        /// The finished trip.
        trip_id: TripId,
        /// Photos on the roll.
        exposures: usize,
    },

    /// Persistence failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LifecycleError {
    /// The kind of failure, for programmatic branching
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName { .. } => ErrorKind::Validation,
            Self::ActiveTripExists { .. } | Self::IdCollision { .. } => ErrorKind::Conflict,
            Self::TripNotFound { .. } => ErrorKind::NotFound,
            Self::RollFinished { .. } => ErrorKind::Capacity,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Whether repeating the same call may succeed
    ///
    /// Only storage failures qualify. Every other kind needs the caller to
    /// change its input or refresh its view first; repeating it unchanged
    /// fails the same way.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Storage)
    }
}
