//! Dependency injection traits
//!
//! Time and identifier generation are the only two non-deterministic inputs
//! to the lifecycle rules. Both are injected so tests can pin them.

use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```
/// use film_roll_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let now = clock.now();
/// assert!(now.timestamp() > 0);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of fresh identifiers for trips and photos
pub trait IdGenerator: Send + Sync {
    /// Produce an identifier not previously returned by this generator
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs, unique across trips and photos alike
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Environment dependencies for the trip reducer
#[derive(Clone)]
pub struct TripEnvironment {
    /// Clock for generating timestamps
    pub clock: Arc<dyn Clock>,
    /// Generator for trip and photo ids
    pub ids: Arc<dyn IdGenerator>,
}

impl TripEnvironment {
    /// Creates a new `TripEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and UUID ids
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    /// Current time truncated to whole milliseconds
    ///
    /// Persisted timestamps are integer milliseconds, so anything finer would
    /// not survive a save/load cycle.
    #[must_use]
    pub fn now_millis(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }
}

impl std::fmt::Debug for TripEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripEnvironment").finish_non_exhaustive()
    }
}
