//! # Film Roll Testing
//!
//! Testing utilities and helpers for the film roll crates.
//!
//! This crate provides:
//! - Deterministic clock and id generator for the trip environment
//! - In-memory and failure-injecting trip backends
//! - A Given-When-Then harness for reducers
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use film_roll_testing::mocks::{InMemoryBackend, test_environment};
//! use film_roll_runtime::{Lifecycle, TripStore};
//!
//! #[tokio::test]
//! async fn test_first_frame() {
//!     let store = TripStore::new(Arc::new(InMemoryBackend::new()), "trips");
//!     let lifecycle = Lifecycle::new(store, test_environment());
//!
//!     let trip = lifecycle.create_trip("Paris").await.unwrap();
//!     let trip = lifecycle.add_photo(&trip.id, "frame").await.unwrap();
//!     assert_eq!(trip.exposures_left(), 35);
//! }
//! ```

use chrono::{DateTime, Utc};
use film_roll_core::environment::{Clock, IdGenerator};

mod backend_mocks;


/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc};
    use film_roll_core::TripEnvironment;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, Ordering};

    pub use crate::backend_mocks::{FailingBackend, InMemoryBackend};

    /// Fixed clock for deterministic tests
    ///
    /// Returns the same time until moved with [`FixedClock::advance`].
    ///
    /// # Example
    ///
    /// ```
    /// use film_roll_testing::mocks::FixedClock;
    /// use film_roll_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug)]
    pub struct FixedClock {
        time: Mutex<DateTime<Utc>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Mutex::new(time),
            }
        }

        /// Move the clock forward
        #[allow(clippy::unwrap_used)] // Poisoned only after a panicking test
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap();
            *time += by;
        }
    }

    impl Clock for FixedClock {
        #[allow(clippy::unwrap_used)] // Poisoned only after a panicking test
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap()
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable ids: `id-1`, `id-2`, ...
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start counting from 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            format!("id-{n}")
        }
    }

    /// Environment with [`test_clock`] and a fresh [`SequentialIdGenerator`]
    #[must_use]
    pub fn test_environment() -> TripEnvironment {
        TripEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(SequentialIdGenerator::new()),
        )
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use film_roll_core::EXPOSURES_PER_ROLL;
    use proptest::prelude::*;

    /// Trip names that survive trimming, padded with surrounding whitespace
    pub fn trip_name() -> impl Strategy<Value = String> {
        "[ \t]{0,3}[A-Za-z0-9]([A-Za-z0-9 '-]{0,600}[A-Za-z0-9])?[ \t]{0,3}"
    }

    /// Names that are empty once trimmed
    pub fn blank_name() -> impl Strategy<Value = String> {
        proptest::collection::vec(prop_oneof![Just(' '), Just('\t'), Just('\n')], 0..8)
            .prop_map(|chars| chars.into_iter().collect())
    }

    /// Opaque image references as the camera hands them over
    pub fn photo_path() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9+/]{1,64}".prop_map(|data| format!("data:image/jpeg;base64,{data}"))
    }

    /// Number of frames to shoot, up to a full roll
    pub fn exposure_count() -> impl Strategy<Value = usize> {
        0..=EXPOSURES_PER_ROLL
    }
}

pub use reducer_test::ReducerTest;
// Re-export commonly used items
pub use mocks::{FixedClock, SequentialIdGenerator, test_clock, test_environment};
