//! Given-When-Then tests for the trip reducer.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use chrono::{DateTime, Duration, Utc};
use film_roll_core::environment::Clock;
use film_roll_core::{
    EXPOSURES_PER_ROLL, ErrorKind, LifecycleError, Photo, PhotoId, Reducer, Trip, TripCommand,
    TripEvent, TripId, TripReducer, TripState,
};
use film_roll_testing::properties::{blank_name, exposure_count, photo_path, trip_name};
use film_roll_testing::reducer_test::assertions::{
    assert_completes_roll, assert_kind, assert_no_event,
};
use film_roll_testing::{ReducerTest, test_clock, test_environment};
use proptest::prelude::*;

fn start() -> DateTime<Utc> {
    test_clock().now()
}

fn trip_with(id: &str, exposures: usize) -> Trip {
    let mut trip = Trip::new(TripId::from(id), "Paris".to_string(), start());
    for i in 0..exposures {
        trip.photos.push(Photo::new(
            PhotoId::from(format!("{id}-p{i}").as_str()),
            format!("frame-{i}"),
            start() + Duration::seconds(i64::try_from(i).unwrap()),
        ));
    }
    trip
}

fn completed(mut trip: Trip, at: DateTime<Utc>) -> Trip {
    trip.complete(at);
    trip
}

#[test]
fn create_on_empty_collection() {
    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::new())
        .when_command(TripCommand::CreateTrip {
            name: "  Lisbon ".to_string(),
        })
        .then_event(|event| {
            let Some(TripEvent::TripCreated { trip }) = event else {
                panic!("expected TripCreated, got {event:?}");
            };
            assert_eq!(trip.name, "Lisbon");
            assert_eq!(trip.start_date, start());
            assert!(trip.photos.is_empty());
        })
        .then_state(|state| {
            assert_eq!(state.count(), 1);
            assert_eq!(state.active_count(), 1);
        })
        .run();
}

#[test]
fn create_while_roll_active_is_a_conflict() {
    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::from_trips(vec![trip_with("t1", 3)]))
        .when_command(TripCommand::CreateTrip {
            name: "Rome".to_string(),
        })
        .then_error(|err| {
            assert_kind(err, ErrorKind::Conflict);
            assert_eq!(
                err,
                &LifecycleError::ActiveTripExists {
                    active_trip_id: TripId::from("t1")
                }
            );
        })
        .then_state(|state| assert_eq!(state.count(), 1))
        .run();
}

#[test]
fn create_after_completion_is_allowed() {
    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::from_trips(vec![completed(
            trip_with("t1", 36),
            start(),
        )]))
        .when_command(TripCommand::CreateTrip {
            name: "Rome".to_string(),
        })
        .then_state(|state| {
            assert_eq!(state.count(), 2);
            assert_eq!(state.active_trip().map(|t| t.name.as_str()), Some("Rome"));
        })
        .then_event(|event| assert!(event.is_some()))
        .run();
}

#[test]
fn thirty_sixth_frame_develops_the_roll() {
    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::from_trips(vec![trip_with("t1", EXPOSURES_PER_ROLL - 1)]))
        .when_command(TripCommand::AddPhoto {
            trip_id: TripId::from("t1"),
            path: "last".to_string(),
        })
        .then_event(assert_completes_roll)
        .then_state(|state| {
            let trip = state.get(&TripId::from("t1")).unwrap();
            assert_eq!(trip.exposures(), EXPOSURES_PER_ROLL);
            assert!(trip.is_completed);
            assert_eq!(trip.end_date, Some(start()));
            assert_eq!(state.active_trip(), None);
        })
        .run();
}

#[test]
fn full_roll_rejects_another_frame() {
    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::from_trips(vec![completed(
            trip_with("t1", EXPOSURES_PER_ROLL),
            start(),
        )]))
        .when_command(TripCommand::AddPhoto {
            trip_id: TripId::from("t1"),
            path: "extra".to_string(),
        })
        .then_error(|err| assert_kind(err, ErrorKind::Capacity))
        .then_state(|state| {
            assert_eq!(
                state.get(&TripId::from("t1")).unwrap().exposures(),
                EXPOSURES_PER_ROLL
            );
        })
        .run();
}

#[test]
fn photo_for_unknown_trip_is_not_found() {
    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::new())
        .when_command(TripCommand::AddPhoto {
            trip_id: TripId::from("ghost"),
            path: "frame".to_string(),
        })
        .then_error(|err| assert_kind(err, ErrorKind::NotFound))
        .run();
}

#[test]
fn completing_twice_keeps_first_end_date() {
    let first = start() - Duration::days(1);

    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::from_trips(vec![completed(trip_with("t1", 5), first)]))
        .when_command(TripCommand::CompleteTrip {
            trip_id: TripId::from("t1"),
        })
        .then_event(assert_no_event)
        .then_state(move |state| {
            assert_eq!(state.get(&TripId::from("t1")).unwrap().end_date, Some(first));
        })
        .run();
}

#[test]
fn deleting_missing_trip_is_a_no_op() {
    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::from_trips(vec![trip_with("t1", 0)]))
        .when_command(TripCommand::DeleteTrip {
            trip_id: TripId::from("t2"),
        })
        .then_event(assert_no_event)
        .then_state(|state| assert_eq!(state.count(), 1))
        .run();
}

#[test]
fn deleting_active_trip_frees_the_camera() {
    ReducerTest::new(TripReducer::new())
        .with_env(test_environment())
        .given_state(TripState::from_trips(vec![trip_with("t1", 12)]))
        .when_command(TripCommand::DeleteTrip {
            trip_id: TripId::from("t1"),
        })
        .then_event(|event| {
            assert_eq!(
                event,
                Some(&TripEvent::TripDeleted {
                    trip_id: TripId::from("t1")
                })
            );
        })
        .then_state(|state| {
            assert_eq!(state.count(), 0);
            assert_eq!(state.active_trip(), None);
        })
        .run();
}

proptest! {
    #[test]
    fn any_trimmed_name_creates_a_trip(name in trip_name()) {
        let mut state = TripState::new();
        let event = TripReducer::new()
            .reduce(&mut state, TripCommand::CreateTrip { name: name.clone() }, &test_environment())
            .unwrap();

        prop_assert!(event.is_some());
        prop_assert_eq!(&state.trips[0].name, name.trim());
    }

    #[test]
    fn blank_names_are_rejected(name in blank_name()) {
        let mut state = TripState::new();
        let err = TripReducer::new()
            .reduce(&mut state, TripCommand::CreateTrip { name }, &test_environment())
            .unwrap_err();

        prop_assert_eq!(err.kind(), ErrorKind::Validation);
        prop_assert_eq!(state.count(), 0);
    }

    #[test]
    fn exposures_left_tracks_frames_shot(
        frames in exposure_count(),
        path in photo_path(),
    ) {
        let env = test_environment();
        let reducer = TripReducer::new();
        let mut state = TripState::new();
        reducer
            .reduce(&mut state, TripCommand::CreateTrip { name: "Paris".into() }, &env)
            .unwrap();
        let trip_id = state.trips[0].id.clone();

        for _ in 0..frames {
            reducer
                .reduce(
                    &mut state,
                    TripCommand::AddPhoto { trip_id: trip_id.clone(), path: path.clone() },
                    &env,
                )
                .unwrap();
        }

        let trip = state.get(&trip_id).unwrap();
        prop_assert_eq!(trip.exposures_left(), EXPOSURES_PER_ROLL - frames);
        prop_assert_eq!(trip.is_completed, frames == EXPOSURES_PER_ROLL);
        prop_assert!(state.active_count() <= 1);
    }
}
