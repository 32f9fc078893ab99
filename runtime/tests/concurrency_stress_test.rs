//! Concurrency stress tests for last-frame scenarios.
//!
//! These tests verify that under concurrent captures the store serializes
//! every load → mutate → save window, so no frame is lost and no roll
//! exceeds its 36 exposures.
//!
//! Run with: `cargo test --test concurrency_stress_test -- --nocapture`

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use film_roll_core::{EXPOSURES_PER_ROLL, ErrorKind, TripEnvironment};
use film_roll_runtime::{Lifecycle, TripStore};
use film_roll_testing::mocks::InMemoryBackend;
use std::collections::HashSet;
use std::sync::Arc;

fn lifecycle(backend: Arc<InMemoryBackend>) -> Arc<Lifecycle> {
    Arc::new(Lifecycle::new(
        TripStore::new(backend, "trips"),
        TripEnvironment::production(),
    ))
}

/// Test: 40 concurrent captures against an empty roll.
///
/// Verifies that:
/// - Exactly 36 captures succeed
/// - Exactly 4 captures fail with a capacity error
/// - The persisted roll holds 36 distinct photos and is completed
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_frame_concurrency_40_captures() {
    let backend = Arc::new(InMemoryBackend::new());
    let lifecycle = lifecycle(backend.clone());
    let trip = lifecycle.create_trip("Paris").await.unwrap();

    let mut handles = vec![];
    for i in 0..40 {
        let lifecycle = Arc::clone(&lifecycle);
        let trip_id = trip.id.clone();
        handles.push(tokio::spawn(async move {
            lifecycle.add_photo(&trip_id, format!("frame-{i}")).await
        }));
    }

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("Task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let capacity_failures = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == ErrorKind::Capacity))
        .count();

    println!("Successes: {successes}, capacity failures: {capacity_failures}");
    assert_eq!(successes, EXPOSURES_PER_ROLL);
    assert_eq!(capacity_failures, 40 - EXPOSURES_PER_ROLL);

    // Exactly one capture saw the roll finish
    let finishing = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .filter(|t| t.exposures() == EXPOSURES_PER_ROLL)
        .count();
    assert_eq!(finishing, 1);

    let stored = backend.trips("trips").unwrap();
    assert_eq!(stored.len(), 1);
    let roll = &stored[0];
    assert_eq!(roll.exposures(), EXPOSURES_PER_ROLL);
    assert!(roll.is_completed);
    assert!(roll.end_date.is_some());

    let ids: HashSet<_> = roll.photos.iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids.len(), EXPOSURES_PER_ROLL);
}

/// Test: concurrent create attempts leave exactly one active roll.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_create_single_active_roll() {
    let backend = Arc::new(InMemoryBackend::new());
    let lifecycle = lifecycle(backend.clone());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let lifecycle = Arc::clone(&lifecycle);
            tokio::spawn(async move { lifecycle.create_trip(&format!("Trip {i}")).await })
        })
        .collect();

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.expect("Task panicked"))
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::Conflict));

    let stored = backend.trips("trips").unwrap();
    assert_eq!(stored.iter().filter(|t| t.is_active()).count(), 1);
}

/// Test: two stores sharing a backend behave like two tabs.
///
/// Each store serializes its own writes only, but every transaction reloads
/// before mutating, so sequential operations from both sides are all kept.
#[tokio::test]
async fn test_two_stores_share_one_record() {
    let backend = Arc::new(InMemoryBackend::new());
    let tab_a = lifecycle(backend.clone());
    let tab_b = lifecycle(backend.clone());

    let trip = tab_a.create_trip("Paris").await.unwrap();
    for i in 0..10 {
        let tab = if i % 2 == 0 { &tab_a } else { &tab_b };
        tab.add_photo(&trip.id, format!("frame-{i}")).await.unwrap();
    }

    let seen_by_a = tab_a.get_trip(&trip.id).await.unwrap().unwrap();
    assert_eq!(seen_by_a.exposures(), 10);
    assert_eq!(tab_b.get_active_trip().await.unwrap(), Some(seen_by_a));
}
