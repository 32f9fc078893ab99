//! Camera demo binary
//!
//! Loads a roll, shoots all 36 frames through the lifecycle service, then
//! prints the gallery. State lives under `FILM_ROLL_DATA_DIR`, so running it
//! twice shows the first roll developed in the gallery.

use anyhow::Context;
use film_roll_core::{EXPOSURES_PER_ROLL, ErrorKind, TripEnvironment};
use film_roll_runtime::{FileBackend, Lifecycle, MetricsExporter, StoreConfig, TripStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = StoreConfig::from_env();

    // Initialize tracing
    let level = &config.log_level;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("camera_demo={level},film_roll_runtime={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut exporter = MetricsExporter::new();
    if config.metrics_enabled {
        exporter.install().context("installing metrics recorder")?;
    }

    info!(data_dir = %config.data_dir.display(), key = %config.storage_key, "Opening trip store");
    let backend = Arc::new(FileBackend::new(&config.data_dir));
    let lifecycle = Lifecycle::new(
        TripStore::new(backend, config.storage_key.clone()),
        TripEnvironment::production(),
    );

    // A previous run may have left a roll half shot
    let trip = match lifecycle.get_active_trip().await? {
        Some(trip) => {
            info!(trip_id = %trip.id, exposures = trip.exposures(), "Resuming active roll");
            trip
        }
        None => lifecycle
            .create_trip("Demo roll")
            .await
            .context("loading a new roll")?,
    };

    println!("=== {} ({} exposures left) ===", trip.name, trip.exposures_left());

    let mut frame = trip.exposures();
    loop {
        frame += 1;
        match lifecycle
            .add_photo(&trip.id, format!("data:image/jpeg;base64,frame-{frame}"))
            .await
        {
            Ok(updated) => {
                println!("  frame {frame:>2}/{EXPOSURES_PER_ROLL}");
                if updated.is_completed {
                    println!("Roll developed");
                    break;
                }
            }
            Err(err) if err.kind() == ErrorKind::Capacity => {
                println!("Roll already finished");
                break;
            }
            Err(err) => return Err(err).context("exposing a frame"),
        }
    }

    println!("\n=== Gallery ===");
    for developed in lifecycle.completed_trips().await? {
        let thumbnail = developed
            .thumbnail()
            .map_or("(no photos)", |photo| photo.path.as_str());
        println!(
            "  {} started {} with {} photos, thumbnail {thumbnail}",
            developed.name,
            developed.start_date.format("%Y-%m-%d %H:%M"),
            developed.exposures(),
        );
    }

    if let Some(text) = exporter.render() {
        println!("\n=== Metrics ===\n{text}");
    }

    Ok(())
}
