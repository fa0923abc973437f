// File: services/buslink_backend/src/bin/generate_trips.rs
//! Expands every schedule into dated trips over the configured horizon.
//! Safe to re-run: trip keys are deterministic and writes merge.

use buslink_config::load_config;
use buslink_firestore::{FirestoreClient, FirestoreStore};
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    buslink_common::logging::init();
    let config = load_config()?;
    let firestore_config = config
        .firestore
        .as_ref()
        .ok_or("Missing [firestore] config")?;

    let client = FirestoreClient::from_config(firestore_config)?;
    let store = FirestoreStore::new(Arc::new(client));

    let start = chrono::Local::now().date_naive();
    println!(
        "Generating trips for {} days starting {}",
        config.trips.horizon_days, start
    );

    let report = buslink_trips::generate_trips(&store, &config.trips, start).await?;

    println!("Trip generation complete");
    println!("  created/updated: {}", report.created_or_updated);
    println!("  skipped schedules: {}", report.skipped_schedules);
    Ok(())
}
