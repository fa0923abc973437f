// File: services/buslink_backend/src/bin/seed_master_data.rs
//! Clean-slate seed: wipes routes, schedules and trips, repopulates the
//! catalog from the master list, then expands trips over the configured
//! horizon.

use buslink_firestore::{collections, FirestoreClient, FirestoreStore};
use buslink_trips::seed::master_catalog;
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    buslink_common::logging::init();
    let config = buslink_config::load_config()?;
    let firestore_config = config
        .firestore
        .as_ref()
        .ok_or("Missing [firestore] config")?;

    let client = FirestoreClient::from_config(firestore_config)?;
    let store = FirestoreStore::new(Arc::new(client));

    println!("Starting master data seed (clean slate)");

    println!("Wiping existing routes, schedules, trips...");
    for collection in [collections::ROUTES, collections::SCHEDULES, collections::TRIPS] {
        let deleted = store.wipe_collection(collection).await?;
        println!("  {}: {} documents deleted", collection, deleted);
    }

    let (routes, schedules) = master_catalog();
    println!(
        "Seeding {} routes and {} schedules...",
        routes.len(),
        schedules.len()
    );
    store.put_catalog(&routes, &schedules).await?;

    let start = chrono::Local::now().date_naive();
    let report = buslink_trips::generate_trips(&store, &config.trips, start).await?;

    println!("Seed complete");
    println!("  routes:    {}", routes.len());
    println!("  schedules: {}", schedules.len());
    println!("  trips:     {}", report.created_or_updated);
    Ok(())
}
