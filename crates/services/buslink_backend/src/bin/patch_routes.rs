// File: services/buslink_backend/src/bin/patch_routes.rs
//! Backfills missing `distanceKm`/`estimatedDurationMins` on routes.

use buslink_common::services::CatalogStore;
use buslink_firestore::{FirestoreClient, FirestoreStore};
use buslink_trips::patch::patch_for_route;
use std::error::Error;
use std::sync::Arc;
use tracing::error;

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

    println!("Starting route patch (fixing 0km / 0mins)");
    let routes = store.list_routes().await?;

    let mut rng = rand::thread_rng();
    let mut patched = 0usize;
    let mut failed = 0usize;

    for route in &routes {
        let patch = patch_for_route(route, &mut rng);
        if patch.is_empty() {
            continue;
        }
        println!(
            "Patching route {}: {:?} km, {:?} mins",
            route.id, patch.distance_km, patch.estimated_duration_mins
        );
        match store
            .patch_route_metrics(&route.id, patch.distance_km, patch.estimated_duration_mins)
            .await
        {
            Ok(()) => patched += 1,
            Err(e) => {
                error!(route_id = %route.id, error = %e, "route patch failed");
                failed += 1;
            }
        }
    }

    if patched > 0 || failed > 0 {
        println!("Patched {} routes ({} failed)", patched, failed);
    } else {
        println!("All routes already have valid metrics");
    }
    Ok(())
}
