// File: services/buslink_backend/src/bin/migrate_routes.rs
//! Splits legacy route documents into the Route + Schedule model and strips
//! the per-service fields off every route. Re-runnable: a clean route just
//! gets rewritten in place and another schedule derived from its defaults
//! would be a duplicate, so clean routes are skipped.

use buslink_firestore::value;
use buslink_firestore::{FirestoreClient, FirestoreStore};
use buslink_trips::migrate::{split_legacy_route, LegacyRoute};
use std::error::Error;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

fn legacy_from_fields(doc_id: &str, fields: &value::Fields) -> LegacyRoute {
    LegacyRoute {
        id: doc_id.to_string(),
        origin_city: value::get_string(fields, "originCity"),
        destination_city: value::get_string(fields, "destinationCity"),
        from_city: value::get_string(fields, "fromCity"),
        to_city: value::get_string(fields, "toCity"),
        via: value::get_string(fields, "via"),
        stops: value::get_str_list(fields, "stops"),
        distance_km: value::get_f64(fields, "distanceKm"),
        estimated_duration_mins: value::get_i64(fields, "estimatedDurationMins"),
        departure_hour: value::get_i64(fields, "departureHour"),
        departure_minute: value::get_i64(fields, "departureMinute"),
        price: value::get_f64(fields, "price"),
        bus_number: value::get_string(fields, "busNumber"),
        operator_name: value::get_string(fields, "operatorName"),
        bus_type: value::get_string(fields, "busType"),
        features: value::get_str_list(fields, "features"),
        recurrence_days: value::get_i64_list(fields, "recurrenceDays")
            .into_iter()
            .map(|d| d as u8)
            .collect(),
    }
}

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

    println!("Starting migration: routes -> routes + schedules");
    let docs = store.list_route_documents().await?;
    println!("Found {} routes to check", docs.len());

    let mut migrated = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;

    for doc in &docs {
        if !FirestoreStore::has_legacy_fields(doc) {
            skipped += 1;
            continue;
        }

        let legacy = legacy_from_fields(doc.doc_id(), &doc.fields);
        let schedule_id = format!("sch_{}", Uuid::new_v4().simple());
        let (route, schedule) = split_legacy_route(&legacy, schedule_id);

        println!(
            "Migrating route {} ({} -> {})",
            route.id, route.origin_city, route.destination_city
        );
        // One atomic commit per route; a failure is logged and counted and
        // the run moves on to the next document.
        match store.migrate_route(&route, &schedule).await {
            Ok(()) => {
                println!(
                    "  created schedule {} | price {}",
                    schedule.id, schedule.base_price
                );
                migrated += 1;
            }
            Err(e) => {
                error!(route_id = %route.id, error = %e, "route migration failed");
                failed += 1;
            }
        }
    }

    println!("Migration complete");
    println!("  migrated: {}", migrated);
    println!("  skipped:  {}", skipped);
    println!("  failed:   {}", failed);
    Ok(())
}
