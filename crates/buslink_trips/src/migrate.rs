// --- File: crates/buslink_trips/src/migrate.rs ---
//! Splitting legacy route documents into the Route + Schedule model.
//!
//! Early documents mixed route geometry with per-service fields (price, bus
//! identity, departure time) and used `fromCity`/`toCity` naming. Migration
//! lifts the service fields into a new schedule and normalizes the route.

use buslink_common::models::{Route, Schedule};

/// The legacy document's fields, as read off the raw route document. Every
/// field is optional; the split applies the historical defaults.
#[derive(Debug, Clone, Default)]
pub struct LegacyRoute {
    pub id: String,
    pub origin_city: Option<String>,
    pub destination_city: Option<String>,
    pub from_city: Option<String>,
    pub to_city: Option<String>,
    pub via: Option<String>,
    pub stops: Vec<String>,
    pub distance_km: Option<f64>,
    pub estimated_duration_mins: Option<i64>,
    pub departure_hour: Option<i64>,
    pub departure_minute: Option<i64>,
    pub price: Option<f64>,
    pub bus_number: Option<String>,
    pub operator_name: Option<String>,
    pub bus_type: Option<String>,
    pub features: Vec<String>,
    pub recurrence_days: Vec<u8>,
}

/// Splits one legacy route into the normalized route plus the schedule that
/// carries its service fields.
///
/// `schedule_id` is caller-supplied so the migration script controls id
/// generation. Defaults mirror the historical data: 08:00 departure, daily
/// recurrence, 40 seats.
pub fn split_legacy_route(legacy: &LegacyRoute, schedule_id: String) -> (Route, Schedule) {
    let origin = legacy
        .origin_city
        .clone()
        .or_else(|| legacy.from_city.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let dest = legacy
        .destination_city
        .clone()
        .or_else(|| legacy.to_city.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let departure_hour = legacy.departure_hour.unwrap_or(8);
    let departure_minute = legacy.departure_minute.unwrap_or(0);

    let route = Route {
        id: legacy.id.clone(),
        origin_city: origin,
        destination_city: dest,
        via: legacy.via.clone(),
        stops: legacy.stops.clone(),
        distance_km: legacy.distance_km.unwrap_or(0.0),
        estimated_duration_mins: legacy.estimated_duration_mins.unwrap_or(0),
        is_active: true,
    };

    let recurrence_days = if legacy.recurrence_days.is_empty() {
        vec![1, 2, 3, 4, 5, 6, 7]
    } else {
        legacy.recurrence_days.clone()
    };

    let schedule = Schedule {
        id: schedule_id,
        route_id: legacy.id.clone(),
        departure_time: format!("{:02}:{:02}", departure_hour, departure_minute),
        recurrence_days,
        base_price: legacy.price.unwrap_or(0.0),
        total_seats: 40,
        amenities: legacy.features.clone(),
        bus_number: legacy
            .bus_number
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        operator_name: legacy
            .operator_name
            .clone()
            .unwrap_or_else(|| "Buslink".to_string()),
        bus_type: legacy
            .bus_type
            .clone()
            .unwrap_or_else(|| "Standard".to_string()),
        conductor_id: None,
    };

    (route, schedule)
}
