// --- File: crates/buslink_trips/src/logic.rs ---
//! Schedule-to-trip expansion.
//!
//! Walks every schedule over a rolling date window and materializes one trip
//! per matching recurrence day. The trip key is deterministic in
//! `(scheduleId, date)` and all writes go through the store's merge
//! semantics, so re-running the pipeline is idempotent and never disturbs
//! bookings taken on previously generated trips.

use crate::error::TripsError;
use buslink_common::models::{status, Route, Schedule, Trip};
use buslink_common::services::CatalogStore;
use buslink_config::TripsConfig;
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use std::collections::HashMap;
use tracing::{info, warn};

/// Recurrence-day number of a date, 1=Monday..7=Sunday.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Parses a `HH:mm` time of day. Tolerates an unpadded hour (`"8:00"`),
/// which legacy migrated schedules still carry.
pub fn parse_departure_time(raw: &str) -> Option<NaiveTime> {
    let (hour, minute) = raw.split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Deterministic trip key for a schedule occurrence.
pub fn trip_id(schedule_id: &str, date: NaiveDate) -> String {
    format!("trip_{}_{}", schedule_id, date.format("%Y%m%d"))
}

/// Expands one schedule over `[start, start + horizon_days)`.
///
/// Arrival is departure plus the route's estimated duration, falling back to
/// `default_duration_mins` when the route has none set.
pub fn expand_schedule(
    schedule: &Schedule,
    route: &Route,
    start: NaiveDate,
    horizon_days: u32,
    default_duration_mins: i64,
) -> Result<Vec<Trip>, TripsError> {
    let departure_time = parse_departure_time(&schedule.departure_time).ok_or_else(|| {
        TripsError::InvalidDepartureTime {
            schedule_id: schedule.id.clone(),
            value: schedule.departure_time.clone(),
        }
    })?;
    let duration_mins = if route.estimated_duration_mins > 0 {
        route.estimated_duration_mins
    } else {
        default_duration_mins
    };

    let mut trips = Vec::new();
    for offset in 0..horizon_days {
        let date = start + Days::new(u64::from(offset));
        if !schedule.recurrence_days.contains(&weekday_number(date)) {
            continue;
        }
        let departure_date_time = date.and_time(departure_time);
        let arrival_date_time = departure_date_time + chrono::Duration::minutes(duration_mins);
        trips.push(Trip {
            id: trip_id(&schedule.id, date),
            schedule_id: schedule.id.clone(),
            date,
            departure_date_time,
            arrival_date_time,
            origin_city: route.origin_city.clone(),
            destination_city: route.destination_city.clone(),
            price: schedule.base_price,
            total_seats: schedule.total_seats,
            status: status::SCHEDULED.to_string(),
            booked_seat_numbers: Vec::new(),
            delay_minutes: 0,
        });
    }
    Ok(trips)
}

/// Run summary, surfaced to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TripGenerationReport {
    pub created_or_updated: usize,
    pub skipped_schedules: usize,
}

/// Expands every schedule in the catalog starting at `start`.
///
/// A schedule whose route is missing, or whose departure time does not
/// parse, is logged and counted but never aborts the run. Trips are flushed
/// in batches of `config.batch_size`, with a final partial flush.
pub async fn generate_trips<C>(
    store: &C,
    config: &TripsConfig,
    start: NaiveDate,
) -> Result<TripGenerationReport, TripsError>
where
    C: CatalogStore,
{
    let routes = store
        .list_routes()
        .await
        .map_err(|e| TripsError::Store(e.to_string()))?;
    let schedules = store
        .list_schedules()
        .await
        .map_err(|e| TripsError::Store(e.to_string()))?;

    let route_map: HashMap<&str, &Route> =
        routes.iter().map(|r| (r.id.as_str(), r)).collect();

    let mut report = TripGenerationReport::default();
    let mut pending: Vec<Trip> = Vec::with_capacity(config.batch_size);

    for schedule in &schedules {
        let Some(route) = route_map.get(schedule.route_id.as_str()) else {
            warn!(
                schedule_id = %schedule.id,
                route_id = %schedule.route_id,
                "schedule references a missing route, skipping"
            );
            report.skipped_schedules += 1;
            continue;
        };

        let trips = match expand_schedule(
            schedule,
            route,
            start,
            config.horizon_days,
            config.default_duration_mins,
        ) {
            Ok(trips) => trips,
            Err(e) => {
                warn!(schedule_id = %schedule.id, error = %e, "skipping schedule");
                report.skipped_schedules += 1;
                continue;
            }
        };

        for trip in trips {
            pending.push(trip);
            if pending.len() >= config.batch_size {
                let flush = std::mem::replace(
                    &mut pending,
                    Vec::with_capacity(config.batch_size),
                );
                report.created_or_updated += flush.len();
                store
                    .merge_trips(flush)
                    .await
                    .map_err(|e| TripsError::Store(e.to_string()))?;
            }
        }
    }

    if !pending.is_empty() {
        report.created_or_updated += pending.len();
        store
            .merge_trips(pending)
            .await
            .map_err(|e| TripsError::Store(e.to_string()))?;
    }

    info!(
        created_or_updated = report.created_or_updated,
        skipped_schedules = report.skipped_schedules,
        "trip generation complete"
    );
    Ok(report)
}
