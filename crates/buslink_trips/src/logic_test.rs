// --- File: crates/buslink_trips/src/logic_test.rs ---

use crate::error::TripsError;
use crate::logic::{
    expand_schedule, generate_trips, parse_departure_time, trip_id, weekday_number,
};
use buslink_common::models::{Route, Schedule, Trip};
use buslink_common::services::{BoxFuture, CatalogStore};
use buslink_config::TripsConfig;
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
#[error("fake catalog failure")]
struct FakeError;

struct FakeCatalog {
    routes: Vec<Route>,
    schedules: Vec<Schedule>,
    flushes: Mutex<Vec<Vec<Trip>>>,
}

impl FakeCatalog {
    fn new(routes: Vec<Route>, schedules: Vec<Schedule>) -> Self {
        Self {
            routes,
            schedules,
            flushes: Mutex::new(Vec::new()),
        }
    }

    fn all_trips(&self) -> Vec<Trip> {
        self.flushes.lock().unwrap().concat()
    }

    fn flush_sizes(&self) -> Vec<usize> {
        self.flushes.lock().unwrap().iter().map(Vec::len).collect()
    }
}

impl CatalogStore for FakeCatalog {
    type Error = FakeError;

    fn list_routes(&self) -> BoxFuture<'_, Vec<Route>, Self::Error> {
        let routes = self.routes.clone();
        Box::pin(async move { Ok(routes) })
    }

    fn list_schedules(&self) -> BoxFuture<'_, Vec<Schedule>, Self::Error> {
        let schedules = self.schedules.clone();
        Box::pin(async move { Ok(schedules) })
    }

    fn merge_trips(&self, trips: Vec<Trip>) -> BoxFuture<'_, (), Self::Error> {
        self.flushes.lock().unwrap().push(trips);
        Box::pin(async { Ok(()) })
    }
}

fn route(id: &str, duration_mins: i64) -> Route {
    Route {
        id: id.to_string(),
        origin_city: "Colombo".to_string(),
        destination_city: "Kandy".to_string(),
        via: Some("Gampaha".to_string()),
        stops: vec![],
        distance_km: 116.0,
        estimated_duration_mins: duration_mins,
        is_active: true,
    }
}

fn schedule(id: &str, route_id: &str, departure: &str, days: Vec<u8>) -> Schedule {
    Schedule {
        id: id.to_string(),
        route_id: route_id.to_string(),
        departure_time: departure.to_string(),
        recurrence_days: days,
        base_price: 750.0,
        total_seats: 40,
        amenities: vec![],
        bus_number: "CMB-KDY-GAM-01".to_string(),
        operator_name: "Buslink Official".to_string(),
        bus_type: "Standard".to_string(),
        conductor_id: None,
    }
}

// 2026-03-16 is a Monday, 2026-03-15 a Sunday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

#[test]
fn sunday_maps_to_seven_not_zero() {
    assert_eq!(weekday_number(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()), 7);
    assert_eq!(weekday_number(monday()), 1);
    assert_eq!(weekday_number(NaiveDate::from_ymd_opt(2026, 3, 21).unwrap()), 6);
}

#[test]
fn departure_time_parsing() {
    assert_eq!(
        parse_departure_time("08:00"),
        NaiveTime::from_hms_opt(8, 0, 0)
    );
    assert_eq!(
        parse_departure_time("22:30"),
        NaiveTime::from_hms_opt(22, 30, 0)
    );
    // unpadded hour, as written by the legacy migration
    assert_eq!(
        parse_departure_time("8:05"),
        NaiveTime::from_hms_opt(8, 5, 0)
    );
    assert_eq!(parse_departure_time("25:00"), None);
    assert_eq!(parse_departure_time("0800"), None);
    assert_eq!(parse_departure_time(""), None);
}

#[test]
fn trip_key_is_deterministic_in_schedule_and_date() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    assert_eq!(trip_id("sch_1", date), "trip_sch_1_20260316");
}

#[test]
fn weekend_schedule_over_thirty_days_from_a_monday() {
    let sched = schedule("sch_we", "r1", "08:00", vec![6, 7]);
    let trips = expand_schedule(&sched, &route("r1", 195), monday(), 30, 120).unwrap();

    // [Mar 16, Apr 14] holds four Saturdays and four Sundays
    assert_eq!(trips.len(), 8);
    for trip in &trips {
        let day = weekday_number(trip.date);
        assert!(day == 6 || day == 7);
        assert_eq!(trip.departure_date_time.time(), NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(
            trip.arrival_date_time - trip.departure_date_time,
            chrono::Duration::minutes(195)
        );
        assert_eq!(trip.status, "scheduled");
        assert!(trip.booked_seat_numbers.is_empty());
        assert_eq!(trip.delay_minutes, 0);
    }
    assert_eq!(trips[0].date, NaiveDate::from_ymd_opt(2026, 3, 21).unwrap());
}

#[test]
fn zero_duration_route_falls_back_to_the_default() {
    let sched = schedule("sch_d", "r1", "23:00", vec![1]);
    let trips = expand_schedule(&sched, &route("r1", 0), monday(), 7, 120).unwrap();

    assert_eq!(trips.len(), 1);
    // departure 23:00 + 120 minutes crosses midnight
    assert_eq!(
        trips[0].arrival_date_time,
        NaiveDate::from_ymd_opt(2026, 3, 17)
            .unwrap()
            .and_hms_opt(1, 0, 0)
            .unwrap()
    );
}

#[test]
fn expansion_is_idempotent_by_key() {
    let sched = schedule("sch_1", "r1", "08:00", vec![1, 2, 3, 4, 5, 6, 7]);
    let first = expand_schedule(&sched, &route("r1", 195), monday(), 30, 120).unwrap();
    let second = expand_schedule(&sched, &route("r1", 195), monday(), 30, 120).unwrap();

    let first_ids: HashSet<String> = first.iter().map(|t| t.id.clone()).collect();
    let second_ids: HashSet<String> = second.iter().map(|t| t.id.clone()).collect();
    assert_eq!(first.len(), 30);
    assert_eq!(first_ids, second_ids);
}

#[test]
fn malformed_departure_time_is_an_error() {
    let sched = schedule("sch_bad", "r1", "morning", vec![1]);
    let err = expand_schedule(&sched, &route("r1", 195), monday(), 30, 120).unwrap_err();
    assert!(matches!(err, TripsError::InvalidDepartureTime { .. }));
}

#[tokio::test]
async fn pipeline_batches_writes_and_flushes_the_remainder() {
    let store = FakeCatalog::new(
        vec![route("r1", 195)],
        vec![schedule("sch_1", "r1", "08:00", vec![1, 2, 3, 4, 5, 6, 7])],
    );
    let config = TripsConfig {
        horizon_days: 8,
        batch_size: 5,
        default_duration_mins: 120,
    };

    let report = generate_trips(&store, &config, monday()).await.unwrap();
    assert_eq!(report.created_or_updated, 8);
    assert_eq!(report.skipped_schedules, 0);
    assert_eq!(store.flush_sizes(), vec![5, 3]);
}

#[tokio::test]
async fn missing_route_skips_the_schedule_without_aborting() {
    let store = FakeCatalog::new(
        vec![route("r1", 195)],
        vec![
            schedule("sch_orphan", "r_missing", "08:00", vec![1]),
            schedule("sch_ok", "r1", "08:00", vec![1]),
        ],
    );
    let config = TripsConfig {
        horizon_days: 7,
        batch_size: 200,
        default_duration_mins: 120,
    };

    let report = generate_trips(&store, &config, monday()).await.unwrap();
    assert_eq!(report.skipped_schedules, 1);
    assert_eq!(report.created_or_updated, 1);

    let trips = store.all_trips();
    assert_eq!(trips.len(), 1);
    assert_eq!(trips[0].schedule_id, "sch_ok");
}

#[tokio::test]
async fn malformed_schedule_is_counted_and_skipped() {
    let store = FakeCatalog::new(
        vec![route("r1", 195)],
        vec![
            schedule("sch_bad", "r1", "late", vec![1]),
            schedule("sch_ok", "r1", "08:00", vec![1]),
        ],
    );
    let config = TripsConfig::default();

    let report = generate_trips(&store, &config, monday()).await.unwrap();
    assert_eq!(report.skipped_schedules, 1);
    assert!(report.created_or_updated > 0);
}
