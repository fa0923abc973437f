// --- File: crates/buslink_common/src/models.rs ---
//! Persisted entities of the ticketing platform.
//!
//! Field names serialize in camelCase to match the document shapes in the
//! `routes`, `schedules`, `trips`, `refunds` and `tickets` collections.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Well-known status strings shared across collections.
pub mod status {
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const COMPLETED: &str = "completed";
    pub const REFUNDED: &str = "refunded";
    pub const SCHEDULED: &str = "scheduled";
}

/// A physical connection between two cities, optionally via a waypoint.
///
/// Created by migration/seed, never deleted except by wipe-and-reseed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub origin_city: String,
    pub destination_city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(default)]
    pub stops: Vec<String>,
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub estimated_duration_mins: i64,
    #[serde(default)]
    pub is_active: bool,
}

/// A recurring service definition that expands into dated [`Trip`]s.
///
/// `route_id` must reference an existing [`Route`] before expansion runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub route_id: String,
    /// Departure time of day, `HH:mm`.
    pub departure_time: String,
    /// Weekdays the service runs, 1=Monday..7=Sunday.
    pub recurrence_days: Vec<u8>,
    pub base_price: f64,
    pub total_seats: i64,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub bus_number: String,
    pub operator_name: String,
    pub bus_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conductor_id: Option<String>,
}

/// One dated, bookable occurrence of a [`Schedule`].
///
/// The id is deterministic in `(schedule_id, date)` so that re-running
/// expansion is idempotent. Booking state (`status`, `booked_seat_numbers`,
/// `delay_minutes`) is mutated by flows outside this crate and must survive
/// re-expansion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub schedule_id: String,
    pub date: NaiveDate,
    /// Timezone-naive local timestamps, per the platform convention.
    pub departure_date_time: NaiveDateTime,
    pub arrival_date_time: NaiveDateTime,
    pub origin_city: String,
    pub destination_city: String,
    pub price: f64,
    pub total_seats: i64,
    pub status: String,
    #[serde(default)]
    pub booked_seat_numbers: Vec<i64>,
    #[serde(default)]
    pub delay_minutes: i64,
}

/// A customer's refund request, approved at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub id: String,
    /// `pending` until approved; `approved` is terminal.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_status: Option<String>,
    pub ticket_id: String,
    /// Refund amount in major currency units.
    pub refund_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_refund_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

/// Holds the payment-gateway transaction reference needed to reverse a charge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    pub status: String,
}
