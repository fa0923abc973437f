// --- File: crates/buslink_firestore/src/mapping.rs ---
//! Conversions between persisted documents and the domain entities.

use crate::client::Document;
use crate::value::{
    self, bool_value, double_value, int_array_value, int_value, str_array_value, str_value,
    timestamp_value, Fields,
};
use buslink_common::models::{RefundRequest, Route, Schedule, Ticket, Trip};
use serde_json::Value;

/// Field paths the expansion pipeline owns on a trip document. Everything
/// else (`status`, `bookedSeatNumbers`, `delayMinutes`) belongs to the
/// booking flows and must never be touched by a re-run.
pub const TRIP_MERGE_MASK: &[&str] = &[
    "id",
    "scheduleId",
    "date",
    "departureDateTime",
    "arrivalDateTime",
    "originCity",
    "destinationCity",
    "price",
    "totalSeats",
];

pub fn route_from_doc(doc: &Document) -> Route {
    let f = &doc.fields;
    Route {
        id: doc.doc_id().to_string(),
        origin_city: value::get_string(f, "originCity").unwrap_or_default(),
        destination_city: value::get_string(f, "destinationCity").unwrap_or_default(),
        via: value::get_string(f, "via"),
        stops: value::get_str_list(f, "stops"),
        distance_km: value::get_f64(f, "distanceKm").unwrap_or(0.0),
        estimated_duration_mins: value::get_i64(f, "estimatedDurationMins").unwrap_or(0),
        is_active: value::get_bool(f, "isActive").unwrap_or(false),
    }
}

pub fn route_fields(route: &Route) -> Fields {
    let mut fields = Fields::new();
    fields.insert("id".to_string(), str_value(&route.id));
    fields.insert("originCity".to_string(), str_value(&route.origin_city));
    fields.insert(
        "destinationCity".to_string(),
        str_value(&route.destination_city),
    );
    if let Some(via) = &route.via {
        fields.insert("via".to_string(), str_value(via));
    }
    if !route.stops.is_empty() {
        fields.insert("stops".to_string(), str_array_value(&route.stops));
    }
    fields.insert("distanceKm".to_string(), double_value(route.distance_km));
    fields.insert(
        "estimatedDurationMins".to_string(),
        int_value(route.estimated_duration_mins),
    );
    fields.insert("isActive".to_string(), bool_value(route.is_active));
    fields
}

/// `None` when the document is missing the fields expansion depends on;
/// callers skip such schedules rather than abort.
pub fn schedule_from_doc(doc: &Document) -> Option<Schedule> {
    let f = &doc.fields;
    Some(Schedule {
        id: doc.doc_id().to_string(),
        route_id: value::get_string(f, "routeId")?,
        departure_time: value::get_string(f, "departureTime")?,
        recurrence_days: value::get_i64_list(f, "recurrenceDays")
            .into_iter()
            .map(|d| d as u8)
            .collect(),
        base_price: value::get_f64(f, "basePrice").unwrap_or(0.0),
        total_seats: value::get_i64(f, "totalSeats").unwrap_or(0),
        amenities: value::get_str_list(f, "amenities"),
        bus_number: value::get_string(f, "busNumber").unwrap_or_default(),
        operator_name: value::get_string(f, "operatorName").unwrap_or_default(),
        bus_type: value::get_string(f, "busType").unwrap_or_default(),
        conductor_id: value::get_string(f, "conductorId"),
    })
}

pub fn schedule_fields(schedule: &Schedule) -> Fields {
    let mut fields = Fields::new();
    fields.insert("id".to_string(), str_value(&schedule.id));
    fields.insert("routeId".to_string(), str_value(&schedule.route_id));
    fields.insert(
        "departureTime".to_string(),
        str_value(&schedule.departure_time),
    );
    fields.insert(
        "recurrenceDays".to_string(),
        int_array_value(
            &schedule
                .recurrence_days
                .iter()
                .map(|d| *d as i64)
                .collect::<Vec<_>>(),
        ),
    );
    fields.insert("basePrice".to_string(), double_value(schedule.base_price));
    fields.insert("totalSeats".to_string(), int_value(schedule.total_seats));
    fields.insert("amenities".to_string(), str_array_value(&schedule.amenities));
    fields.insert("busNumber".to_string(), str_value(&schedule.bus_number));
    fields.insert(
        "operatorName".to_string(),
        str_value(&schedule.operator_name),
    );
    fields.insert("busType".to_string(), str_value(&schedule.bus_type));
    match &schedule.conductor_id {
        Some(conductor_id) => {
            fields.insert("conductorId".to_string(), str_value(conductor_id));
        }
        None => {
            fields.insert("conductorId".to_string(), value::null_value());
        }
    }
    fields
}

/// Full trip document, booking fields initialized; used with an
/// exists-false precondition so it only ever applies on create.
pub fn trip_fields(trip: &Trip) -> Fields {
    let mut fields = Fields::new();
    fields.insert("id".to_string(), str_value(&trip.id));
    fields.insert("scheduleId".to_string(), str_value(&trip.schedule_id));
    fields.insert(
        "date".to_string(),
        timestamp_value(&trip.date.and_time(chrono::NaiveTime::MIN)),
    );
    fields.insert(
        "departureDateTime".to_string(),
        timestamp_value(&trip.departure_date_time),
    );
    fields.insert(
        "arrivalDateTime".to_string(),
        timestamp_value(&trip.arrival_date_time),
    );
    fields.insert("originCity".to_string(), str_value(&trip.origin_city));
    fields.insert(
        "destinationCity".to_string(),
        str_value(&trip.destination_city),
    );
    fields.insert("price".to_string(), double_value(trip.price));
    fields.insert("totalSeats".to_string(), int_value(trip.total_seats));
    fields.insert("status".to_string(), str_value(&trip.status));
    fields.insert(
        "bookedSeatNumbers".to_string(),
        int_array_value(&trip.booked_seat_numbers),
    );
    fields.insert("delayMinutes".to_string(), int_value(trip.delay_minutes));
    fields
}

pub fn refund_from_doc(doc: &Document) -> RefundRequest {
    let f = &doc.fields;
    RefundRequest {
        id: doc.doc_id().to_string(),
        // A document with no status must never read as `pending`, or a
        // malformed refund request would be approvable.
        status: value::get_string(f, "status").unwrap_or_default(),
        processing_status: value::get_string(f, "processingStatus"),
        ticket_id: value::get_string(f, "ticketId").unwrap_or_default(),
        refund_amount: value::get_f64(f, "refundAmount").unwrap_or(0.0),
        stripe_refund_id: value::get_string(f, "stripeRefundId"),
        approved_by: value::get_string(f, "approvedBy"),
    }
}

pub fn ticket_from_doc(doc: &Document) -> Ticket {
    let f = &doc.fields;
    Ticket {
        id: doc.doc_id().to_string(),
        payment_intent_id: value::get_string(f, "paymentIntentId")
            .filter(|s| !s.is_empty()),
        status: value::get_string(f, "status").unwrap_or_default(),
    }
}

/// True when the raw value is a non-empty Firestore value of any type; used
/// by migration to detect legacy fields worth stripping.
pub fn field_present(fields: &Fields, key: &str) -> bool {
    matches!(fields.get(key), Some(Value::Object(map)) if !map.contains_key("nullValue"))
}
