// --- File: crates/buslink_firestore/src/value.rs ---
//! Encoding and decoding of Firestore's typed value JSON.
//!
//! The REST API wraps every field in a type tag, e.g.
//! `{"stringValue": "Colombo"}` or `{"integerValue": "40"}` (integers travel
//! as strings). These helpers keep that noise out of the store code.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{json, Map, Value};

pub type Fields = Map<String, Value>;

// --- Encoders ---

pub fn str_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

pub fn int_value(i: i64) -> Value {
    // integerValue is string-encoded on the wire
    json!({ "integerValue": i.to_string() })
}

pub fn double_value(f: f64) -> Value {
    json!({ "doubleValue": f })
}

pub fn bool_value(b: bool) -> Value {
    json!({ "booleanValue": b })
}

pub fn null_value() -> Value {
    json!({ "nullValue": null })
}

/// Timezone-naive timestamps are stored as UTC; the platform convention is
/// local-naive everywhere, so this is a pure formatting choice.
pub fn timestamp_value(dt: &NaiveDateTime) -> Value {
    let utc: DateTime<Utc> = DateTime::from_naive_utc_and_offset(*dt, Utc);
    json!({ "timestampValue": utc.to_rfc3339_opts(chrono::SecondsFormat::Secs, true) })
}

pub fn array_value(items: Vec<Value>) -> Value {
    json!({ "arrayValue": { "values": items } })
}

pub fn str_array_value(items: &[String]) -> Value {
    array_value(items.iter().map(|s| str_value(s)).collect())
}

pub fn int_array_value(items: &[i64]) -> Value {
    array_value(items.iter().map(|i| int_value(*i)).collect())
}

// --- Decoders ---

pub fn get_str<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    fields.get(key)?.get("stringValue")?.as_str()
}

pub fn get_string(fields: &Fields, key: &str) -> Option<String> {
    get_str(fields, key).map(String::from)
}

pub fn get_i64(fields: &Fields, key: &str) -> Option<i64> {
    let value = fields.get(key)?;
    if let Some(s) = value.get("integerValue").and_then(Value::as_str) {
        return s.parse().ok();
    }
    // tolerate doubles written by older tooling
    value.get("doubleValue")?.as_f64().map(|f| f as i64)
}

pub fn get_f64(fields: &Fields, key: &str) -> Option<f64> {
    let value = fields.get(key)?;
    if let Some(f) = value.get("doubleValue").and_then(Value::as_f64) {
        return Some(f);
    }
    value
        .get("integerValue")?
        .as_str()
        .and_then(|s| s.parse().ok())
}

pub fn get_bool(fields: &Fields, key: &str) -> Option<bool> {
    fields.get(key)?.get("booleanValue")?.as_bool()
}

pub fn get_timestamp(fields: &Fields, key: &str) -> Option<NaiveDateTime> {
    let raw = fields.get(key)?.get("timestampValue")?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_utc())
}

fn array_items<'a>(fields: &'a Fields, key: &str) -> Option<&'a Vec<Value>> {
    fields
        .get(key)?
        .get("arrayValue")?
        .get("values")?
        .as_array()
}

pub fn get_str_list(fields: &Fields, key: &str) -> Vec<String> {
    array_items(fields, key)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.get("stringValue").and_then(Value::as_str))
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

pub fn get_i64_list(fields: &Fields, key: &str) -> Vec<i64> {
    array_items(fields, key)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| {
                    v.get("integerValue")
                        .and_then(Value::as_str)
                        .and_then(|s| s.parse().ok())
                })
                .collect()
        })
        .unwrap_or_default()
}
