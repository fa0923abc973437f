// --- File: crates/buslink_trips/src/error.rs ---

use buslink_common::{BuslinkError, HttpStatusCode};
use thiserror::Error;

/// Errors specific to trip expansion and catalog maintenance
#[derive(Error, Debug)]
pub enum TripsError {
    /// A schedule's departure time is not `HH:mm`
    #[error("Invalid departure time '{value}' on schedule {schedule_id}")]
    InvalidDepartureTime { schedule_id: String, value: String },

    /// The catalog store failed
    #[error("Store error: {0}")]
    Store(String),
}

impl From<TripsError> for BuslinkError {
    fn from(err: TripsError) -> Self {
        match err {
            TripsError::InvalidDepartureTime { .. } => {
                BuslinkError::FailedPrecondition(err.to_string())
            }
            TripsError::Store(msg) => BuslinkError::Upstream {
                service_name: "store".to_string(),
                message: msg,
            },
        }
    }
}

impl HttpStatusCode for TripsError {
    fn status_code(&self) -> u16 {
        match self {
            TripsError::InvalidDepartureTime { .. } => 412,
            TripsError::Store(_) => 502,
        }
    }
}
