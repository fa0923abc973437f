// --- File: crates/buslink_refunds/src/error.rs ---

use buslink_common::{BuslinkError, HttpStatusCode};
use thiserror::Error;

/// Errors specific to refund approval
#[derive(Error, Debug)]
pub enum RefundError {
    /// Request carried no caller identity
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Missing or malformed request field
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Refund request or ticket not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request is not in a state that allows approval
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// The payment gateway rejected or failed the refund call
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Anything else, including unknown-outcome timeouts
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RefundError {
    /// Stable machine-readable discriminator carried in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            RefundError::Unauthenticated(_) => "unauthenticated",
            RefundError::InvalidRequest(_) => "invalid-request",
            RefundError::NotFound(_) => "not-found",
            RefundError::FailedPrecondition(_) => "failed-precondition",
            RefundError::Gateway(_) => "upstream",
            RefundError::Internal(_) => "internal",
        }
    }
}

impl From<RefundError> for BuslinkError {
    fn from(err: RefundError) -> Self {
        match err {
            RefundError::Unauthenticated(msg) => BuslinkError::Unauthenticated(msg),
            RefundError::InvalidRequest(msg) => BuslinkError::InvalidRequest(msg),
            RefundError::NotFound(msg) => BuslinkError::NotFound(msg),
            RefundError::FailedPrecondition(msg) => BuslinkError::FailedPrecondition(msg),
            RefundError::Gateway(msg) => BuslinkError::Upstream {
                service_name: "PaymentGateway".to_string(),
                message: msg,
            },
            RefundError::Internal(msg) => BuslinkError::Internal(msg),
        }
    }
}

impl HttpStatusCode for RefundError {
    fn status_code(&self) -> u16 {
        match self {
            RefundError::Unauthenticated(_) => 401,
            RefundError::InvalidRequest(_) => 400,
            RefundError::NotFound(_) => 404,
            RefundError::FailedPrecondition(_) => 412,
            RefundError::Gateway(_) => 502,
            RefundError::Internal(_) => 500,
        }
    }
}
