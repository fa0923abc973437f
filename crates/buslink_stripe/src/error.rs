// --- File: crates/buslink_stripe/src/error.rs ---
use buslink_common::{upstream_error, BuslinkError, HttpStatusCode};
use thiserror::Error;

/// Stripe-specific error types.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Stripe configuration
    #[error("Stripe configuration missing or incomplete")]
    ConfigError,

    /// A required request field was absent
    #[error("Missing required parameter: {0}")]
    MissingField(&'static str),

    /// The amount could not be read as a minor-unit integer
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

/// Convert StripeError to BuslinkError
impl From<StripeError> for BuslinkError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => upstream_error("Stripe API", e),
            StripeError::ApiError {
                status_code,
                message,
            } => upstream_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => {
                BuslinkError::Internal(format!("Stripe response parse error: {}", e))
            }
            StripeError::ConfigError => {
                BuslinkError::Config("Stripe configuration missing or incomplete".to_string())
            }
            StripeError::MissingField(field) => {
                BuslinkError::InvalidRequest(format!("Missing required parameter: {}", field))
            }
            StripeError::InvalidAmount(msg) => {
                BuslinkError::InvalidRequest(format!("Invalid amount: {}", msg))
            }
            StripeError::InternalError(msg) => BuslinkError::Internal(msg),
        }
    }
}

/// HTTP status codes for the payment endpoints: validation failures are 400,
/// everything else (misconfiguration, gateway failure) surfaces as 500.
impl HttpStatusCode for StripeError {
    fn status_code(&self) -> u16 {
        match self {
            StripeError::MissingField(_) => 400,
            StripeError::InvalidAmount(_) => 400,
            StripeError::RequestError(_)
            | StripeError::ApiError { .. }
            | StripeError::ParseError(_)
            | StripeError::ConfigError
            | StripeError::InternalError(_) => 500,
        }
    }
}
