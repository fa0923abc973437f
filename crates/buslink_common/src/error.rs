// --- File: crates/buslink_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Buslink errors.
///
/// This enum is the shared failure taxonomy: every crate-specific error can
/// be converted into one of these variants, and HTTP handlers map them to
/// status codes through the [`HttpStatusCode`] trait.
#[derive(Error, Debug)]
pub enum BuslinkError {
    /// Client-supplied data failed validation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No caller identity was supplied
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// A referenced entity is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// The entity exists but is in the wrong state for the operation
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// An external service (payment gateway, document store) failed
    #[error("External service error: {service_name} - {message}")]
    Upstream {
        service_name: String,
        message: String,
    },

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BuslinkError {
    /// Stable machine-readable error kind, surfaced to callable-operation
    /// clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            BuslinkError::InvalidRequest(_) => "invalid-request",
            BuslinkError::Unauthenticated(_) => "unauthenticated",
            BuslinkError::NotFound(_) => "not-found",
            BuslinkError::FailedPrecondition(_) => "failed-precondition",
            BuslinkError::Upstream { .. } => "upstream",
            BuslinkError::Config(_) => "internal",
            BuslinkError::Internal(_) => "internal",
        }
    }
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for BuslinkError {
    fn status_code(&self) -> u16 {
        match self {
            BuslinkError::InvalidRequest(_) => 400,
            BuslinkError::Unauthenticated(_) => 401,
            BuslinkError::NotFound(_) => 404,
            BuslinkError::FailedPrecondition(_) => 412,
            BuslinkError::Upstream { .. } => 502,
            BuslinkError::Config(_) => 500,
            BuslinkError::Internal(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, BuslinkError>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, BuslinkError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| BuslinkError::Internal(format!("{}: {}", context, error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for BuslinkError {
    fn from(err: reqwest::Error) -> Self {
        BuslinkError::Upstream {
            service_name: "http".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BuslinkError {
    fn from(err: serde_json::Error) -> Self {
        BuslinkError::InvalidRequest(err.to_string())
    }
}

// Utility functions for error handling
pub fn invalid_request<T: fmt::Display>(message: T) -> BuslinkError {
    BuslinkError::InvalidRequest(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> BuslinkError {
    BuslinkError::NotFound(message.to_string())
}

pub fn failed_precondition<T: fmt::Display>(message: T) -> BuslinkError {
    BuslinkError::FailedPrecondition(message.to_string())
}

pub fn upstream_error<T: fmt::Display>(service_name: &str, message: T) -> BuslinkError {
    BuslinkError::Upstream {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> BuslinkError {
    BuslinkError::Internal(message.to_string())
}
