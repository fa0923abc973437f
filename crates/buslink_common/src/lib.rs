// --- File: crates/buslink_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Persisted entities
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    failed_precondition, internal_error, invalid_request, not_found, upstream_error, BuslinkError,
    Context, HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::{create_client, HTTP_CLIENT};
