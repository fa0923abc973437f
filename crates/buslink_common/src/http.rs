// --- File: crates/buslink_common/src/http.rs ---
//! Shared outbound HTTP plumbing.

pub mod client;

pub use client::{create_client, HTTP_CLIENT};
