// --- File: crates/buslink_stripe/src/lib.rs ---

// Declare modules within this crate
pub mod error;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_test;
pub mod routes;
pub mod service;

pub use error::StripeError;
pub use logic::StripeClient;
pub use service::StripeGateway;
