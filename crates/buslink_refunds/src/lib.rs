// --- File: crates/buslink_refunds/src/lib.rs ---
//! Refund approval: the orchestrator that ties the payment gateway and the
//! refund ledger together with at-most-once semantics.

pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;


pub use error::RefundError;
pub use logic::{process_refund, ProcessRefundRequest, ProcessRefundResponse};
