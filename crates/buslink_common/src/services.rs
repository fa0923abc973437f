// --- File: crates/buslink_common/src/services.rs ---
//! Capability traits for the external collaborators.
//!
//! The payment gateway and the document store are injected behind these
//! traits so the orchestrator and the expansion pipeline can be exercised
//! against in-memory fakes in tests, and so no module holds a global
//! singleton of either collaborator.

use crate::models::{RefundRequest, Route, Schedule, Ticket, Trip};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Parameters for creating a gateway checkout session.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionParams {
    /// Amount in minor currency units (already truncated at the boundary).
    pub unit_amount: i64,
    pub currency: String,
    pub booking_id: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created checkout session, as far as callers need to know.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionResult {
    pub session_id: String,
    /// Gateway-hosted page the payer is redirected to.
    pub url: String,
}

/// Parameters for reversing a captured charge.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundParams {
    pub payment_intent_id: String,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    /// Dedup token passed to the gateway. A retried call with the same key
    /// must not produce a second refund.
    pub idempotency_key: Option<String>,
    pub reason: Option<String>,
    pub metadata: Vec<(String, String)>,
}

/// The gateway's view of a refund.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayRefund {
    pub id: String,
    /// `succeeded` or `pending` on the happy path.
    pub status: String,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    /// The raw gateway object, returned verbatim by the direct refund endpoint.
    pub raw: serde_json::Value,
}

/// A trait for payment gateway operations.
pub trait PaymentGateway: Send + Sync {
    /// Error type returned by gateway operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a checkout session. Not idempotent: every call creates a new
    /// session and callers must dedupe.
    fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> BoxFuture<'_, CheckoutSessionResult, Self::Error>;

    /// Create a refund for a previous charge.
    fn create_refund(&self, params: RefundParams) -> BoxFuture<'_, GatewayRefund, Self::Error>;
}

/// Opaque document version, used as a write precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocVersion(pub String);

/// A document together with the version it was read at.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub doc: T,
    pub version: DocVersion,
}

/// The write set committed when a refund is approved.
#[derive(Debug, Clone)]
pub struct RefundApproval {
    pub refund_id: String,
    /// Version the refund request was read at; the commit fails on mismatch.
    pub refund_version: DocVersion,
    pub ticket_id: String,
    pub ticket_version: DocVersion,
    pub gateway_refund_id: String,
    pub approved_by: String,
}

/// Result of a preconditioned commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// One of the documents changed since it was read; nothing was written.
    Contention,
}

/// A trait for the refund ledger's read-and-commit operations.
///
/// `commit_approval` must apply both document updates atomically, and only
/// if neither document has changed since the version it carries. Combined
/// with the `pending`-only check read before committing, this guarantees
/// at-most-once approval under concurrent invocations.
pub trait RefundStore: Send + Sync {
    /// Error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_refund(
        &self,
        refund_id: &str,
    ) -> BoxFuture<'_, Option<Versioned<RefundRequest>>, Self::Error>;

    fn load_ticket(&self, ticket_id: &str)
        -> BoxFuture<'_, Option<Versioned<Ticket>>, Self::Error>;

    fn commit_approval(
        &self,
        approval: RefundApproval,
    ) -> BoxFuture<'_, CommitOutcome, Self::Error>;
}

/// A trait for the reference-data reads and trip writes of the expansion
/// pipeline.
pub trait CatalogStore: Send + Sync {
    /// Error type returned by store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_routes(&self) -> BoxFuture<'_, Vec<Route>, Self::Error>;

    fn list_schedules(&self) -> BoxFuture<'_, Vec<Schedule>, Self::Error>;

    /// Write one flush of trips with merge semantics: an existing trip keeps
    /// its `status`, `booked_seat_numbers` and `delay_minutes`; a new trip is
    /// created with the initialized booking fields.
    fn merge_trips(&self, trips: Vec<Trip>) -> BoxFuture<'_, (), Self::Error>;
}
