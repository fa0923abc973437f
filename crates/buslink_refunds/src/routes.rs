// --- File: crates/buslink_refunds/src/routes.rs ---

use crate::handlers::{process_refund_handler, RefundState};
use axum::{routing::post, Router};
use buslink_common::services::{PaymentGateway, RefundStore};
use std::sync::Arc;

/// Creates a router for the refund approval endpoint.
///
/// No CORS layer here: the endpoint is for the operator console behind the
/// auth proxy, not for the public booking frontend.
pub fn routes<S, G>(store: Arc<S>, gateway: Arc<G>) -> Router
where
    S: RefundStore + 'static,
    G: PaymentGateway + 'static,
{
    let state = Arc::new(RefundState { store, gateway });

    Router::new()
        .route("/refunds/process", post(process_refund_handler::<S, G>))
        .with_state(state)
}
