// --- File: crates/buslink_stripe/src/routes.rs ---

use crate::handlers::{create_checkout_session_handler, direct_refund_handler, StripeState};
use axum::{routing::post, Router};
use buslink_config::AppConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Creates a router containing the payment endpoints.
///
/// Both endpoints are browser-facing, so they carry permissive CORS; the
/// layer also answers `OPTIONS` preflights with 200. Non-POST methods get
/// 405 from the router itself.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let stripe_state = Arc::new(StripeState { config });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/checkout-session", post(create_checkout_session_handler))
        .route("/refund", post(direct_refund_handler))
        .layer(cors)
        .with_state(stripe_state)
}
