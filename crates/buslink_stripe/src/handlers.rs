// --- File: crates/buslink_stripe/src/handlers.rs ---
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use buslink_common::HttpStatusCode;
use buslink_config::AppConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::error::StripeError;
use crate::logic::{
    CreateCheckoutSessionRequest, CreateCheckoutSessionResponse, DirectRefundRequest,
    DirectRefundResponse, StripeClient,
};

// --- State for Stripe Handlers ---
#[derive(Clone)]
pub struct StripeState {
    pub config: Arc<AppConfig>,
}

/// JSON failure body: every error response carries an `error` string.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(err: StripeError) -> (StatusCode, Json<ErrorBody>) {
    error!("[Stripe] {}", err);
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

fn client_from_state(state: &StripeState) -> Result<StripeClient, StripeError> {
    let stripe_config = state.config.stripe.as_ref().ok_or(StripeError::ConfigError)?;
    StripeClient::from_config(stripe_config)
}

/// `POST /checkout-session`: validates the booking parameters and creates one
/// checkout session at the gateway, returning its redirect URL.
#[axum::debug_handler]
pub async fn create_checkout_session_handler(
    State(state): State<Arc<StripeState>>,
    Json(payload): Json<CreateCheckoutSessionRequest>,
) -> Result<Json<CreateCheckoutSessionResponse>, (StatusCode, Json<ErrorBody>)> {
    // Validation happens before the client is even built, so a bad request
    // can never reach the gateway.
    let params = payload.validate().map_err(error_response)?;
    let client = client_from_state(&state).map_err(error_response)?;

    let session = client
        .create_checkout_session(params)
        .await
        .map_err(error_response)?;
    Ok(Json(CreateCheckoutSessionResponse { url: session.url }))
}

/// `POST /refund`: forwards a refund to the gateway unconditionally.
///
/// There is no ledger check here; this surface must stay restricted to
/// trusted internal callers, since it can refund arbitrary transaction
/// references for arbitrary amounts.
#[axum::debug_handler]
pub async fn direct_refund_handler(
    State(state): State<Arc<StripeState>>,
    Json(payload): Json<DirectRefundRequest>,
) -> Result<Json<DirectRefundResponse>, (StatusCode, Json<ErrorBody>)> {
    let params = payload.validate().map_err(error_response)?;
    let client = client_from_state(&state).map_err(error_response)?;

    let refund = client.create_refund(params).await.map_err(error_response)?;
    Ok(Json(DirectRefundResponse {
        success: true,
        refund: refund.raw,
    }))
}
