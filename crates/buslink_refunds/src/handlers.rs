// --- File: crates/buslink_refunds/src/handlers.rs ---
use axum::{extract::State, http::HeaderMap, http::StatusCode, response::Json};
use buslink_common::services::{PaymentGateway, RefundStore};
use buslink_common::HttpStatusCode;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::error::RefundError;
use crate::logic::{process_refund, ProcessRefundRequest, ProcessRefundResponse};

/// Trusted header carrying the authenticated caller's uid, set by the
/// fronting auth proxy and recorded as `approvedBy`.
pub const CALLER_UID_HEADER: &str = "x-caller-uid";

// --- State for refund handlers ---
pub struct RefundState<S, G> {
    pub store: Arc<S>,
    pub gateway: Arc<G>,
}

impl<S, G> Clone for RefundState<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            gateway: Arc::clone(&self.gateway),
        }
    }
}

/// JSON failure body: an `error` string plus a stable `kind` discriminator.
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub error: String,
}

fn error_response(err: RefundError) -> (StatusCode, Json<ErrorBody>) {
    error!("[Refunds] {}", err);
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorBody {
            kind: err.kind(),
            error: err.to_string(),
        }),
    )
}

/// `POST /refunds/process`: approves a pending refund request end to end.
pub async fn process_refund_handler<S, G>(
    State(state): State<Arc<RefundState<S, G>>>,
    headers: HeaderMap,
    Json(payload): Json<ProcessRefundRequest>,
) -> Result<Json<ProcessRefundResponse>, (StatusCode, Json<ErrorBody>)>
where
    S: RefundStore + 'static,
    G: PaymentGateway + 'static,
{
    let caller_uid = headers
        .get(CALLER_UID_HEADER)
        .and_then(|v| v.to_str().ok());

    let refund_id = payload
        .refund_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            error_response(RefundError::InvalidRequest(
                "Missing required field: refundId".to_string(),
            ))
        })?;

    let response = process_refund(
        state.store.as_ref(),
        state.gateway.as_ref(),
        refund_id,
        caller_uid,
    )
    .await
    .map_err(error_response)?;
    Ok(Json(response))
}
