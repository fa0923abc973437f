// --- File: crates/buslink_refunds/src/logic.rs ---
//! The refund approval orchestrator.
//!
//! Approval touches two systems that cannot share a transaction: the payment
//! gateway and the document store. The flow keeps at-most-once semantics by
//! combining three things:
//!
//! 1. versioned reads of the refund request and its ticket,
//! 2. a gateway idempotency key derived from the refund id, so a retried or
//!    concurrent invocation can never create a second gateway refund,
//! 3. an atomic store commit preconditioned on both read versions, retried a
//!    bounded number of times on contention.
//!
//! Of two concurrent invocations exactly one commits; the other re-reads,
//! finds the request no longer `pending`, and fails the precondition check.

use crate::error::RefundError;
use buslink_common::models::status;
use buslink_common::services::{
    CommitOutcome, PaymentGateway, RefundApproval, RefundParams, RefundStore,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// How long the gateway gets before the outcome is declared unknown.
pub const GATEWAY_TIMEOUT: Duration = Duration::from_secs(30);

/// Commit attempts before giving up under sustained contention.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRefundRequest {
    pub refund_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRefundResponse {
    pub success: bool,
    pub stripe_refund_id: String,
}

/// Gateway statuses accepted as a successful refund submission.
fn is_acceptable_gateway_status(gateway_status: &str) -> bool {
    gateway_status == "succeeded" || gateway_status == "pending"
}

/// Approves a pending refund request: issues the gateway refund and commits
/// the `approved`/`refunded` status pair atomically.
pub async fn process_refund<S, G>(
    store: &S,
    gateway: &G,
    refund_id: &str,
    caller_uid: Option<&str>,
) -> Result<ProcessRefundResponse, RefundError>
where
    S: RefundStore,
    G: PaymentGateway,
{
    let caller_uid = caller_uid
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| {
            RefundError::Unauthenticated("Must be signed in to process refunds".to_string())
        })?;

    for attempt in 1..=MAX_COMMIT_ATTEMPTS {
        let refund = store
            .load_refund(refund_id)
            .await
            .map_err(|e| RefundError::Internal(format!("Failed to load refund request: {}", e)))?
            .ok_or_else(|| RefundError::NotFound("Refund request not found".to_string()))?;

        if refund.doc.status != status::PENDING {
            return Err(RefundError::FailedPrecondition(format!(
                "Refund request is not pending (status: {})",
                refund.doc.status
            )));
        }
        if refund.doc.ticket_id.is_empty() {
            return Err(RefundError::FailedPrecondition(
                "Refund request has no associated ticket".to_string(),
            ));
        }

        let ticket = store
            .load_ticket(&refund.doc.ticket_id)
            .await
            .map_err(|e| RefundError::Internal(format!("Failed to load ticket: {}", e)))?
            .ok_or_else(|| RefundError::NotFound("Ticket not found".to_string()))?;

        let payment_intent_id = ticket.doc.payment_intent_id.clone().ok_or_else(|| {
            RefundError::FailedPrecondition(
                "Ticket does not have an associated payment".to_string(),
            )
        })?;

        let amount_minor = (refund.doc.refund_amount * 100.0).round() as i64;
        if amount_minor <= 0 {
            return Err(RefundError::FailedPrecondition(format!(
                "Refund amount must be positive (got {})",
                refund.doc.refund_amount
            )));
        }

        // The idempotency key makes this call safe to repeat across commit
        // retries and across concurrent invocations.
        let params = RefundParams {
            payment_intent_id,
            amount_minor,
            idempotency_key: Some(format!("refund-{}", refund.doc.id)),
            reason: Some("requested_by_customer".to_string()),
            metadata: vec![
                ("refundRequestId".to_string(), refund.doc.id.clone()),
                ("ticketId".to_string(), refund.doc.ticket_id.clone()),
            ],
        };
        let gateway_refund = match tokio::time::timeout(
            GATEWAY_TIMEOUT,
            gateway.create_refund(params),
        )
        .await
        {
            Ok(Ok(gateway_refund)) => gateway_refund,
            Ok(Err(e)) => {
                return Err(RefundError::Gateway(format!(
                    "Payment gateway refund failed: {}",
                    e
                )));
            }
            // The request may still land; never report success here.
            Err(_) => {
                return Err(RefundError::Internal(
                    "Payment gateway timed out; refund outcome unknown".to_string(),
                ));
            }
        };

        if !is_acceptable_gateway_status(&gateway_refund.status) {
            return Err(RefundError::Internal(format!(
                "Unexpected gateway refund status: {}",
                gateway_refund.status
            )));
        }

        let approval = RefundApproval {
            refund_id: refund.doc.id.clone(),
            refund_version: refund.version,
            ticket_id: refund.doc.ticket_id.clone(),
            ticket_version: ticket.version,
            gateway_refund_id: gateway_refund.id.clone(),
            approved_by: caller_uid.to_string(),
        };
        match store
            .commit_approval(approval)
            .await
            .map_err(|e| RefundError::Internal(format!("Failed to commit approval: {}", e)))?
        {
            CommitOutcome::Committed => {
                info!(
                    refund_id,
                    gateway_refund_id = %gateway_refund.id,
                    "refund approved"
                );
                return Ok(ProcessRefundResponse {
                    success: true,
                    stripe_refund_id: gateway_refund.id,
                });
            }
            CommitOutcome::Contention => {
                warn!(refund_id, attempt, "refund approval contention, retrying");
            }
        }
    }

    Err(RefundError::Internal(
        "Refund approval did not commit after repeated contention".to_string(),
    ))
}
