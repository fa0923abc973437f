// --- File: crates/buslink_stripe/tests/api_tests.rs ---
//! Outbound-API tests against a wiremock Stripe stand-in.

use buslink_common::services::{CheckoutSessionParams, RefundParams};
use buslink_stripe::{StripeClient, StripeError};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn checkout_params() -> CheckoutSessionParams {
    CheckoutSessionParams {
        unit_amount: 500,
        currency: "lkr".to_string(),
        booking_id: Some("booking_42".to_string()),
        success_url: "https://buslink.example/success".to_string(),
        cancel_url: "https://buslink.example/cancel".to_string(),
    }
}

#[tokio::test]
async fn checkout_session_posts_truncated_amount_and_booking_tags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .and(body_string_contains(
            "line_items%5B0%5D%5Bprice_data%5D%5Bunit_amount%5D=500",
        ))
        .and(body_string_contains("client_reference_id=booking_42"))
        .and(body_string_contains("bookingId%5D=booking_42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cs_test_a1",
            "url": "https://checkout.stripe.com/pay/cs_test_a1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StripeClient::new(server.uri(), "sk_test_x");
    let session = client
        .create_checkout_session(checkout_params())
        .await
        .expect("session created");
    assert_eq!(session.url, "https://checkout.stripe.com/pay/cs_test_a1");
    assert_eq!(session.session_id, "cs_test_a1");
}

#[tokio::test]
async fn checkout_session_propagates_gateway_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": { "message": "Your card was declined." }
        })))
        .mount(&server)
        .await;

    let client = StripeClient::new(server.uri(), "sk_test_x");
    match client.create_checkout_session(checkout_params()).await {
        Err(StripeError::ApiError {
            status_code,
            message,
        }) => {
            assert_eq!(status_code, 402);
            assert_eq!(message, "Your card was declined.");
        }
        other => panic!("expected ApiError, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn refund_carries_idempotency_key_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/refunds"))
        .and(header("Idempotency-Key", "refund-ref_1"))
        .and(body_string_contains("payment_intent=pi_123"))
        .and(body_string_contains("amount=7500"))
        .and(body_string_contains("metadata%5BrefundRequestId%5D=ref_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "re_1",
            "status": "succeeded",
            "amount": 7500,
            "currency": "lkr"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = StripeClient::new(server.uri(), "sk_test_x");
    let refund = client
        .create_refund(RefundParams {
            payment_intent_id: "pi_123".to_string(),
            amount_minor: 7500,
            idempotency_key: Some("refund-ref_1".to_string()),
            reason: Some("requested_by_customer".to_string()),
            metadata: vec![("refundRequestId".to_string(), "ref_1".to_string())],
        })
        .await
        .expect("refund created");
    assert_eq!(refund.id, "re_1");
    assert_eq!(refund.status, "succeeded");
    assert_eq!(refund.amount, Some(7500));
}
