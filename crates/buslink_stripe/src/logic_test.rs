// --- File: crates/buslink_stripe/src/logic_test.rs ---
#[cfg(test)]
mod tests {
    use crate::error::StripeError;
    use crate::logic::{minor_units, CreateCheckoutSessionRequest, DirectRefundRequest};
    use serde_json::json;

    fn full_request() -> CreateCheckoutSessionRequest {
        CreateCheckoutSessionRequest {
            amount: Some(json!(500)),
            currency: Some("lkr".to_string()),
            booking_id: Some("booking_42".to_string()),
            success_url: Some("https://buslink.example/success".to_string()),
            cancel_url: Some("https://buslink.example/cancel".to_string()),
        }
    }

    #[test]
    fn minor_units_truncates_not_rounds() {
        assert_eq!(minor_units(&json!(500)), Some(500));
        assert_eq!(minor_units(&json!(500.9)), Some(500));
        assert_eq!(minor_units(&json!("500")), Some(500));
        assert_eq!(minor_units(&json!("500.9")), Some(500));
        assert_eq!(minor_units(&json!(" 750 ")), Some(750));
        assert_eq!(minor_units(&json!("not a number")), None);
        assert_eq!(minor_units(&json!(null)), None);
        assert_eq!(minor_units(&json!([500])), None);
    }

    #[test]
    fn validate_accepts_string_amount() {
        let mut request = full_request();
        request.amount = Some(json!("500"));
        let params = request.validate().expect("valid request");
        assert_eq!(params.unit_amount, 500);
        assert_eq!(params.currency, "lkr");
        assert_eq!(params.booking_id.as_deref(), Some("booking_42"));
    }

    #[test]
    fn validate_rejects_each_missing_field() {
        for field in ["amount", "currency", "successUrl", "cancelUrl"] {
            let mut request = full_request();
            match field {
                "amount" => request.amount = None,
                "currency" => request.currency = None,
                "successUrl" => request.success_url = None,
                _ => request.cancel_url = None,
            }
            match request.validate() {
                Err(StripeError::MissingField(name)) => assert_eq!(name, field),
                other => panic!("expected MissingField({}), got {:?}", field, other.err()),
            }
        }
    }

    #[test]
    fn validate_allows_missing_booking_id() {
        let mut request = full_request();
        request.booking_id = None;
        let params = request.validate().expect("bookingId is optional");
        assert_eq!(params.booking_id, None);
    }

    #[test]
    fn direct_refund_requires_both_fields() {
        let request = DirectRefundRequest {
            payment_intent_id: None,
            amount: Some(json!(5000)),
        };
        assert!(matches!(
            request.validate(),
            Err(StripeError::MissingField("paymentIntentId"))
        ));

        let request = DirectRefundRequest {
            payment_intent_id: Some("pi_123".to_string()),
            amount: None,
        };
        assert!(matches!(
            request.validate(),
            Err(StripeError::MissingField("amount"))
        ));

        let request = DirectRefundRequest {
            payment_intent_id: Some("pi_123".to_string()),
            amount: Some(json!(5000)),
        };
        let params = request.validate().expect("valid refund request");
        assert_eq!(params.amount_minor, 5000);
        assert_eq!(params.payment_intent_id, "pi_123");
        assert!(params.idempotency_key.is_none());
    }
}
