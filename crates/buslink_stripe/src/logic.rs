// --- File: crates/buslink_stripe/src/logic.rs ---
use buslink_common::services::{
    CheckoutSessionParams, CheckoutSessionResult, GatewayRefund, RefundParams,
};
use buslink_common::HTTP_CLIENT;
use buslink_config::StripeConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use tracing::{error, info};

use crate::error::StripeError;

const STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_PRODUCT_NAME: &str = "Bus Ticket Booking";

// --- Data Structures ---

/// Request from our frontend to create a Stripe Checkout Session.
///
/// Everything is optional at the wire level; [`CreateCheckoutSessionRequest::validate`]
/// enforces presence so a malformed body is rejected before any gateway call.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    /// Major-unit amount as a JSON number or string; truncated to minor units.
    pub amount: Option<Value>,
    pub currency: Option<String>,
    pub booking_id: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct CreateCheckoutSessionResponse {
    pub url: String,
}

/// Request body of the direct refund endpoint.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DirectRefundRequest {
    pub payment_intent_id: Option<String>,
    /// Amount in minor units, as a JSON number or string.
    pub amount: Option<Value>,
}

#[derive(Serialize, Debug)]
pub struct DirectRefundResponse {
    pub success: bool,
    pub refund: Value,
}

/// Converts a JSON amount to an integer minor-unit value, truncating (not
/// rounding) any fractional or string input: `"500"` -> 500, `500.9` -> 500.
pub fn minor_units(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .map(|f| f.trunc() as i64),
        _ => None,
    }
}

impl CreateCheckoutSessionRequest {
    /// Validates the request and resolves it into gateway parameters.
    pub fn validate(self) -> Result<CheckoutSessionParams, StripeError> {
        let amount = self.amount.ok_or(StripeError::MissingField("amount"))?;
        let currency = self.currency.ok_or(StripeError::MissingField("currency"))?;
        let success_url = self
            .success_url
            .ok_or(StripeError::MissingField("successUrl"))?;
        let cancel_url = self
            .cancel_url
            .ok_or(StripeError::MissingField("cancelUrl"))?;

        let unit_amount =
            minor_units(&amount).ok_or_else(|| StripeError::InvalidAmount(amount.to_string()))?;

        Ok(CheckoutSessionParams {
            unit_amount,
            currency,
            booking_id: self.booking_id,
            success_url,
            cancel_url,
        })
    }
}

impl DirectRefundRequest {
    pub fn validate(self) -> Result<RefundParams, StripeError> {
        let payment_intent_id = self
            .payment_intent_id
            .ok_or(StripeError::MissingField("paymentIntentId"))?;
        let amount = self.amount.ok_or(StripeError::MissingField("amount"))?;
        let amount_minor =
            minor_units(&amount).ok_or_else(|| StripeError::InvalidAmount(amount.to_string()))?;

        Ok(RefundParams {
            payment_intent_id,
            amount_minor,
            idempotency_key: None,
            reason: None,
            metadata: Vec::new(),
        })
    }
}

// --- Stripe API Client ---

#[derive(Deserialize, Debug)]
struct StripeCheckoutSessionApiResponse {
    pub id: String,
    pub url: Option<String>,
}

/// Thin client for the two Stripe API calls this system makes.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    base_url: String,
    secret_key: String,
    product_name: String,
}

impl StripeClient {
    /// Builds a client from config; the secret key comes from the
    /// `STRIPE_SECRET_KEY` environment variable, never from the config file.
    pub fn from_config(config: &StripeConfig) -> Result<Self, StripeError> {
        let secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| StripeError::ConfigError)?;
        let base_url = config
            .api_base_url
            .clone()
            .unwrap_or_else(|| STRIPE_API_BASE.to_string());
        let product_name = config
            .product_name
            .clone()
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());
        Ok(Self {
            http: HTTP_CLIENT.clone(),
            base_url,
            secret_key,
            product_name,
        })
    }

    /// Client against an explicit base URL, used by tests with a mock server.
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: HTTP_CLIENT.clone(),
            base_url: base_url.into(),
            secret_key: secret_key.into(),
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
        }
    }

    /// Creates a Stripe Checkout Session with a single line item tagged with
    /// the booking id. Every call creates a new session.
    pub async fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> Result<CheckoutSessionResult, StripeError> {
        info!(
            "[Stripe] Creating checkout session, amount {} {} (booking {:?})",
            params.unit_amount, params.currency, params.booking_id
        );

        let mut form_body: Vec<(String, String)> = vec![
            ("payment_method_types[]".to_string(), "card".to_string()),
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), params.success_url),
            ("cancel_url".to_string(), params.cancel_url),
            (
                "line_items[0][price_data][currency]".to_string(),
                params.currency,
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                self.product_name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                params.unit_amount.to_string(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];
        if let Some(booking_id) = &params.booking_id {
            form_body.push((
                "line_items[0][price_data][product_data][metadata][bookingId]".to_string(),
                booking_id.clone(),
            ));
            form_body.push(("client_reference_id".to_string(), booking_id.clone()));
        }

        let api_url = format!("{}/v1/checkout/sessions", self.base_url);
        let response = self
            .http
            .post(&api_url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            let stripe_response: StripeCheckoutSessionApiResponse =
                serde_json::from_str(&body_text)?;
            match stripe_response.url {
                Some(url) => Ok(CheckoutSessionResult {
                    session_id: stripe_response.id,
                    url,
                }),
                None => {
                    error!("[Stripe] Response missing checkout session URL: {}", body_text);
                    Err(StripeError::InternalError(
                        "Stripe response missing checkout URL".to_string(),
                    ))
                }
            }
        } else {
            let message = extract_error_message(&body_text);
            error!(
                "[Stripe] Checkout session request failed: {} - {}",
                status, message
            );
            Err(StripeError::ApiError {
                status_code: status.as_u16(),
                message,
            })
        }
    }

    /// Issues a partial or full refund for a charge. When `idempotency_key`
    /// is set the gateway dedupes retries, so a replayed call cannot refund
    /// twice.
    pub async fn create_refund(&self, params: RefundParams) -> Result<GatewayRefund, StripeError> {
        info!(
            "[Stripe] Creating refund of {} minor units for {}",
            params.amount_minor, params.payment_intent_id
        );

        let mut form_body: Vec<(String, String)> = vec![
            ("payment_intent".to_string(), params.payment_intent_id),
            ("amount".to_string(), params.amount_minor.to_string()),
        ];
        if let Some(reason) = params.reason {
            form_body.push(("reason".to_string(), reason));
        }
        for (key, value) in params.metadata {
            form_body.push((format!("metadata[{}]", key), value));
        }

        let api_url = format!("{}/v1/refunds", self.base_url);
        let mut request = self
            .http
            .post(&api_url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form_body);
        if let Some(key) = params.idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            let raw: Value = serde_json::from_str(&body_text)?;
            let id = raw
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    StripeError::InternalError("Stripe refund response missing id".to_string())
                })?
                .to_string();
            let refund_status = raw
                .get("status")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string();
            Ok(GatewayRefund {
                id,
                status: refund_status,
                amount: raw.get("amount").and_then(|v| v.as_i64()),
                currency: raw
                    .get("currency")
                    .and_then(|v| v.as_str())
                    .map(String::from),
                raw,
            })
        } else {
            let message = extract_error_message(&body_text);
            error!("[Stripe] Refund request failed: {} - {}", status, message);
            Err(StripeError::ApiError {
                status_code: status.as_u16(),
                message,
            })
        }
    }
}

/// Pulls `error.message` out of a Stripe error body, falling back to the raw
/// text when the body is not the expected shape.
fn extract_error_message(body_text: &str) -> String {
    match serde_json::from_str::<Value>(body_text) {
        Ok(json_body) => json_body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body_text)
            .to_string(),
        Err(_) => body_text.to_string(),
    }
}
