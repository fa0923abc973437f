// --- File: crates/buslink_stripe/src/service.rs ---
//! [`PaymentGateway`] implementation backed by the Stripe API.

use buslink_common::services::{
    BoxFuture, CheckoutSessionParams, CheckoutSessionResult, GatewayRefund, PaymentGateway,
    RefundParams,
};
use buslink_config::StripeConfig;

use crate::error::StripeError;
use crate::logic::StripeClient;

/// Stripe payment gateway implementation.
pub struct StripeGateway {
    client: StripeClient,
}

impl StripeGateway {
    pub fn from_config(config: &StripeConfig) -> Result<Self, StripeError> {
        Ok(Self {
            client: StripeClient::from_config(config)?,
        })
    }

    pub fn new(client: StripeClient) -> Self {
        Self { client }
    }
}

impl PaymentGateway for StripeGateway {
    type Error = StripeError;

    fn create_checkout_session(
        &self,
        params: CheckoutSessionParams,
    ) -> BoxFuture<'_, CheckoutSessionResult, Self::Error> {
        Box::pin(async move { self.client.create_checkout_session(params).await })
    }

    fn create_refund(&self, params: RefundParams) -> BoxFuture<'_, GatewayRefund, Self::Error> {
        Box::pin(async move { self.client.create_refund(params).await })
    }
}
