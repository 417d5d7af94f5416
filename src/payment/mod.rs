//! Payment processor integration.
//!
//! Services only see the [`PaymentGateway`] trait; [`stripe::StripeGateway`]
//! is the production implementation talking to the Stripe HTTP API.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod stripe;

#[cfg(test)]
pub mod mock;

/// Errors raised while talking to the payment processor.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The request never produced a response.
    #[error("payment request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The processor answered with a non-success status.
    #[error("payment processor returned {status}: {message}")]
    Api { status: u16, message: String },
    /// Request parameters could not be form-encoded.
    #[error("failed to encode payment request: {0}")]
    Encode(#[from] serde_qs::Error),
    /// The processor answered with a body we could not understand.
    #[error("unexpected payment processor response: {0}")]
    InvalidResponse(String),
}

/// One purchasable line of a checkout session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutLineItem {
    pub product_id: i32,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Price of one unit in the smallest currency unit.
    pub unit_amount: i64,
    pub quantity: u32,
}

/// Everything the processor needs to open a hosted checkout page.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSessionRequest {
    pub currency: String,
    pub line_items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub user_id: String,
    /// JSON snapshot of the ordered `{id, quantity}` pairs.
    pub order_items: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
}

/// Checkout session as reported by the processor.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page. Absent once the session is complete.
    pub url: Option<String>,
    /// Raw payment status: `paid`, `unpaid` or `no_payment_required`.
    pub payment_status: String,
    pub amount_total: Option<i64>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        matches!(self.payment_status.as_str(), "paid" | "no_payment_required")
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a new checkout session in `payment` mode.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Fetch the current state of an existing session.
    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError>;
}
