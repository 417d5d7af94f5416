use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::payment::{
    CheckoutLineItem, CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway,
};

const SESSIONS_PATH: &str = "v1/checkout/sessions";

/// Checkout sessions through the Stripe REST API.
#[derive(Debug, Clone)]
pub struct StripeGateway {
    client: Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.stripe_api_base, &config.stripe_secret_key)
    }

    fn sessions_url(&self) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), SESSIONS_PATH)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let body = encode_session_params(request)?;

        let response = self
            .client
            .post(self.sessions_url())
            .bearer_auth(&self.secret_key)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let session = parse_session(response).await?;
        log::info!("Created checkout session {}", session.id);
        Ok(session)
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let response = self
            .client
            .get(format!("{}/{}", self.sessions_url(), session_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        parse_session(response).await
    }
}

#[derive(Serialize)]
struct SessionParams<'a> {
    mode: &'a str,
    payment_method_types: Vec<&'a str>,
    line_items: Vec<LineItemParams<'a>>,
    success_url: &'a str,
    cancel_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<&'a str>,
    metadata: SessionMetadata<'a>,
    billing_address_collection: &'a str,
    allow_promotion_codes: bool,
}

#[derive(Serialize)]
struct LineItemParams<'a> {
    price_data: PriceData<'a>,
    quantity: u32,
}

#[derive(Serialize)]
struct PriceData<'a> {
    currency: &'a str,
    product_data: ProductData<'a>,
    unit_amount: i64,
}

#[derive(Serialize)]
struct ProductData<'a> {
    name: &'a str,
    // Stripe rejects an empty description.
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    metadata: ProductMetadata<'a>,
}

#[derive(Serialize)]
struct ProductMetadata<'a> {
    #[serde(rename = "productId")]
    product_id: String,
    category: &'a str,
}

#[derive(Serialize)]
struct SessionMetadata<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    #[serde(rename = "orderItems")]
    order_items: &'a str,
    timestamp: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
    payment_status: String,
    amount_total: Option<i64>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn line_item_params<'a>(currency: &'a str, item: &'a CheckoutLineItem) -> LineItemParams<'a> {
    LineItemParams {
        price_data: PriceData {
            currency,
            product_data: ProductData {
                name: &item.name,
                description: Some(item.description.as_str()).filter(|text| !text.is_empty()),
                metadata: ProductMetadata {
                    product_id: item.product_id.to_string(),
                    category: &item.category,
                },
            },
            unit_amount: item.unit_amount,
        },
        quantity: item.quantity,
    }
}

/// Form-encode a session request the way the Stripe API expects
/// (`line_items[0][price_data][currency]=jpy&...`).
fn encode_session_params(request: &CheckoutSessionRequest) -> Result<String, PaymentError> {
    let params = SessionParams {
        mode: "payment",
        payment_method_types: vec!["card"],
        line_items: request
            .line_items
            .iter()
            .map(|item| line_item_params(&request.currency, item))
            .collect(),
        success_url: &request.success_url,
        cancel_url: &request.cancel_url,
        customer_email: request.customer_email.as_deref(),
        metadata: SessionMetadata {
            user_id: &request.user_id,
            order_items: &request.order_items,
            timestamp: &request.timestamp,
        },
        billing_address_collection: "auto",
        allow_promotion_codes: true,
    };

    Ok(serde_qs::to_string(&params)?)
}

async fn parse_session(response: Response) -> Result<CheckoutSession, PaymentError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.error.message)
            .unwrap_or(body);
        log::error!("Payment processor returned {status}: {message}");
        return Err(PaymentError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let session: SessionResponse = serde_json::from_str(&body)
        .map_err(|err| PaymentError::InvalidResponse(err.to_string()))?;

    Ok(CheckoutSession {
        id: session.id,
        url: session.url,
        payment_status: session.payment_status,
        amount_total: session.amount_total,
    })
}
