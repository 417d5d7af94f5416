use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Serialize;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::domain::cart::Cart;
use crate::domain::product::Product;
use crate::domain::purchase::{NewPurchase, PurchaseDetails, PurchaseListQuery, PurchaseStatus};
use crate::domain::user::NewUser;
use crate::forms::checkout::{CheckoutFormError, CheckoutItem, CheckoutRequest};
use crate::payment::{CheckoutLineItem, CheckoutSessionRequest, PaymentError, PaymentGateway};
use crate::repository::{ProductReader, PurchaseReader, PurchaseWriter, UserWriter};
use crate::services::ServiceError;

/// Where the processor sends the buyer back. The processor substitutes the
/// session id placeholder.
pub const SUCCESS_PATH: &str = "/payment/success?session_id={CHECKOUT_SESSION_ID}";
pub const CANCEL_PATH: &str = "/payment/cancel?session_id={CHECKOUT_SESSION_ID}";

const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Add `session_id={CHECKOUT_SESSION_ID}` to a caller supplied return URL
/// that lacks the placeholder. The fragment, if any, stays last.
fn with_session_placeholder(url: String) -> String {
    if url.contains(SESSION_ID_PLACEHOLDER) {
        return url;
    }

    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url.as_str(), None),
    };
    let separator = if !base.contains('?') {
        "?"
    } else if base.ends_with('?') || base.ends_with('&') {
        ""
    } else {
        "&"
    };

    let mut result = format!("{base}{separator}session_id={SESSION_ID_PLACEHOLDER}");
    if let Some(fragment) = fragment {
        result.push('#');
        result.push_str(fragment);
    }
    result
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Form(#[from] CheckoutFormError),
    #[error("product {0} is not available")]
    UnknownProduct(i32),
    #[error("{0}")]
    Service(ServiceError),
    #[error("{0}")]
    Payment(#[from] PaymentError),
    #[error("failed to serialize order items: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("payment processor returned no checkout URL")]
    MissingUrl,
}

impl From<ServiceError> for CheckoutError {
    fn from(err: ServiceError) -> Self {
        CheckoutError::Service(err)
    }
}

impl CheckoutError {
    /// Errors caused by the request itself rather than by a backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::Form(_) | CheckoutError::UnknownProduct(_)
        )
    }
}

/// JSON answer of the checkout API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

/// Outcome shown on the payment success page.
#[derive(Debug, Serialize)]
pub struct PaymentResult {
    pub session_id: String,
    pub paid: bool,
    pub purchases: Vec<PurchaseDetails>,
    pub total: i64,
}

/// Handle `POST /api/create-checkout-session`.
pub async fn create_checkout_session<R, G>(
    repo: &R,
    gateway: &G,
    config: &StoreConfig,
    user: &AuthenticatedUser,
    request: CheckoutRequest,
) -> Result<CheckoutResponse, CheckoutError>
where
    R: ProductReader + PurchaseWriter + UserWriter + ?Sized,
    G: PaymentGateway + ?Sized,
{
    let success_url = request
        .success_url
        .clone()
        .map(with_session_placeholder)
        .unwrap_or_else(|| config.absolute_url(SUCCESS_PATH));
    let cancel_url = request
        .cancel_url
        .clone()
        .map(with_session_placeholder)
        .unwrap_or_else(|| config.absolute_url(CANCEL_PATH));
    let items = request.into_items()?;

    start_checkout(repo, gateway, config, user, &items, success_url, cancel_url).await
}

/// Check out the session cart with the default return URLs.
pub async fn checkout_cart<R, G>(
    repo: &R,
    gateway: &G,
    config: &StoreConfig,
    user: &AuthenticatedUser,
    cart: &Cart,
) -> Result<CheckoutResponse, CheckoutError>
where
    R: ProductReader + PurchaseWriter + UserWriter + ?Sized,
    G: PaymentGateway + ?Sized,
{
    if cart.is_empty() {
        return Err(CheckoutFormError::EmptyCart.into());
    }

    let items: Vec<CheckoutItem> = cart
        .items
        .iter()
        .map(|item| CheckoutItem {
            id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    start_checkout(
        repo,
        gateway,
        config,
        user,
        &items,
        config.absolute_url(SUCCESS_PATH),
        config.absolute_url(CANCEL_PATH),
    )
    .await
}

async fn start_checkout<R, G>(
    repo: &R,
    gateway: &G,
    config: &StoreConfig,
    user: &AuthenticatedUser,
    items: &[CheckoutItem],
    success_url: String,
    cancel_url: String,
) -> Result<CheckoutResponse, CheckoutError>
where
    R: ProductReader + PurchaseWriter + UserWriter + ?Sized,
    G: PaymentGateway + ?Sized,
{
    let products = resolve_products(repo, items)?;

    repo.upsert_user(&NewUser::from(user))
        .map_err(ServiceError::from)?;

    let line_items = products
        .iter()
        .zip(items)
        .map(|(product, item)| CheckoutLineItem {
            product_id: product.id,
            name: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            unit_amount: product.price,
            quantity: item.quantity,
        })
        .collect();

    let email = user.email.trim();
    let session_request = CheckoutSessionRequest {
        currency: config.currency.clone(),
        line_items,
        success_url,
        cancel_url,
        customer_email: (!email.is_empty()).then(|| email.to_string()),
        user_id: user.sub.clone(),
        order_items: serde_json::to_string(items)?,
        timestamp: Utc::now().to_rfc3339(),
    };

    let session = gateway.create_checkout_session(&session_request).await?;

    for product in &products {
        let pending = NewPurchase::pending(
            user.sub.clone(),
            product.id,
            product.title.clone(),
            session.id.clone(),
            product.price,
        );
        repo.create_purchase(&pending)
            .map_err(ServiceError::from)?;
    }

    log::info!(
        "Checkout session {} opened for user {} with {} item(s)",
        session.id,
        user.sub,
        products.len()
    );

    let url = session.url.ok_or(CheckoutError::MissingUrl)?;
    Ok(CheckoutResponse {
        session_id: session.id,
        url,
    })
}

/// Look every item up in the catalog. Prices always come from the store.
fn resolve_products<R>(repo: &R, items: &[CheckoutItem]) -> Result<Vec<Product>, CheckoutError>
where
    R: ProductReader + ?Sized,
{
    items
        .iter()
        .map(|item| {
            repo.get_product_by_id(item.id)
                .map_err(ServiceError::from)?
                .filter(|product| product.is_active)
                .ok_or(CheckoutError::UnknownProduct(item.id))
        })
        .collect()
}

/// Confirm a returning buyer's session with the processor and mark the
/// purchases completed once paid.
pub async fn complete_payment<R, G>(
    repo: &R,
    gateway: &G,
    user: &AuthenticatedUser,
    session_id: &str,
) -> Result<PaymentResult, CheckoutError>
where
    R: PurchaseReader + PurchaseWriter + ?Sized,
    G: PaymentGateway + ?Sized,
{
    let owned = session_purchases(repo, user, session_id)?;
    if owned.is_empty() {
        return Err(ServiceError::NotFound.into());
    }

    let session = gateway.retrieve_checkout_session(session_id).await?;
    let paid = session.is_paid();

    let purchases = if paid {
        repo.update_purchase_status(session_id, PurchaseStatus::Completed)
            .map_err(ServiceError::from)?;
        session_purchases(repo, user, session_id)?
    } else {
        owned
    };

    let total = purchases.iter().map(|details| details.purchase.amount).sum();

    Ok(PaymentResult {
        session_id: session_id.to_string(),
        paid,
        purchases,
        total,
    })
}

/// Mark the pending purchases of an abandoned session as failed. Completed
/// purchases are never downgraded.
pub fn cancel_payment<R>(
    repo: &R,
    user: &AuthenticatedUser,
    session_id: &str,
) -> Result<usize, CheckoutError>
where
    R: PurchaseReader + PurchaseWriter + ?Sized,
{
    let purchases = session_purchases(repo, user, session_id)?;
    let has_pending = purchases
        .iter()
        .any(|details| details.purchase.status == PurchaseStatus::Pending);

    if !has_pending {
        return Ok(0);
    }

    let updated = repo
        .update_purchase_status(session_id, PurchaseStatus::Failed)
        .map_err(ServiceError::from)?;
    log::info!("Checkout session {session_id} cancelled by user {}", user.sub);
    Ok(updated)
}

fn session_purchases<R>(
    repo: &R,
    user: &AuthenticatedUser,
    session_id: &str,
) -> Result<Vec<PurchaseDetails>, CheckoutError>
where
    R: PurchaseReader + ?Sized,
{
    let (_, purchases) = repo
        .list_purchases(
            PurchaseListQuery::new()
                .user_id(user.sub.clone())
                .session(session_id),
        )
        .map_err(ServiceError::from)?;
    Ok(purchases)
}
