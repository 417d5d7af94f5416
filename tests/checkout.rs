use std::sync::Mutex;

use async_trait::async_trait;
use storefront::config::StoreConfig;
use storefront::domain::cart::Cart;
use storefront::domain::purchase::{PurchaseListQuery, PurchaseStatus};
use storefront::forms::checkout::{CheckoutItem, CheckoutRequest};
use storefront::forms::reviews::AddReviewForm;
use storefront::payment::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway};
use storefront::repository::{ProductReader, PurchaseReader};
use storefront::services::checkout::{self, CheckoutError};
use storefront::services::{ServiceError, reviews};

mod common;

/// Gateway that records requests and reports every session as `status`.
struct FakeGateway {
    status: &'static str,
    requests: Mutex<Vec<CheckoutSessionRequest>>,
}

impl FakeGateway {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(CheckoutSession {
            id: "cs_fake".to_string(),
            url: Some("https://pay.example.com/cs_fake".to_string()),
            payment_status: "unpaid".to_string(),
            amount_total: None,
        })
    }

    async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        Ok(CheckoutSession {
            id: session_id.to_string(),
            url: None,
            payment_status: self.status.to_string(),
            amount_total: None,
        })
    }
}

fn store_config() -> StoreConfig {
    StoreConfig {
        stripe_secret_key: "sk_test".to_string(),
        stripe_api_base: "https://api.example.com".to_string(),
        currency: "jpy".to_string(),
        public_url: "https://shop.example.com".to_string(),
    }
}

fn request(items: &[(i32, u32)]) -> CheckoutRequest {
    CheckoutRequest {
        items: items
            .iter()
            .map(|(id, quantity)| CheckoutItem {
                id: *id,
                quantity: *quantity,
            })
            .collect(),
        success_url: None,
        cancel_url: None,
    }
}

#[actix_web::test]
async fn paid_checkout_unlocks_reviews() {
    let test_db = common::TestDb::new("paid_checkout_unlocks_reviews.db");
    let repo = test_db.repo();
    let gateway = FakeGateway::new("paid");
    let user = common::user("buyer", &[]);
    let product = common::seed_product(&repo, "Summarizer", 1500, "Text processing");

    let response = checkout::create_checkout_session(
        &repo,
        &gateway,
        &store_config(),
        &user,
        request(&[(product.id, 1)]),
    )
    .await
    .unwrap();
    assert_eq!(response.session_id, "cs_fake");
    assert_eq!(response.url, "https://pay.example.com/cs_fake");

    {
        let requests = gateway.requests.lock().unwrap();
        let sent = &requests[0];
        assert_eq!(sent.line_items[0].unit_amount, 1500);
        assert_eq!(sent.customer_email.as_deref(), Some("buyer@example.com"));
        assert_eq!(
            sent.success_url,
            "https://shop.example.com/payment/success?session_id={CHECKOUT_SESSION_ID}"
        );
    }

    let (_, pending) = repo
        .list_purchases(PurchaseListQuery::new().session("cs_fake"))
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].purchase.status, PurchaseStatus::Pending);

    let form = AddReviewForm {
        rating: 5,
        comment: "Saves me hours every week".to_string(),
    };
    let err = reviews::add_review(&repo, &user, product.id, form).unwrap_err();
    assert!(matches!(err, ServiceError::Form(_)));

    let result = checkout::complete_payment(&repo, &gateway, &user, "cs_fake")
        .await
        .unwrap();
    assert!(result.paid);
    assert_eq!(result.total, 1500);
    assert!(
        result
            .purchases
            .iter()
            .all(|details| details.purchase.status == PurchaseStatus::Completed)
    );

    let form = AddReviewForm {
        rating: 5,
        comment: "Saves me hours every week".to_string(),
    };
    let review = reviews::add_review(&repo, &user, product.id, form).unwrap();
    assert_eq!(review.user_name, "User buyer");

    let product = repo.get_product_by_id(product.id).unwrap().unwrap();
    assert_eq!(product.review_count, 1);
    assert_eq!(product.rating, 5.0);

    let form = AddReviewForm {
        rating: 1,
        comment: "Changed my mind about it".to_string(),
    };
    let err = reviews::add_review(&repo, &user, product.id, form).unwrap_err();
    assert!(matches!(err, ServiceError::Conflict));
}

#[actix_web::test]
async fn unpaid_session_stays_pending_and_can_be_cancelled() {
    let test_db = common::TestDb::new("unpaid_session_cancelled.db");
    let repo = test_db.repo();
    let gateway = FakeGateway::new("unpaid");
    let user = common::user("buyer", &[]);
    let product = common::seed_product(&repo, "Voice", 900, "Speech recognition");

    let mut cart = Cart::default();
    cart.add(&product).unwrap();
    checkout::checkout_cart(&repo, &gateway, &store_config(), &user, &cart)
        .await
        .unwrap();

    let result = checkout::complete_payment(&repo, &gateway, &user, "cs_fake")
        .await
        .unwrap();
    assert!(!result.paid);

    let stranger = common::user("stranger", &[]);
    let err = checkout::complete_payment(&repo, &gateway, &stranger, "cs_fake")
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Service(ServiceError::NotFound)));
    assert_eq!(checkout::cancel_payment(&repo, &stranger, "cs_fake").unwrap(), 0);

    assert_eq!(checkout::cancel_payment(&repo, &user, "cs_fake").unwrap(), 1);
    let (_, purchases) = repo
        .list_purchases(PurchaseListQuery::new().session("cs_fake"))
        .unwrap();
    assert_eq!(purchases[0].purchase.status, PurchaseStatus::Failed);
    assert!(!repo.has_completed_purchase("buyer", product.id).unwrap());
}

#[actix_web::test]
async fn inactive_or_missing_products_are_rejected() {
    let test_db = common::TestDb::new("inactive_products_rejected.db");
    let repo = test_db.repo();
    let gateway = FakeGateway::new("paid");
    let user = common::user("buyer", &[]);

    let err = checkout::create_checkout_session(
        &repo,
        &gateway,
        &store_config(),
        &user,
        request(&[(999, 1)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CheckoutError::UnknownProduct(999)));
    assert!(err.is_client_error());

    let err = checkout::create_checkout_session(&repo, &gateway, &store_config(), &user, request(&[]))
        .await
        .unwrap_err();
    assert!(err.is_client_error());
    assert!(gateway.requests.lock().unwrap().is_empty());
}
