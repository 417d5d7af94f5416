use actix_web::{HttpResponse, Responder, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::config::StoreConfig;
use crate::forms::checkout::CheckoutRequest;
use crate::payment::stripe::StripeGateway;
use crate::repository::DieselRepository;
use crate::services::checkout;

#[post("/api/create-checkout-session")]
/// Open a payment checkout session for the posted items.
///
/// Anonymous callers get `401` with an `error` message; failures answer with
/// `error` and `details`.
pub async fn create_checkout_session(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<StripeGateway>,
    store_config: web::Data<StoreConfig>,
    web::Json(request): web::Json<CheckoutRequest>,
) -> impl Responder {
    let Some(user) = user else {
        return HttpResponse::Unauthorized().json(json!({ "error": "Sign-in required" }));
    };

    match checkout::create_checkout_session(
        repo.get_ref(),
        gateway.get_ref(),
        store_config.get_ref(),
        &user,
        request,
    )
    .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) if err.is_client_error() => HttpResponse::BadRequest().json(json!({
            "error": "Invalid checkout request",
            "details": err.to_string(),
        })),
        Err(err) => {
            log::error!("Checkout session creation failed for {}: {err}", user.sub);
            HttpResponse::InternalServerError().json(json!({
                "error": "Failed to create the checkout session",
                "details": err.to_string(),
            }))
        }
    }
}
