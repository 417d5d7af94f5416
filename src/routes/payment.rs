use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use serde::Deserialize;
use tera::Tera;

use crate::payment::stripe::StripeGateway;
use crate::repository::DieselRepository;
use crate::routes::{CHECKOUT_SESSION_KEY, load_cart, page_context, store_cart};
use crate::services::checkout::{self, CheckoutError};
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
pub struct PaymentReturnQuery {
    pub session_id: Option<String>,
}

/// Session id from the query string, or the one remembered at checkout when
/// the processor did not fill the placeholder in.
fn resolve_session_id(query: PaymentReturnQuery, session: &Session) -> Option<String> {
    query
        .session_id
        .filter(|id| !id.is_empty() && !id.starts_with('{'))
        .or_else(|| session.get::<String>(CHECKOUT_SESSION_KEY).ok().flatten())
}

#[get("/payment/success")]
pub async fn payment_success(
    params: web::Query<PaymentReturnQuery>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<StripeGateway>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let Some(session_id) = resolve_session_id(params.into_inner(), &session) else {
        FlashMessage::error("Unknown payment session.").send();
        return redirect("/");
    };

    match checkout::complete_payment(repo.get_ref(), gateway.get_ref(), &user, &session_id).await
    {
        Ok(result) => {
            if result.paid {
                let mut cart = load_cart(&session);
                cart.clear();
                store_cart(&session, &cart);
                session.remove(CHECKOUT_SESSION_KEY);
            }
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                &session,
                "payment",
                &server_config,
            );
            context.insert("result", &result);
            render_template(&tera, "payment/success.html", &context)
        }
        Err(CheckoutError::Service(ServiceError::NotFound)) => {
            FlashMessage::error("Unknown payment session.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to confirm payment session {session_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/payment/cancel")]
pub async fn payment_cancel(
    params: web::Query<PaymentReturnQuery>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Some(session_id) = resolve_session_id(params.into_inner(), &session) {
        if let Err(err) = checkout::cancel_payment(repo.get_ref(), &user, &session_id) {
            log::error!("Failed to cancel payment session {session_id}: {err}");
        }
        session.remove(CHECKOUT_SESSION_KEY);
    }

    FlashMessage::info("Payment cancelled. Your cart is still here.").send();
    redirect("/cart")
}
