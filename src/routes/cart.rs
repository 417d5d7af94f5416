use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;
use validator::Validate;

use crate::config::StoreConfig;
use crate::forms::cart::CartItemForm;
use crate::payment::stripe::StripeGateway;
use crate::repository::DieselRepository;
use crate::routes::{CHECKOUT_SESSION_KEY, load_cart, page_context, store_cart};
use crate::services::cart as cart_service;
use crate::services::checkout::{self, CheckoutError};
use crate::services::ServiceError;

#[get("/cart")]
pub async fn show_cart(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut cart = load_cart(&session);
    let summary = match cart_service::load_cart_summary(repo.get_ref(), &mut cart) {
        Ok(summary) => summary,
        Err(err) => {
            log::error!("Failed to load the cart: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };
    if summary.removed > 0 {
        store_cart(&session, &cart);
    }

    let mut context = page_context(
        &flash_messages,
        user.as_ref(),
        &session,
        "cart",
        &server_config,
    );
    context.insert("cart", &summary);
    render_template(&tera, "cart/index.html", &context)
}

#[post("/cart/add")]
pub async fn add_to_cart(
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CartItemForm>,
) -> impl Responder {
    if form.validate().is_err() {
        FlashMessage::error("Unknown product.").send();
        return redirect("/");
    }

    let mut cart = load_cart(&session);
    match cart_service::add_to_cart(repo.get_ref(), user.as_ref(), &mut cart, form.product_id) {
        Ok(title) => {
            store_cart(&session, &cart);
            FlashMessage::success(format!("«{title}» was added to your cart.")).send();
            redirect("/cart")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::warning(message).send();
            redirect(&format!("/product/{}", form.product_id))
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to add product {} to the cart: {err}", form.product_id);
            FlashMessage::error("Failed to update the cart.").send();
            redirect("/")
        }
    }
}

#[post("/cart/remove")]
pub async fn remove_from_cart(
    session: Session,
    web::Form(form): web::Form<CartItemForm>,
) -> impl Responder {
    let mut cart = load_cart(&session);
    match cart_service::remove_from_cart(&mut cart, form.product_id) {
        Ok(_) => {
            store_cart(&session, &cart);
            FlashMessage::info("The product was removed from your cart.").send();
        }
        Err(_) => {
            FlashMessage::warning("That product is not in your cart.").send();
        }
    }
    redirect("/cart")
}

#[post("/cart/clear")]
pub async fn clear_cart(session: Session) -> impl Responder {
    let mut cart = load_cart(&session);
    cart.clear();
    store_cart(&session, &cart);
    redirect("/cart")
}

#[post("/cart/checkout")]
pub async fn checkout_cart(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    gateway: web::Data<StripeGateway>,
    store_config: web::Data<StoreConfig>,
) -> impl Responder {
    let cart = load_cart(&session);

    match checkout::checkout_cart(
        repo.get_ref(),
        gateway.get_ref(),
        store_config.get_ref(),
        &user,
        &cart,
    )
    .await
    {
        Ok(response) => {
            if let Err(err) = session.insert(CHECKOUT_SESSION_KEY, &response.session_id) {
                log::warn!("Failed to remember checkout session: {err}");
            }
            HttpResponse::SeeOther()
                .insert_header((actix_web::http::header::LOCATION, response.url))
                .finish()
        }
        Err(err) if err.is_client_error() => {
            FlashMessage::warning(err.to_string()).send();
            redirect("/cart")
        }
        Err(CheckoutError::Payment(err)) => {
            log::error!("Payment processor rejected checkout for {}: {err}", user.sub);
            FlashMessage::error("The payment service is unavailable, please try again.").send();
            redirect("/cart")
        }
        Err(err) => {
            log::error!("Failed to check out the cart of {}: {err}", user.sub);
            FlashMessage::error("Checkout failed.").send();
            redirect("/cart")
        }
    }
}
