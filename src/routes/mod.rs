use actix_session::Session;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::check_role;
use serde::Serialize;
use tera::Context;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::cart::{CART_SESSION_KEY, Cart};

pub mod account;
pub mod admin;
pub mod api;
pub mod auth;
pub mod cart;
pub mod payment;
pub mod seller;
pub mod storefront;

/// Session key holding the id of the last checkout session opened from the
/// cart.
pub const CHECKOUT_SESSION_KEY: &str = "checkout_session";

#[derive(Serialize)]
struct Alert {
    level: &'static str,
    message: String,
}

fn alert_class(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Template context shared by every page. Storefront pages are public, so
/// the user is optional.
pub fn page_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    session: &Session,
    current_page: &str,
    server_config: &CommonServerConfig,
) -> Context {
    let alerts: Vec<Alert> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_class(message.level()),
            message: message.content().to_string(),
        })
        .collect();

    let is_admin = user.is_some_and(|user| check_role(SERVICE_ACCESS_ROLE, &user.roles));

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context.insert("current_user", &user);
    context.insert("is_admin", &is_admin);
    context.insert("cart_count", &load_cart(session).len());
    context.insert("auth_service_url", &server_config.auth_service_url);
    context
}

/// Cart stored in the session. A missing or unreadable cart is empty.
pub fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(CART_SESSION_KEY) {
        Ok(cart) => cart.unwrap_or_default(),
        Err(err) => {
            log::warn!("Discarding unreadable cart: {err}");
            Cart::default()
        }
    }
}

pub fn store_cart(session: &Session, cart: &Cart) {
    if let Err(err) = session.insert(CART_SESSION_KEY, cart) {
        log::error!("Failed to store the cart: {err}");
    }
}
