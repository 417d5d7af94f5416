use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;
use pushkind_common::middleware::RedirectUnauthorized;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{logout, not_assigned};
use tera::Tera;

use storefront::config::StoreConfig;
use storefront::payment::stripe::StripeGateway;
use storefront::repository::DieselRepository;
use storefront::routes::account::show_account;
use storefront::routes::admin::{
    delete_product, show_dashboard, show_products, show_users, toggle_product,
};
use storefront::routes::api::create_checkout_session;
use storefront::routes::auth::signin;
use storefront::routes::cart::{add_to_cart, checkout_cart, clear_cart, remove_from_cart, show_cart};
use storefront::routes::payment::{payment_cancel, payment_success};
use storefront::routes::seller::{
    go_back, publish_listing, reset_draft, show_seller_form, submit_basic, submit_details,
};
use storefront::routes::storefront::{add_review, show_product, show_storefront};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret = env::var("SECRET_KEY");
    let secret_key = match &secret {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let auth_service_url = match env::var("AUTH_SERVICE_URL") {
        Ok(auth_service_url) => auth_service_url,
        Err(_) => {
            log::error!("AUTH_SERVICE_URL environment variable not set");
            std::process::exit(1);
        }
    };

    let common_config = CommonServerConfig {
        secret: secret.unwrap_or_default(),
        auth_service_url,
    };

    let store_config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);
    let gateway = StripeGateway::from_config(&store_config);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    log::info!("Starting storefront on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(signin)
            .service(show_storefront)
            .service(show_product)
            .service(show_cart)
            .service(add_to_cart)
            .service(remove_from_cart)
            .service(clear_cart)
            .service(create_checkout_session)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(add_review)
                    .service(checkout_cart)
                    .service(payment_success)
                    .service(payment_cancel)
                    .service(show_account)
                    .service(show_seller_form)
                    .service(submit_basic)
                    .service(submit_details)
                    .service(go_back)
                    .service(reset_draft)
                    .service(publish_listing)
                    .service(show_dashboard)
                    .service(show_users)
                    .service(show_products)
                    .service(toggle_product)
                    .service(delete_product)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(store_config.clone()))
            .app_data(web::Data::new(gateway.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
