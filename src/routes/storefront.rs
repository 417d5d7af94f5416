use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::forms::reviews::AddReviewForm;
use crate::repository::DieselRepository;
use crate::routes::{load_cart, page_context};
use crate::services::{ServiceError, products, reviews};

#[get("/")]
pub async fn show_storefront(
    params: web::Query<products::StorefrontQuery>,
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = products::load_storefront(repo.get_ref(), params.into_inner());
    let cart = load_cart(&session);
    let in_cart = cart.product_ids();

    let mut context = page_context(
        &flash_messages,
        user.as_ref(),
        &session,
        "index",
        &server_config,
    );
    context.insert("products", &data.products);
    context.insert("categories", &data.categories);
    context.insert("stats", &data.stats);
    context.insert("search", &data.search);
    context.insert("category", &data.category);
    context.insert("fallback", &data.fallback);
    context.insert("in_cart", &in_cart);
    render_template(&tera, "storefront/index.html", &context)
}

#[get("/product/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let product_id = product_id.into_inner();

    match products::load_product_page(repo.get_ref(), user.as_ref(), product_id) {
        Ok(data) => {
            let in_cart = load_cart(&session).contains(data.product.id);
            let mut context = page_context(
                &flash_messages,
                user.as_ref(),
                &session,
                "product",
                &server_config,
            );
            context.insert("product", &data.product);
            context.insert("reviews", &data.reviews);
            context.insert("related", &data.related);
            context.insert("has_purchased", &data.has_purchased);
            context.insert("has_reviewed", &data.has_reviewed);
            context.insert("can_review", &data.can_review());
            context.insert("in_cart", &in_cart);
            context.insert("fallback", &data.fallback);
            render_template(&tera, "storefront/product.html", &context)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load product {product_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/product/{product_id}/reviews")]
pub async fn add_review(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddReviewForm>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    let product_url = format!("/product/{product_id}");

    match reviews::add_review(repo.get_ref(), &user, product_id, form) {
        Ok(_) => {
            FlashMessage::success("Thank you for your review!").send();
            redirect(&product_url)
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&product_url)
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::warning("You have already reviewed this product.").send();
            redirect(&product_url)
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to add a review to product {product_id}: {err}");
            FlashMessage::error("Failed to post the review.").send();
            redirect(&product_url)
        }
    }
}
