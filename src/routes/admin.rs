use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::ServiceError;
use crate::services::admin::{self, AdminProductsQuery, AdminUsersQuery};

#[get("/admin")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match admin::load_dashboard(repo.get_ref(), &user) {
        Ok(stats) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                &session,
                "admin",
                &server_config,
            );
            context.insert("stats", &stats);
            render_template(&tera, "admin/dashboard.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to load the dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/users")]
pub async fn show_users(
    params: web::Query<AdminUsersQuery>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match admin::load_users_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                &session,
                "admin_users",
                &server_config,
            );
            context.insert("users", &data.users);
            context.insert("search", &data.search);
            render_template(&tera, "admin/users.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to list users: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/admin/products")]
pub async fn show_products(
    params: web::Query<AdminProductsQuery>,
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match admin::load_products_page(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                &session,
                "admin_products",
                &server_config,
            );
            context.insert("products", &data.products);
            context.insert("categories", &data.categories);
            context.insert("search", &data.search);
            context.insert("category", &data.category);
            render_template(&tera, "admin/products.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{product_id}/toggle")]
pub async fn toggle_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    match admin::toggle_product(repo.get_ref(), &user, product_id) {
        Ok(product) => {
            let state = if product.is_active { "published" } else { "hidden" };
            FlashMessage::success(format!("«{}» is now {state}.", product.title)).send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
        }
        Err(err) => {
            log::error!("Failed to toggle product {product_id}: {err}");
            FlashMessage::error("Failed to update the product.").send();
        }
    }
    redirect("/admin/products")
}

#[post("/admin/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = product_id.into_inner();
    match admin::delete_product(repo.get_ref(), &user, product_id) {
        Ok(()) => {
            FlashMessage::success("Product deleted.").send();
        }
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
        }
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            FlashMessage::error("Failed to delete the product.").send();
        }
    }
    redirect("/admin/products")
}
