use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::render_template;
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::users;

#[get("/account")]
pub async fn show_account(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match users::load_account_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = page_context(
                &flash_messages,
                Some(&user),
                &session,
                "account",
                &server_config,
            );
            context.insert("profile", &data.user);
            context.insert("purchases", &data.purchases);
            context.insert("reviews", &data.reviews);
            context.insert("total_spent", &data.total_spent);
            render_template(&tera, "account/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load account of {}: {err}", user.sub);
            HttpResponse::InternalServerError().finish()
        }
    }
}
