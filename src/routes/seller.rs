use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::domain::seller::{
    SELLER_CATEGORIES, SELLER_DRAFT_SESSION_KEY, SELLER_ICONS, SellerDraft,
};
use crate::forms::seller::{SellerBasicForm, SellerDetailsForm};
use crate::repository::DieselRepository;
use crate::routes::page_context;
use crate::services::{ServiceError, seller};

fn load_draft(session: &Session) -> SellerDraft {
    match session.get::<SellerDraft>(SELLER_DRAFT_SESSION_KEY) {
        Ok(draft) => draft.unwrap_or_default(),
        Err(err) => {
            log::warn!("Discarding unreadable seller draft: {err}");
            SellerDraft::default()
        }
    }
}

fn store_draft(session: &Session, draft: &SellerDraft) {
    if let Err(err) = session.insert(SELLER_DRAFT_SESSION_KEY, draft) {
        log::error!("Failed to store the seller draft: {err}");
    }
}

#[get("/sell")]
pub async fn show_seller_form(
    user: AuthenticatedUser,
    session: Session,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let draft = load_draft(&session);

    let mut context = page_context(
        &flash_messages,
        Some(&user),
        &session,
        "sell",
        &server_config,
    );
    context.insert("draft", &draft);
    context.insert("step", &draft.step.number());
    context.insert("categories", SELLER_CATEGORIES);
    context.insert("icons", SELLER_ICONS);
    render_template(&tera, "seller/index.html", &context)
}

#[post("/sell/basic")]
pub async fn submit_basic(
    session: Session,
    web::Form(form): web::Form<SellerBasicForm>,
) -> impl Responder {
    let mut draft = load_draft(&session);

    match seller::submit_basic(&mut draft, form) {
        Ok(true) => {}
        Ok(false) => {
            FlashMessage::warning("Fill in the title, description, category and price.").send();
        }
        Err(ServiceError::Form(message)) => FlashMessage::error(message).send(),
        Err(err) => {
            log::error!("Failed to save the seller draft: {err}");
            FlashMessage::error("Failed to save the listing.").send();
        }
    }

    store_draft(&session, &draft);
    redirect("/sell")
}

#[post("/sell/details")]
pub async fn submit_details(session: Session, body: web::Bytes) -> impl Responder {
    let form = match SellerDetailsForm::from_body(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected seller details form: {err}");
            FlashMessage::error("Invalid form data.").send();
            return redirect("/sell");
        }
    };

    let mut draft = load_draft(&session);
    match seller::submit_details(&mut draft, form) {
        Ok(()) => store_draft(&session, &draft),
        Err(ServiceError::Form(message)) => FlashMessage::warning(message).send(),
        Err(err) => {
            log::error!("Failed to save the seller draft: {err}");
            FlashMessage::error("Failed to save the listing.").send();
        }
    }
    redirect("/sell")
}

#[post("/sell/back")]
pub async fn go_back(session: Session) -> impl Responder {
    let mut draft = load_draft(&session);
    seller::go_back(&mut draft);
    store_draft(&session, &draft);
    redirect("/sell")
}

#[post("/sell/reset")]
pub async fn reset_draft(session: Session) -> impl Responder {
    session.remove(SELLER_DRAFT_SESSION_KEY);
    redirect("/sell")
}

#[post("/sell/submit")]
pub async fn publish_listing(
    user: AuthenticatedUser,
    session: Session,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let draft = load_draft(&session);

    match seller::publish_listing(repo.get_ref(), &user, &draft) {
        Ok(product) => {
            session.remove(SELLER_DRAFT_SESSION_KEY);
            FlashMessage::success(format!(
                "«{}» was submitted and will appear once it is reviewed.",
                product.title
            ))
            .send();
            redirect("/account")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::warning(message).send();
            redirect("/sell")
        }
        Err(err) => {
            log::error!("Failed to publish listing for {}: {err}", user.sub);
            FlashMessage::error("Failed to publish the listing.").send();
            redirect("/sell")
        }
    }
}
