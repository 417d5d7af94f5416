use actix_web::{Responder, get, web};
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::redirect;

/// Hand the visitor over to the single sign-on service.
#[get("/signin")]
pub async fn signin(server_config: web::Data<CommonServerConfig>) -> impl Responder {
    redirect(&server_config.auth_service_url)
}
