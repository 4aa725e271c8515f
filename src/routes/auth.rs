use actix_session::Session;
use actix_web::{HttpRequest, Responder, post, web};

use crate::api::http::HttpLeadsApi;
use crate::models::config::ServerConfig;
use crate::routes::{backend_api, redirect};
use crate::services::auth;

#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    session: Session,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let api = backend_api(&req, &api, &server_config);
    auth::logout(&api).await;
    session.purge();
    redirect(&server_config.login_url)
}
