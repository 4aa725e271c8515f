//! HTTP handlers and the helpers they share.

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, http::header};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::api::http::HttpLeadsApi;
use crate::domain::query::QueryState;
use crate::domain::user::CurrentUser;
use crate::models::config::ServerConfig;
use crate::services::controller::QuerySnapshot;

pub mod auth;
pub mod leads;

/// Session key holding the visitor's [`QuerySnapshot`].
pub const QUERY_SESSION_KEY: &str = "lead_query";

/// Upper bound for the serialized [`QuerySnapshot`]; cookies hold about 4 KB.
pub const MAX_SNAPSHOT_LEN: usize = 2048;

/// A message shown above the page content with its bootstrap alert class.
pub type Alert = (String, &'static str);

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn flash_alerts(flash_messages: &IncomingFlashMessages) -> Vec<Alert> {
    flash_messages
        .iter()
        .map(|f| (f.content().to_string(), alert_level_to_str(&f.level())))
        .collect()
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context entries every page template expects.
pub fn base_context(
    alerts: &[Alert],
    current_user: Option<&CurrentUser>,
    current_page: &str,
    server_config: &ServerConfig,
) -> Context {
    let mut context = Context::new();
    context.insert("alerts", alerts);
    context.insert("current_user", &current_user);
    context.insert("current_page", current_page);
    context.insert("login_url", &server_config.login_url);
    context
}

/// API client acting on behalf of the visitor's backend session.
pub fn backend_api(
    req: &HttpRequest,
    api: &HttpLeadsApi,
    server_config: &ServerConfig,
) -> HttpLeadsApi {
    let cookie = req.cookie(&server_config.session_cookie);
    api.with_session_cookie(
        &server_config.session_cookie,
        cookie.as_ref().map(|cookie| cookie.value()),
    )
}

/// Query state saved by the previous page load, or the defaults.
pub fn load_snapshot(session: &Session, page_size: usize) -> QuerySnapshot {
    match session.get::<QuerySnapshot>(QUERY_SESSION_KEY) {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => QuerySnapshot {
            query: QueryState::new(page_size),
            ..QuerySnapshot::default()
        },
        Err(err) => {
            log::warn!("Discarding unreadable lead query from session: {err}");
            QuerySnapshot {
                query: QueryState::new(page_size),
                ..QuerySnapshot::default()
            }
        }
    }
}

/// Saves the query unless it would overflow the session cookie, in which case
/// the next request starts from the defaults.
pub fn store_snapshot(session: &Session, snapshot: &QuerySnapshot) {
    let fits = serde_json::to_string(snapshot).is_ok_and(|json| json.len() <= MAX_SNAPSHOT_LEN);
    if !fits {
        log::warn!("Lead query exceeds {MAX_SNAPSHOT_LEN} bytes, not keeping it in the session");
        session.remove(QUERY_SESSION_KEY);
        return;
    }
    if let Err(err) = session.insert(QUERY_SESSION_KEY, snapshot) {
        log::error!("Failed to store lead query in session: {err}");
    }
}
