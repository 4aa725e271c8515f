use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::http::HttpLeadsApi;
use crate::dto::leads::{LeadFormPageData, LeadsPageData};
use crate::forms::filter::FilterForm;
use crate::forms::lead::LeadForm;
use crate::models::config::ServerConfig;
use crate::routes::{
    Alert, backend_api, base_context, flash_alerts, load_snapshot, redirect, render_template,
    store_snapshot,
};
use crate::services::ServiceError;
use crate::services::auth::current_user;
use crate::services::controller::LeadQueryController;
use crate::services::leads::{
    CREATE_FAILED_MESSAGE, LOAD_FAILED_MESSAGE, UPDATE_FAILED_MESSAGE, create_lead, load_lead,
    update_lead,
};

type Controller = LeadQueryController<HttpLeadsApi>;

/// Longest filter JSON kept in the cookie session.
pub const MAX_FILTERS_LEN: usize = 1024;

pub const FILTERS_TOO_LONG_MESSAGE: &str = "Filters are too long. Please shorten the search text.";

fn controller(
    req: &HttpRequest,
    session: &Session,
    api: &HttpLeadsApi,
    server_config: &ServerConfig,
) -> Controller {
    LeadQueryController::restore(
        backend_api(req, api, server_config),
        load_snapshot(session, server_config.page_size),
    )
}

/// Saves the query for the next request and renders the list.
async fn render_list(
    controller: &Controller,
    session: &Session,
    alerts: &[Alert],
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    store_snapshot(session, &controller.snapshot());

    let user = current_user(controller.api()).await.ok().flatten();
    let data = LeadsPageData::new(controller.view(), &controller.query());

    let mut context = base_context(alerts, user.as_ref(), "leads", server_config);
    context.insert("leads", &data);
    render_template(tera, "leads/index.html", &context)
}

async fn render_form(
    api: &HttpLeadsApi,
    data: LeadFormPageData,
    server_config: &ServerConfig,
    tera: &Tera,
) -> HttpResponse {
    let user = current_user(api).await.ok().flatten();

    let mut context = base_context(&[], user.as_ref(), "lead_form", server_config);
    context.insert("lead", &data);
    render_template(tera, "leads/form.html", &context)
}

#[get("/")]
pub async fn index() -> impl Responder {
    redirect("/leads")
}

#[get("/leads")]
pub async fn show_leads(
    req: HttpRequest,
    session: Session,
    flash_messages: IncomingFlashMessages,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let controller = controller(&req, &session, &api, &server_config);

    if let Err(ServiceError::Unauthorized) = controller.refresh().await {
        return redirect(&server_config.login_url);
    }

    let alerts = flash_alerts(&flash_messages);
    render_list(&controller, &session, &alerts, &server_config, &tera).await
}

#[get("/leads/page/{page}")]
pub async fn show_page(
    page: web::Path<usize>,
    req: HttpRequest,
    session: Session,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let controller = controller(&req, &session, &api, &server_config);
    let mut alerts = Vec::new();

    let result = match controller.go_to_page(page.into_inner()).await {
        Err(err @ ServiceError::PageOutOfRange { .. }) => {
            log::warn!("Rejected page navigation: {err}");
            alerts.push(("That page does not exist.".to_string(), "warning"));
            controller.refresh().await
        }
        result => result,
    };

    if let Err(ServiceError::Unauthorized) = result {
        return redirect(&server_config.login_url);
    }

    render_list(&controller, &session, &alerts, &server_config, &tera).await
}

#[post("/leads/filter")]
pub async fn apply_filters(
    req: HttpRequest,
    session: Session,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<FilterForm>,
) -> impl Responder {
    let controller = controller(&req, &session, &api, &server_config);
    let filters = form.build();

    let fits = filters
        .to_json()
        .is_ok_and(|json| json.len() <= MAX_FILTERS_LEN);
    if !fits {
        log::warn!("Rejected filters longer than {MAX_FILTERS_LEN} bytes");
        if let Err(ServiceError::Unauthorized) = controller.refresh().await {
            return redirect(&server_config.login_url);
        }
        let alerts = [(FILTERS_TOO_LONG_MESSAGE.to_string(), "warning")];
        return render_list(&controller, &session, &alerts, &server_config, &tera).await;
    }

    log::debug!("Applied filters: {:?}", filters.summary());
    if let Err(ServiceError::Unauthorized) = controller.set_filters(filters).await {
        return redirect(&server_config.login_url);
    }

    render_list(&controller, &session, &[], &server_config, &tera).await
}

#[post("/leads/filter/clear")]
pub async fn clear_filters(
    req: HttpRequest,
    session: Session,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let controller = controller(&req, &session, &api, &server_config);

    if let Err(ServiceError::Unauthorized) = controller.clear_filters().await {
        return redirect(&server_config.login_url);
    }

    render_list(&controller, &session, &[], &server_config, &tera).await
}

#[post("/leads/delete/{id}")]
pub async fn delete_lead(
    id: web::Path<String>,
    req: HttpRequest,
    session: Session,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let controller = controller(&req, &session, &api, &server_config);

    // A successful delete has already re-fetched the page.
    let alert = match controller.delete_lead(&id).await {
        Ok(()) => ("Lead deleted successfully!".to_string(), "success"),
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("You are not authorized to delete this lead").send();
            return redirect(&server_config.login_url);
        }
        Err(err) => {
            let message = match err {
                ServiceError::NotFound => "Lead not found or already deleted".to_string(),
                ServiceError::Validation(message) => message,
                _ => "Failed to delete lead. Please try again.".to_string(),
            };
            if let Err(ServiceError::Unauthorized) = controller.refresh().await {
                return redirect(&server_config.login_url);
            }
            (message, "danger")
        }
    };

    render_list(&controller, &session, &[alert], &server_config, &tera).await
}

#[get("/leads/new")]
pub async fn new_lead(
    req: HttpRequest,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let api = backend_api(&req, &api, &server_config);
    let data = LeadFormPageData::new(LeadForm::default(), None, None);
    render_form(&api, data, &server_config, &tera).await
}

#[post("/leads/new")]
pub async fn add_lead(
    req: HttpRequest,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LeadForm>,
) -> impl Responder {
    let api = backend_api(&req, &api, &server_config);

    match create_lead(&api, form.clone()).await {
        Ok(()) => {
            FlashMessage::success("Lead created.").send();
            redirect("/leads")
        }
        Err(ServiceError::Unauthorized) => redirect(&server_config.login_url),
        Err(err) => {
            let data =
                LeadFormPageData::new(form, None, Some(err.message_or(CREATE_FAILED_MESSAGE)));
            render_form(&api, data, &server_config, &tera).await
        }
    }
}

#[get("/leads/edit/{id}")]
pub async fn edit_lead(
    id: web::Path<String>,
    req: HttpRequest,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let api = backend_api(&req, &api, &server_config);
    let id = id.into_inner();

    let data = match load_lead(&api, &id).await {
        Ok(lead) => LeadFormPageData::new(LeadForm::from(&lead), Some(id), None),
        Err(ServiceError::Unauthorized) => return redirect(&server_config.login_url),
        Err(err) => LeadFormPageData::new(
            LeadForm::default(),
            Some(id),
            Some(err.message_or(LOAD_FAILED_MESSAGE)),
        ),
    };

    render_form(&api, data, &server_config, &tera).await
}

#[post("/leads/edit/{id}")]
pub async fn save_lead(
    id: web::Path<String>,
    req: HttpRequest,
    api: web::Data<HttpLeadsApi>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LeadForm>,
) -> impl Responder {
    let api = backend_api(&req, &api, &server_config);
    let id = id.into_inner();

    match update_lead(&api, &id, form.clone()).await {
        Ok(()) => {
            FlashMessage::success("Lead updated.").send();
            redirect("/leads")
        }
        Err(ServiceError::Unauthorized) => redirect(&server_config.login_url),
        Err(err) => {
            let data = LeadFormPageData::new(
                form,
                Some(id),
                Some(err.message_or(UPDATE_FAILED_MESSAGE)),
            );
            render_form(&api, data, &server_config, &tera).await
        }
    }
}
