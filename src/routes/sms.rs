use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::client::ApiClient;
use crate::cache::QueryCache;
use crate::forms::query::{NewSmsQuery, TableQuery};
use crate::forms::sms::SendSmsForm;
use crate::models::config::ServerConfig;
use crate::routes::{
    apply_table_query, base_context, load_table_state, redirect, render_template, save_table_state,
};
use crate::services::{ServiceError, sms as sms_service};

#[get("/sms")]
pub async fn show_sms(
    params: web::Query<TableQuery>,
    session: Session,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut state = load_table_state(&session, "sms", server_config.default_page_size);
    if let Err(response) = apply_table_query(&params, &mut state, "/sms") {
        return response;
    }

    let data = sms_service::load_sms_page(&repo.into_inner(), &cache, &mut state).await;
    save_table_state(&session, &state);

    let mut context = base_context(&flash_messages, "sms");
    context.insert("messages", &data.messages);
    context.insert("search", &data.search);

    render_template(&tera, "sms/index.html", &context)
}

#[get("/sms/new")]
pub async fn new_sms(
    params: web::Query<NewSmsQuery>,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = sms_service::load_new_sms_page(&repo.into_inner(), &cache, &params).await;

    let mut context = base_context(&flash_messages, "sms");
    context.insert("customers", &data.customers);
    context.insert("selected", &data.selected);

    render_template(&tera, "sms/new.html", &context)
}

#[post("/sms/send")]
pub async fn send_sms(
    body: web::Bytes,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
) -> impl Responder {
    let result = match SendSmsForm::from_body(&body) {
        Ok(form) => sms_service::send_sms(repo.get_ref(), &cache, form).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(count) => {
            FlashMessage::success(format!("SMS sent to {count} customer(s).")).send();
            redirect("/sms")
        }
        Err(ServiceError::Form(err)) => {
            FlashMessage::error(err.to_string()).send();
            redirect("/sms/new")
        }
        Err(err) => {
            log::error!("Failed to send SMS: {err}");
            FlashMessage::error(err.to_string()).send();
            redirect("/sms/new")
        }
    }
}
