use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::client::ApiClient;
use crate::cache::QueryCache;
use crate::forms::loans::AddLoanForm;
use crate::forms::query::TableQuery;
use crate::models::config::ServerConfig;
use crate::routes::{
    apply_table_query, base_context, load_table_state, redirect, render_template, save_table_state,
};
use crate::services::{ServiceError, loans as loans_service};

#[get("/loans")]
pub async fn show_loans(
    params: web::Query<TableQuery>,
    session: Session,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut state = load_table_state(&session, "loans", server_config.default_page_size);
    if let Err(response) = apply_table_query(&params, &mut state, "/loans") {
        return response;
    }

    let data = loans_service::load_loans_page(&repo.into_inner(), &cache, &mut state).await;
    save_table_state(&session, &state);

    let mut context = base_context(&flash_messages, "loans");
    context.insert("loans", &data.loans);
    context.insert("customers", &data.customers);
    context.insert("search", &data.search);

    render_template(&tera, "loans/index.html", &context)
}

#[post("/loans/add")]
pub async fn add_loan(
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<AddLoanForm>,
) -> impl Responder {
    match loans_service::add_loan(repo.get_ref(), &cache, form).await {
        Ok(()) => {
            FlashMessage::success("Loan added.").send();
        }
        Err(ServiceError::Form(err)) => {
            FlashMessage::error(err.to_string()).send();
        }
        Err(err) => {
            log::error!("Failed to add loan: {err}");
            FlashMessage::error(err.to_string()).send();
        }
    }
    redirect("/loans")
}
