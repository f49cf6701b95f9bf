use actix_session::Session;
use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::client::ApiClient;
use crate::cache::QueryCache;
use crate::forms::payments::AssignPaymentForm;
use crate::forms::query::{PaymentFilterQuery, TableQuery};
use crate::models::config::ServerConfig;
use crate::routes::{
    apply_table_query, base_context, load_table_state, redirect, render_template, save_table_state,
};
use crate::services::{ServiceError, payments as payments_service};

#[get("/payments")]
pub async fn show_payments(
    params: web::Query<TableQuery>,
    filters: web::Query<PaymentFilterQuery>,
    session: Session,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut state = load_table_state(&session, "payments", server_config.default_page_size);
    if let Err(response) = apply_table_query(&params, &mut state, "/payments") {
        return response;
    }

    let data =
        payments_service::load_payments_page(&repo.into_inner(), &cache, &mut state, &filters)
            .await;
    save_table_state(&session, &state);

    let mut context = base_context(&flash_messages, "payments");
    context.insert("payments", &data.payments);
    context.insert("customers", &data.customers);
    context.insert("search", &data.search);
    context.insert("from", &data.from);
    context.insert("to", &data.to);
    context.insert("source", &data.source);
    context.insert("assigned", &data.assigned);
    context.insert("sources", &data.sources);

    render_template(&tera, "payments/index.html", &context)
}

#[post("/payments/{payment_id}/assign")]
pub async fn assign_payment(
    payment_id: web::Path<u32>,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<AssignPaymentForm>,
) -> impl Responder {
    let payment_id = payment_id.into_inner();

    match payments_service::assign_payment(repo.get_ref(), &cache, payment_id, form).await {
        Ok(()) => {
            FlashMessage::success("Payment assigned.").send();
        }
        Err(ServiceError::Form(err)) => {
            FlashMessage::error(err.to_string()).send();
        }
        Err(err) => {
            log::error!("Failed to assign payment {payment_id}: {err}");
            FlashMessage::error(err.to_string()).send();
        }
    }
    redirect("/payments")
}
