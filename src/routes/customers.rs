use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::api::client::ApiClient;
use crate::cache::QueryCache;
use crate::forms::customers::{AddCustomerForm, EditCustomerForm};
use crate::forms::query::{CustomerTabQuery, TableQuery};
use crate::models::config::ServerConfig;
use crate::routes::{
    apply_table_query, base_context, load_table_state, redirect, render_template, save_table_state,
};
use crate::services::{ServiceError, customers as customers_service};

#[get("/customers")]
pub async fn show_customers(
    params: web::Query<TableQuery>,
    session: Session,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut state = load_table_state(&session, "customers", server_config.default_page_size);
    if let Err(response) = apply_table_query(&params, &mut state, "/customers") {
        return response;
    }

    let data =
        customers_service::load_customers_page(&repo.into_inner(), &cache, &mut state).await;
    save_table_state(&session, &state);

    let mut context = base_context(&flash_messages, "customers");
    context.insert("customers", &data.customers);
    context.insert("search", &data.search);

    render_template(&tera, "customers/index.html", &context)
}

#[post("/customers/add")]
pub async fn add_customer(
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<AddCustomerForm>,
) -> impl Responder {
    match customers_service::add_customer(repo.get_ref(), &cache, form).await {
        Ok(()) => {
            FlashMessage::success("Customer added.").send();
        }
        Err(ServiceError::Form(err)) => {
            FlashMessage::error(err.to_string()).send();
        }
        Err(err) => {
            log::error!("Failed to add customer: {err}");
            FlashMessage::error(err.to_string()).send();
        }
    }
    redirect("/customers")
}

#[get("/customers/{customer_id}")]
pub async fn show_customer(
    customer_id: web::Path<u32>,
    params: web::Query<TableQuery>,
    tab: web::Query<CustomerTabQuery>,
    session: Session,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();
    let tab = tab.tab;

    // Each customer and tab keeps its own pagination.
    let scope = format!("customer:{customer_id}:{}", tab.as_str());
    let mut state = load_table_state(&session, &scope, server_config.default_page_size);
    let location = format!("/customers/{customer_id}?tab={}", tab.as_str());
    if let Err(response) = apply_table_query(&params, &mut state, &location) {
        return response;
    }

    let data = match customers_service::load_customer_page(
        &repo.into_inner(),
        &cache,
        customer_id,
        tab,
        &mut state,
    )
    .await
    {
        Ok(data) => data,
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Customer not found.").send();
            return redirect("/customers");
        }
        Err(err) => {
            log::error!("Failed to load customer {customer_id}: {err}");
            FlashMessage::error(err.to_string()).send();
            return redirect("/customers");
        }
    };
    save_table_state(&session, &state);

    let mut context = base_context(&flash_messages, "customers");
    context.insert("customer", &data.customer);
    context.insert("tab", data.tab.as_str());
    context.insert("loans", &data.loans);
    context.insert("payments", &data.payments);
    context.insert("sms", &data.sms);

    render_template(&tera, "customers/show.html", &context)
}

#[post("/customers/{customer_id}/edit")]
pub async fn edit_customer(
    customer_id: web::Path<u32>,
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    web::Form(form): web::Form<EditCustomerForm>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();
    if form.id != customer_id {
        return HttpResponse::BadRequest().finish();
    }

    match customers_service::update_customer(repo.get_ref(), &cache, form).await {
        Ok(_) => {
            FlashMessage::success("Customer updated.").send();
        }
        Err(ServiceError::Form(err)) => {
            FlashMessage::error(err.to_string()).send();
        }
        Err(err) => {
            log::error!("Failed to update customer {customer_id}: {err}");
            FlashMessage::error(err.to_string()).send();
        }
    }
    redirect(&format!("/customers/{customer_id}"))
}
