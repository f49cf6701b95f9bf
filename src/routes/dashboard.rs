use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::api::client::ApiClient;
use crate::cache::QueryCache;
use crate::routes::{base_context, render_template};
use crate::services::dashboard as dashboard_service;

#[get("/")]
pub async fn show_dashboard(
    repo: web::Data<ApiClient>,
    cache: web::Data<QueryCache>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = dashboard_service::load_dashboard(&repo.into_inner(), &cache).await;

    let mut context = base_context(&flash_messages, "dashboard");
    context.insert("stats", &data.stats);
    context.insert("overview", &data.overview);
    context.insert("stats_error", &data.stats_error);
    context.insert("recent_payments", &data.recent_payments);
    context.insert("recent_loans", &data.recent_loans);

    render_template(&tera, "dashboard/index.html", &context)
}
