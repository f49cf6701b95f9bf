#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::api::client::ApiClient;
#[cfg(feature = "server")]
use crate::cache::QueryCache;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::routes::customers::{add_customer, edit_customer, show_customer, show_customers};
#[cfg(feature = "server")]
use crate::routes::dashboard::show_dashboard;
#[cfg(feature = "server")]
use crate::routes::loans::{add_loan, show_loans};
#[cfg(feature = "server")]
use crate::routes::payments::{assign_payment, show_payments};
#[cfg(feature = "server")]
use crate::routes::sms::{new_sms, send_sms, show_sms};
#[cfg(feature = "server")]
use crate::routes::{health, register_filters};

#[cfg(feature = "data")]
pub mod api;
#[cfg(feature = "data")]
pub mod cache;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod services;
#[cfg(feature = "data")]
pub mod state;
#[cfg(feature = "data")]
pub mod views;

/// Loads the templates and registers the filters they use.
#[cfg(feature = "server")]
pub fn build_tera(templates_dir: &str) -> std::io::Result<Tera> {
    let mut tera = Tera::new(templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;
    register_filters(&mut tera);
    Ok(tera)
}

/// Registers every dashboard handler on an app or scope.
#[cfg(feature = "server")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(show_dashboard)
        .service(show_customers)
        .service(add_customer)
        .service(show_customer)
        .service(edit_customer)
        .service(show_loans)
        .service(add_loan)
        .service(show_payments)
        .service(assign_payment)
        .service(show_sms)
        .service(new_sms)
        .service(send_sms);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let api_client = ApiClient::new(&server_config.api_client_config())
        .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;
    log::info!("Using backend API at {}", server_config.api_base_url);

    let cache = QueryCache::with_limits(
        Duration::from_millis(server_config.stale_time_ms),
        server_config.cache_max_entries,
        Duration::from_millis(server_config.cache_idle_ms),
    );

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = build_tera(&server_config.templates_dir)?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(server_config.cookie_domain())
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(api_client.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
