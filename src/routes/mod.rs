//! HTTP handlers and the helpers they share.

use std::collections::HashMap;

use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde_json::{Value, json};
use tera::{Context, Tera};

use crate::forms::query::TableQuery;
use crate::state::table::TableState;

pub mod customers;
pub mod dashboard;
pub mod loans;
pub mod payments;
pub mod sms;

const TABLE_STATE_KEY: &str = "table_state";

/// Maps a flash message level to the Bootstrap alert class.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context every page starts from: pending alerts and the active nav entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
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

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Loads the session's table state and switches it to `scope`.
pub fn load_table_state(session: &Session, scope: &str, default_page_size: u32) -> TableState {
    let mut state = session
        .get::<TableState>(TABLE_STATE_KEY)
        .unwrap_or_else(|err| {
            log::warn!("Discarding unreadable table state: {err}");
            None
        })
        .unwrap_or_else(|| TableState::new(default_page_size));
    state.enter(scope);
    state
}

/// Applies the query to `state`; a rejected query flashes the reason and
/// yields a redirect to `location`.
pub fn apply_table_query(
    params: &TableQuery,
    state: &mut TableState,
    location: &str,
) -> Result<(), HttpResponse> {
    params.apply(state).map_err(|err| {
        FlashMessage::error(err.to_string()).send();
        redirect(location)
    })
}

pub fn save_table_state(session: &Session, state: &TableState) {
    if let Err(err) = session.insert(TABLE_STATE_KEY, state) {
        log::error!("Failed to store table state: {err}");
    }
}

/// Tera filter rendering an amount as `KES 1234.50`.
pub fn money_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let amount = value
        .as_f64()
        .ok_or_else(|| tera::Error::msg(format!("money filter expects a number, got {value}")))?;
    Ok(Value::String(format!("KES {amount:.2}")))
}

/// Registers the filters templates rely on.
pub fn register_filters(tera: &mut Tera) {
    tera.register_filter("money", money_filter);
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "ok"}))
}
