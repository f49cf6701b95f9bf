//! Normalization of the backend's common response envelope.
//!
//! Every response looks like `{status_code?, message?, metadata?, data}`. A
//! 2xx body that still carries a non-empty `message` is a soft failure.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::errors::{ApiError, ApiResult};

/// Returns the `message` of a body when it is present and non-empty.
pub fn envelope_message(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
}

/// Decodes a successful (2xx) body, turning a soft failure into an error.
pub fn decode_success<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    if let Some(message) = envelope_message(&body) {
        return Err(ApiError::application(message));
    }
    Ok(serde_json::from_value(body)?)
}

/// Builds the error for a non-2xx response, preferring the server's message.
pub fn decode_failure(status: reqwest::StatusCode, raw: &[u8]) -> ApiError {
    let server_message = serde_json::from_slice::<Value>(raw)
        .ok()
        .and_then(|body| envelope_message(&body).map(str::to_string));

    match server_message {
        Some(message) => ApiError::transport(message),
        None => ApiError::transport(format!("Request failed with status {status}")),
    }
}
