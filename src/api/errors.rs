use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Where an [`ApiError`] originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network failure, non-2xx status, or an undecodable body.
    Transport,
    /// A 2xx response whose body carried a `message`.
    Application,
}

impl Display for ApiErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiErrorKind::Transport => f.write_str("transport"),
            ApiErrorKind::Application => f.write_str("application"),
        }
    }
}

/// Single error type raised at the backend boundary.
///
/// Views only ever show `message`; `kind` is kept for logging.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Application,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::transport(format!("Invalid response body: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
