//! Form definitions backing the dashboard routes.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use thiserror::Error;
use validator::ValidationErrors;

pub mod customers;
pub mod loans;
pub mod payments;
pub mod query;
pub mod sms;

/// Validation messages keyed by form field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .0
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>();
        f.write_str(&messages.join("; "))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|error| match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("{field} is invalid"),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        Self(fields)
    }
}

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("{0}")]
    Validation(FieldErrors),

    #[error("Invalid identifier.")]
    InvalidId,

    #[error("Status must be active or inactive.")]
    InvalidStatus,

    #[error("Please select at least one customer.")]
    NoRecipients,

    #[error("Dates must use the YYYY-MM-DD format.")]
    InvalidDate,
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        FormError::Validation(errors.into())
    }
}

impl From<crate::domain::types::TypeConstraintError> for FormError {
    fn from(_: crate::domain::types::TypeConstraintError) -> Self {
        FormError::InvalidId
    }
}
