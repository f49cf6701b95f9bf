use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::loan::NewLoan;
use crate::domain::types::CustomerId;
use crate::forms::FormError;

const AMOUNT_MESSAGE: &str = "Amount must be greater than 0.";

#[derive(Debug, Deserialize, Validate)]
/// Form data for issuing a loan to a customer.
pub struct AddLoanForm {
    #[validate(range(min = 1, message = "Please select a customer."))]
    #[serde(default)]
    pub customer_id: u32,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than 0."))]
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub description: String,
}

impl TryFrom<AddLoanForm> for NewLoan {
    type Error = FormError;

    fn try_from(form: AddLoanForm) -> Result<Self, Self::Error> {
        let mut errors = form.validate().err().unwrap_or_else(ValidationErrors::new);
        // NaN slips through range checks.
        if !form.amount.is_finite() && !errors.field_errors().contains_key("amount") {
            errors.add(
                "amount",
                ValidationError::new("finite").with_message(Cow::Borrowed(AMOUNT_MESSAGE)),
            );
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(NewLoan {
            customer_id: CustomerId::new(form.customer_id)?,
            amount: form.amount,
            description: form.description.trim().to_string(),
        })
    }
}
