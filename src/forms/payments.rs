use serde::Deserialize;
use validator::Validate;

use crate::domain::types::CustomerId;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form data for linking an unassigned payment to a customer.
pub struct AssignPaymentForm {
    #[validate(range(min = 1, message = "Please select a customer."))]
    #[serde(default)]
    pub customer_id: u32,
}

impl TryFrom<AssignPaymentForm> for CustomerId {
    type Error = FormError;

    fn try_from(form: AssignPaymentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        Ok(CustomerId::new(form.customer_id)?)
    }
}
