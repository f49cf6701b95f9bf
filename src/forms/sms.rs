use serde::Deserialize;
use validator::Validate;

use crate::domain::sms::NewSms;
use crate::domain::types::CustomerId;
use crate::forms::FormError;

#[derive(Debug, Default, Deserialize, Validate)]
/// Form data for sending one message to many customers.
pub struct SendSmsForm {
    #[validate(length(min = 5, message = "Message must be at least 5 characters."))]
    #[serde(default)]
    pub message: String,
    /// One entry per selected recipient (`customer_ids=1&customer_ids=4`).
    #[serde(default)]
    pub customer_ids: Vec<u32>,
}

impl SendSmsForm {
    /// Decodes a urlencoded body with repeated `customer_ids` fields.
    pub fn from_body(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|err| {
            log::warn!("Failed to decode SMS form: {err}");
            FormError::InvalidId
        })
    }
}

impl TryFrom<SendSmsForm> for NewSms {
    type Error = FormError;

    fn try_from(form: SendSmsForm) -> Result<Self, Self::Error> {
        let form = SendSmsForm {
            message: form.message.trim().to_string(),
            ..form
        };
        form.validate()?;

        let mut ids = form.customer_ids;
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(FormError::NoRecipients);
        }

        let customer_ids = ids
            .into_iter()
            .map(CustomerId::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewSms {
            message: form.message,
            customer_ids,
        })
    }
}
