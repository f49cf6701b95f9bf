use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::{NewCustomer, UpdateCustomer};
use crate::domain::types::CustomerId;
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form data for registering a customer.
pub struct AddCustomerForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 digits."))]
    pub phone_number: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Form data for editing a customer, including the active flag.
pub struct EditCustomerForm {
    pub id: u32,
    #[validate(length(min = 2, message = "Name must be at least 2 characters."))]
    pub name: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 digits."))]
    pub phone_number: String,
    /// `"true"` or `"false"` as posted by the status select.
    pub status: String,
}

impl TryFrom<AddCustomerForm> for NewCustomer {
    type Error = FormError;

    fn try_from(form: AddCustomerForm) -> Result<Self, Self::Error> {
        let form = AddCustomerForm {
            name: form.name.trim().to_string(),
            phone_number: form.phone_number.trim().to_string(),
        };
        form.validate()?;

        Ok(NewCustomer::new(&form.name, &form.phone_number))
    }
}

impl TryFrom<EditCustomerForm> for UpdateCustomer {
    type Error = FormError;

    fn try_from(form: EditCustomerForm) -> Result<Self, Self::Error> {
        let form = EditCustomerForm {
            name: form.name.trim().to_string(),
            phone_number: form.phone_number.trim().to_string(),
            ..form
        };
        form.validate()?;

        let status = match form.status.trim() {
            "true" => true,
            "false" => false,
            _ => return Err(FormError::InvalidStatus),
        };

        Ok(UpdateCustomer {
            id: CustomerId::new(form.id)?,
            name: form.name,
            phone_number: form.phone_number,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit_form(status: &str) -> EditCustomerForm {
        EditCustomerForm {
            id: 3,
            name: " Achieng Otieno ".to_string(),
            phone_number: "0712345678".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn add_form_rejects_short_fields() {
        let form = AddCustomerForm {
            name: " A ".to_string(),
            phone_number: "07123".to_string(),
        };

        let Err(FormError::Validation(errors)) = NewCustomer::try_from(form) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("name"), ["Name must be at least 2 characters."]);
        assert_eq!(
            errors.get("phone_number"),
            ["Phone number must be at least 10 digits."]
        );
    }

    #[test]
    fn add_form_trims_values() {
        let form = AddCustomerForm {
            name: "  Wanjiku Kamau ".to_string(),
            phone_number: " 0712345678 ".to_string(),
        };

        let customer = NewCustomer::try_from(form).unwrap();
        assert_eq!(customer.name, "Wanjiku Kamau");
        assert_eq!(customer.phone_number, "0712345678");
    }

    #[test]
    fn edit_form_parses_status() {
        let active = UpdateCustomer::try_from(edit_form("true")).unwrap();
        assert!(active.status);
        assert_eq!(active.name, "Achieng Otieno");

        let inactive = UpdateCustomer::try_from(edit_form("false")).unwrap();
        assert!(!inactive.status);

        assert!(matches!(
            UpdateCustomer::try_from(edit_form("maybe")),
            Err(FormError::InvalidStatus)
        ));
    }

    #[test]
    fn edit_form_rejects_zero_id() {
        let form = EditCustomerForm {
            id: 0,
            ..edit_form("true")
        };
        assert!(matches!(
            UpdateCustomer::try_from(form),
            Err(FormError::InvalidId)
        ));
    }
}
