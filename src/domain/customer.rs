use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::CustomerId;

/// Customer projection returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone_number: String,
    /// `true` for active customers.
    #[serde(default)]
    pub status: bool,
    /// Total amount loaned to the customer.
    #[serde(default)]
    pub loaned: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    /// Short display code shown in tables, e.g. `CST007`.
    pub fn display_code(&self) -> String {
        format!("CST{:03}", self.id.get())
    }

    pub fn status_label(&self) -> &'static str {
        if self.status { "Active" } else { "Inactive" }
    }
}

/// Payload for `POST /customer`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub phone_number: String,
}

impl NewCustomer {
    #[must_use]
    pub fn new(name: &str, phone_number: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            phone_number: phone_number.trim().to_string(),
        }
    }
}

/// Payload for `PATCH /customer/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct UpdateCustomer {
    pub id: CustomerId,
    pub name: String,
    pub phone_number: String,
    #[serde(serialize_with = "crate::domain::types::bool_as_string")]
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_customer() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 7,
            "name": "Jane Wanjiku",
            "phone_number": "0712345678",
            "loaned": 1500.5,
            "status": true,
            "created_at": "2024-03-01T09:30:00+03:00"
        }))
        .unwrap();

        assert_eq!(customer.display_code(), "CST007");
        assert_eq!(customer.status_label(), "Active");
        assert_eq!(
            customer.created_at.unwrap().to_rfc3339(),
            "2024-03-01T06:30:00+00:00"
        );
    }

    #[test]
    fn update_sends_status_as_string() {
        let mut updates = UpdateCustomer {
            id: CustomerId::new(3).unwrap(),
            name: "Jane".to_string(),
            phone_number: "0712345678".to_string(),
            status: true,
        };
        assert_eq!(serde_json::to_value(&updates).unwrap()["status"], json!("true"));

        updates.status = false;
        assert_eq!(serde_json::to_value(&updates).unwrap()["status"], json!("false"));
    }

    #[test]
    fn new_customer_trims_input() {
        let payload = NewCustomer::new("  Jane ", " 0712345678 ");
        assert_eq!(payload.name, "Jane");
        assert_eq!(payload.phone_number, "0712345678");
    }
}
