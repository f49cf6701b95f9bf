use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::types::{CustomerId, LoanId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    pub id: LoanId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Denormalized summary of the owning customer.
    #[serde(default)]
    pub customer_details: Option<Customer>,
}

/// Payload for `POST /loan`.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewLoan {
    pub customer_id: CustomerId,
    pub amount: f64,
    pub description: String,
}
