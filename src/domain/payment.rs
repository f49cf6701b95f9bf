use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::types::{CustomerId, PaymentId, zero_as_none};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: PaymentId,
    pub transaction_number: String,
    /// Origin of the payment, e.g. `MPESA` or `INTERNAL`.
    pub transaction_source: String,
    pub paying_name: String,
    pub amount: f64,
    #[serde(default)]
    pub assigned: bool,
    #[serde(default, deserialize_with = "zero_as_none")]
    pub assigned_to: Option<CustomerId>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer_details: Option<Customer>,
}

impl Payment {
    /// The "Assign" action is only offered for payments not linked yet.
    pub fn can_assign(&self) -> bool {
        !self.assigned
    }

    /// Customer the payment is linked to, ignoring the zero-valued summary
    /// the backend sends for unassigned payments.
    pub fn assigned_customer(&self) -> Option<&Customer> {
        if !self.assigned {
            return None;
        }
        self.customer_details.as_ref().filter(|c| c.id.get() > 0)
    }

    /// Two-letter initials of the payer used by the dashboard feed.
    pub fn payer_initials(&self) -> String {
        self.paying_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase()
    }
}

/// Filter on the assigned flag applied to the current page of payments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignedFilter {
    #[default]
    All,
    Assigned,
    Unassigned,
}

impl AssignedFilter {
    pub fn matches(self, payment: &Payment) -> bool {
        match self {
            AssignedFilter::All => true,
            AssignedFilter::Assigned => payment.assigned,
            AssignedFilter::Unassigned => !payment.assigned,
        }
    }
}
