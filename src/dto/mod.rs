//! DTOs that bridge services with templates.

use serde::Serialize;

use crate::domain::customer::Customer;
use crate::domain::dashboard::{DashboardStats, OverviewPoint};
use crate::domain::loan::Loan;
use crate::domain::payment::{AssignedFilter, Payment};
use crate::domain::sms::SmsMessage;
use crate::forms::query::CustomerTab;
use crate::pagination::Paginated;

/// Customer with the values templates display next to it.
#[derive(Debug, Serialize)]
pub struct CustomerRow {
    #[serde(flatten)]
    pub customer: Customer,
    pub code: String,
    pub status_label: &'static str,
}

impl From<Customer> for CustomerRow {
    fn from(customer: Customer) -> Self {
        Self {
            code: customer.display_code(),
            status_label: customer.status_label(),
            customer,
        }
    }
}

/// Payment with the derived values of the payment tables.
#[derive(Debug, Serialize)]
pub struct PaymentRow {
    #[serde(flatten)]
    pub payment: Payment,
    pub initials: String,
    pub can_assign: bool,
    pub customer: Option<CustomerRow>,
}

impl From<Payment> for PaymentRow {
    fn from(payment: Payment) -> Self {
        Self {
            initials: payment.payer_initials(),
            can_assign: payment.can_assign(),
            customer: payment.assigned_customer().cloned().map(CustomerRow::from),
            payment,
        }
    }
}

/// Data required to render the dashboard.
#[derive(Debug)]
pub struct DashboardPageData {
    pub stats: Option<DashboardStats>,
    pub overview: Vec<OverviewPoint>,
    /// Message shown in place of the stats cards when they failed to load.
    pub stats_error: Option<String>,
    pub recent_payments: Paginated<PaymentRow>,
    pub recent_loans: Paginated<Loan>,
}

/// Data required to render the customers list.
#[derive(Debug)]
pub struct CustomersPageData {
    pub customers: Paginated<CustomerRow>,
    pub search: String,
}

/// Data required to render one customer with the selected sub-list.
#[derive(Debug)]
pub struct CustomerPageData {
    pub customer: CustomerRow,
    pub tab: CustomerTab,
    pub loans: Option<Paginated<Loan>>,
    pub payments: Option<Paginated<PaymentRow>>,
    pub sms: Option<Paginated<SmsMessage>>,
}

/// Data required to render the loans list and the add-loan form.
#[derive(Debug)]
pub struct LoansPageData {
    pub loans: Paginated<Loan>,
    pub customers: Vec<CustomerRow>,
    pub search: String,
}

/// Data required to render the payments list.
#[derive(Debug)]
pub struct PaymentsPageData {
    pub payments: Paginated<PaymentRow>,
    pub customers: Vec<CustomerRow>,
    pub search: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub source: Option<String>,
    pub assigned: AssignedFilter,
    /// Distinct transaction sources on the current page.
    pub sources: Vec<String>,
}

/// Data required to render the SMS list.
#[derive(Debug)]
pub struct SmsPageData {
    pub messages: Paginated<SmsMessage>,
    pub search: String,
}

/// Data required to render the send-SMS form.
#[derive(Debug)]
pub struct NewSmsPageData {
    pub customers: Vec<CustomerRow>,
    pub selected: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_row_hides_placeholder_customer() {
        let payment: Payment = serde_json::from_value(json!({
            "id": 3,
            "transaction_number": "QK71XY",
            "transaction_source": "MPESA",
            "paying_name": "mary wambui",
            "amount": 1200.0,
            "assigned": false,
            "assigned_to": 0,
            "customer_details": {"id": 0, "name": "", "phone_number": ""}
        }))
        .unwrap();

        let row = PaymentRow::from(payment);
        assert!(row.can_assign);
        assert!(row.customer.is_none());
        assert_eq!(row.initials, "MW");

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["transaction_number"], "QK71XY");
        assert_eq!(value["can_assign"], true);
    }

    #[test]
    fn customer_row_carries_code() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 7,
            "name": "Jane",
            "phone_number": "0712345678",
            "status": true,
            "loaned": 0.0
        }))
        .unwrap();

        let value = serde_json::to_value(CustomerRow::from(customer)).unwrap();
        assert_eq!(value["code"], "CST007");
        assert_eq!(value["name"], "Jane");
    }
}
