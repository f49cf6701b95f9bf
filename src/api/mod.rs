//! Typed access to the loan backend's REST API.
//!
//! The reader/writer traits are the seam between page services and the
//! network: [`client::ApiClient`] talks HTTP, `mock::MockBackend` stands in
//! for it in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::dashboard::Dashboard;
use crate::domain::loan::{Loan, NewLoan};
use crate::domain::page::Page;
use crate::domain::payment::Payment;
use crate::domain::sms::{NewSms, SmsMessage};
use crate::domain::types::{CustomerId, PaymentId};

pub mod client;
pub mod envelope;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use errors::{ApiError, ApiErrorKind, ApiResult};

/// Date layout the list endpoints parse `from`/`to` with.
pub const BACKEND_DATE_FORMAT: &str = "%m/%d/%Y";

/// Query parameters shared by the paginated list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ListQuery {
    pub limit: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl ListQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            limit,
            page: page.max(1),
            search: None,
            from: None,
            to: None,
        }
    }

    /// Adds a free-text search; blank input is dropped.
    pub fn search(mut self, term: impl AsRef<str>) -> Self {
        let term = term.as_ref().trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self
    }

    /// Sets the inclusive date range in the backend's month/day/year layout.
    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        let format = |date: NaiveDate| date.format(BACKEND_DATE_FORMAT).to_string();
        self.from = from.map(format);
        self.to = to.map(format);
        self
    }

    /// Renders `limit=..&page=..[&search=..][&from=..][&to=..]` with free text encoded.
    pub fn to_query_string(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_else(|err| {
            log::error!("Failed to encode list query: {err}");
            format!("limit={}&page={}", self.limit, self.page)
        })
    }
}

#[async_trait]
pub trait CustomerReader: Send + Sync {
    async fn list_customers(&self, query: &ListQuery) -> ApiResult<Page<Customer>>;
    async fn get_customer(&self, id: CustomerId) -> ApiResult<Customer>;
    async fn list_customer_loans(&self, id: CustomerId, query: &ListQuery)
    -> ApiResult<Page<Loan>>;
    async fn list_customer_payments(
        &self,
        id: CustomerId,
        query: &ListQuery,
    ) -> ApiResult<Page<Payment>>;
    async fn list_customer_sms(
        &self,
        id: CustomerId,
        query: &ListQuery,
    ) -> ApiResult<Page<SmsMessage>>;
    /// Unpaginated list used by customer pickers.
    async fn list_customer_options(&self) -> ApiResult<Vec<Customer>>;
}

#[async_trait]
pub trait CustomerWriter: Send + Sync {
    async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<()>;
    async fn update_customer(&self, updates: &UpdateCustomer) -> ApiResult<()>;
}

#[async_trait]
pub trait LoanReader: Send + Sync {
    async fn list_loans(&self, query: &ListQuery) -> ApiResult<Page<Loan>>;
}

#[async_trait]
pub trait LoanWriter: Send + Sync {
    async fn create_loan(&self, loan: &NewLoan) -> ApiResult<()>;
}

#[async_trait]
pub trait PaymentReader: Send + Sync {
    async fn list_payments(&self, query: &ListQuery) -> ApiResult<Page<Payment>>;
}

#[async_trait]
pub trait PaymentWriter: Send + Sync {
    async fn assign_payment(&self, payment_id: PaymentId, customer_id: CustomerId)
    -> ApiResult<()>;
}

#[async_trait]
pub trait SmsReader: Send + Sync {
    async fn list_sms(&self, query: &ListQuery) -> ApiResult<Page<SmsMessage>>;
}

#[async_trait]
pub trait SmsWriter: Send + Sync {
    async fn send_sms(&self, sms: &NewSms) -> ApiResult<()>;
}

#[async_trait]
pub trait DashboardReader: Send + Sync {
    async fn dashboard(&self) -> ApiResult<Dashboard>;
}
