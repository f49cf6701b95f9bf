use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::api::ListQuery;
use crate::domain::types::CustomerId;
use crate::state::table::TableState;

/// Identifies one cached fetch: resource name followed by its parameters.
///
/// Keys are compared segment by segment, so invalidating `["customers"]`
/// covers every customer list page, detail and sub-list.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: &str) -> Self {
        Self(vec![resource.to_string()])
    }

    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    /// Appends every parameter of a list query, in a fixed order.
    pub fn with_list(self, query: &ListQuery) -> Self {
        self.with(query.page)
            .with(query.limit)
            .with(query.search.as_deref().unwrap_or(""))
            .with(query.from.as_deref().unwrap_or(""))
            .with(query.to.as_deref().unwrap_or(""))
    }

    /// Key for the list page described by a table state.
    pub fn list(resource: &str, state: &TableState) -> Self {
        Self::new(resource).with_list(&state.list_query())
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Key prefixes for every resource the dashboard reads.
pub mod keys {
    use super::*;

    pub fn customers() -> QueryKey {
        QueryKey::new("customers")
    }

    pub fn customer_list(query: &ListQuery) -> QueryKey {
        customers().with("list").with_list(query)
    }

    pub fn customer_options() -> QueryKey {
        customers().with("options")
    }

    pub fn customer(id: CustomerId) -> QueryKey {
        customers().with(id)
    }

    pub fn customer_loans(id: CustomerId, query: &ListQuery) -> QueryKey {
        customer(id).with("loans").with_list(query)
    }

    pub fn customer_payments(id: CustomerId, query: &ListQuery) -> QueryKey {
        customer(id).with("payments").with_list(query)
    }

    pub fn customer_sms(id: CustomerId, query: &ListQuery) -> QueryKey {
        customer(id).with("sms").with_list(query)
    }

    pub fn loans() -> QueryKey {
        QueryKey::new("loans")
    }

    pub fn loan_list(query: &ListQuery) -> QueryKey {
        loans().with_list(query)
    }

    pub fn payments() -> QueryKey {
        QueryKey::new("payments")
    }

    pub fn payment_list(query: &ListQuery) -> QueryKey {
        payments().with_list(query)
    }

    pub fn sms() -> QueryKey {
        QueryKey::new("sms")
    }

    pub fn sms_list(query: &ListQuery) -> QueryKey {
        sms().with_list(query)
    }

    pub fn dashboard() -> QueryKey {
        QueryKey::new("dashboard")
    }
}
