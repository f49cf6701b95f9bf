use serde::{Deserialize, Serialize};

/// Aggregate counters shown on the dashboard cards.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardStats {
    pub total_customers: u64,
    pub active_customers: u64,
    pub inactive_customers: u64,
    pub total_loans: u64,
    pub total_disbursed: f64,
    pub total_payments_received: f64,
    pub assigned_total: f64,
    pub unassigned_total: f64,
    pub total_sms: u64,
    pub sms_delivered: u64,
    pub sms_undelivered: u64,
}

/// One bucket of the loans vs. payments time series.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OverviewPoint {
    pub name: String,
    #[serde(default)]
    pub loans: f64,
    #[serde(default)]
    pub payments: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    #[serde(default)]
    pub stats: DashboardStats,
    #[serde(default, deserialize_with = "crate::domain::types::null_as_empty")]
    pub overview: Vec<OverviewPoint>,
}
