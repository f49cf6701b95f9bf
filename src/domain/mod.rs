//! Client-side projections of the resources managed by the loan backend.

pub mod customer;
pub mod dashboard;
pub mod loan;
pub mod page;
pub mod payment;
pub mod sms;
pub mod types;
