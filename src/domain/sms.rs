use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::types::{CustomerId, SmsId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsType {
    #[serde(alias = "AUTOMATED")]
    Automated,
    #[serde(alias = "MANUAL")]
    Manual,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsStatus {
    #[serde(alias = "DELIVERED")]
    Delivered,
    #[serde(alias = "UNDELIVERED")]
    Undelivered,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SmsMessage {
    pub id: SmsId,
    pub customer_id: CustomerId,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: SmsType,
    pub status: SmsStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub customer_details: Option<Customer>,
}

/// Payload for `POST /sms`; the backend fans the message out to every id.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct NewSms {
    pub message: String,
    pub customer_ids: Vec<CustomerId>,
}
