//! HTTP implementation of the backend traits built on `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

use crate::api::envelope::{decode_failure, decode_success};
use crate::api::errors::{ApiError, ApiResult};
use crate::api::{
    CustomerReader, CustomerWriter, DashboardReader, ListQuery, LoanReader, LoanWriter,
    PaymentReader, PaymentWriter, SmsReader, SmsWriter,
};
use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::dashboard::Dashboard;
use crate::domain::loan::{Loan, NewLoan};
use crate::domain::page::Page;
use crate::domain::payment::Payment;
use crate::domain::sms::{NewSms, SmsMessage};
use crate::domain::types::{CustomerId, PaymentId};

/// Connection settings for [`ApiClient`].
#[derive(Clone, Debug)]
pub struct ApiClientConfig {
    /// Base URL including the API prefix, e.g. `http://localhost:8080/api/v1`.
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
}

impl ApiClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
        }
    }

    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }
}

/// Backend client shared by all page services.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        self.send::<IgnoredAny>(self.client.post(self.url(path)).json(body))
            .await
            .map(|_| ())
    }

    async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> ApiResult<()> {
        let mut request = self.client.patch(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send::<IgnoredAny>(request).await.map(|_| ())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let raw = response.bytes().await?;

        if !status.is_success() {
            let err = decode_failure(status, &raw);
            log::warn!("Backend request failed ({status}): {err}");
            return Err(err);
        }

        let body = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice::<Value>(&raw)?
        };

        decode_success(body).inspect_err(|err: &ApiError| {
            log::warn!("Backend reported a {} error: {err}", err.kind);
        })
    }
}

#[async_trait]
impl CustomerReader for ApiClient {
    async fn list_customers(&self, query: &ListQuery) -> ApiResult<Page<Customer>> {
        self.get(&format!("/customers?{}", query.to_query_string()))
            .await
    }

    async fn get_customer(&self, id: CustomerId) -> ApiResult<Customer> {
        #[derive(serde::Deserialize)]
        struct Single {
            data: Customer,
        }

        self.get::<Single>(&format!("/customer/half/{id}"))
            .await
            .map(|single| single.data)
    }

    async fn list_customer_loans(
        &self,
        id: CustomerId,
        query: &ListQuery,
    ) -> ApiResult<Page<Loan>> {
        self.get(&format!("/customer/loans/{id}?{}", query.to_query_string()))
            .await
    }

    async fn list_customer_payments(
        &self,
        id: CustomerId,
        query: &ListQuery,
    ) -> ApiResult<Page<Payment>> {
        self.get(&format!(
            "/customer/payments/{id}?{}",
            query.to_query_string()
        ))
        .await
    }

    async fn list_customer_sms(
        &self,
        id: CustomerId,
        query: &ListQuery,
    ) -> ApiResult<Page<SmsMessage>> {
        self.get(&format!("/customer/sms/{id}?{}", query.to_query_string()))
            .await
    }

    async fn list_customer_options(&self) -> ApiResult<Vec<Customer>> {
        self.get::<Page<Customer>>("/helper/customer")
            .await
            .map(|page| page.data)
    }
}

#[async_trait]
impl CustomerWriter for ApiClient {
    async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<()> {
        self.post("/customer", customer).await
    }

    async fn update_customer(&self, updates: &UpdateCustomer) -> ApiResult<()> {
        self.patch(&format!("/customer/{}", updates.id), Some(updates))
            .await
    }
}

#[async_trait]
impl LoanReader for ApiClient {
    async fn list_loans(&self, query: &ListQuery) -> ApiResult<Page<Loan>> {
        self.get(&format!("/loans?{}", query.to_query_string()))
            .await
    }
}

#[async_trait]
impl LoanWriter for ApiClient {
    async fn create_loan(&self, loan: &NewLoan) -> ApiResult<()> {
        self.post("/loan", loan).await
    }
}

#[async_trait]
impl PaymentReader for ApiClient {
    async fn list_payments(&self, query: &ListQuery) -> ApiResult<Page<Payment>> {
        self.get(&format!("/payments?{}", query.to_query_string()))
            .await
    }
}

#[async_trait]
impl PaymentWriter for ApiClient {
    async fn assign_payment(
        &self,
        payment_id: PaymentId,
        customer_id: CustomerId,
    ) -> ApiResult<()> {
        self.patch::<()>(
            &format!("/payment/{payment_id}?customerId={customer_id}"),
            None,
        )
        .await
    }
}

#[async_trait]
impl SmsReader for ApiClient {
    async fn list_sms(&self, query: &ListQuery) -> ApiResult<Page<SmsMessage>> {
        self.get(&format!("/sms?{}", query.to_query_string())).await
    }
}

#[async_trait]
impl SmsWriter for ApiClient {
    async fn send_sms(&self, sms: &NewSms) -> ApiResult<()> {
        self.post("/sms", sms).await
    }
}

#[async_trait]
impl DashboardReader for ApiClient {
    async fn dashboard(&self) -> ApiResult<Dashboard> {
        self.get("/dashboard/stats").await
    }
}
