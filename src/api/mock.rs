//! Mock backend for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::api::errors::ApiResult;
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

mock! {
    pub Backend {}

    #[async_trait]
    impl CustomerReader for Backend {
        async fn list_customers(&self, query: &ListQuery) -> ApiResult<Page<Customer>>;
        async fn get_customer(&self, id: CustomerId) -> ApiResult<Customer>;
        async fn list_customer_loans(
            &self,
            id: CustomerId,
            query: &ListQuery,
        ) -> ApiResult<Page<Loan>>;
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
        async fn list_customer_options(&self) -> ApiResult<Vec<Customer>>;
    }

    #[async_trait]
    impl CustomerWriter for Backend {
        async fn create_customer(&self, customer: &NewCustomer) -> ApiResult<()>;
        async fn update_customer(&self, updates: &UpdateCustomer) -> ApiResult<()>;
    }

    #[async_trait]
    impl LoanReader for Backend {
        async fn list_loans(&self, query: &ListQuery) -> ApiResult<Page<Loan>>;
    }

    #[async_trait]
    impl LoanWriter for Backend {
        async fn create_loan(&self, loan: &NewLoan) -> ApiResult<()>;
    }

    #[async_trait]
    impl PaymentReader for Backend {
        async fn list_payments(&self, query: &ListQuery) -> ApiResult<Page<Payment>>;
    }

    #[async_trait]
    impl PaymentWriter for Backend {
        async fn assign_payment(
            &self,
            payment_id: PaymentId,
            customer_id: CustomerId,
        ) -> ApiResult<()>;
    }

    #[async_trait]
    impl SmsReader for Backend {
        async fn list_sms(&self, query: &ListQuery) -> ApiResult<Page<SmsMessage>>;
    }

    #[async_trait]
    impl SmsWriter for Backend {
        async fn send_sms(&self, sms: &NewSms) -> ApiResult<()>;
    }

    #[async_trait]
    impl DashboardReader for Backend {
        async fn dashboard(&self) -> ApiResult<Dashboard>;
    }
}
