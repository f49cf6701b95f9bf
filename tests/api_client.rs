use jonche_dashboard::api::client::{ApiClient, ApiClientConfig};
use chrono::NaiveDate;
use jonche_dashboard::api::{
    ApiErrorKind, CustomerReader, CustomerWriter, ListQuery, LoanReader, LoanWriter,
    PaymentReader, PaymentWriter, SmsWriter,
};
use jonche_dashboard::domain::customer::UpdateCustomer;
use jonche_dashboard::domain::loan::NewLoan;
use jonche_dashboard::domain::sms::NewSms;
use jonche_dashboard::domain::types::{CustomerId, PaymentId};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiClientConfig::new(&format!("{}/api/v1", server.uri()))).unwrap()
}

#[tokio::test]
async fn lists_customers_with_encoded_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customers"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("search", "mary w"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 7, "name": "Mary Wanjiru", "phone_number": "0712345678", "status": true, "loaned": 2500.0}
            ],
            "metadata": {"page_size": 10, "current_page": 2, "total_data": 11, "total_pages": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .list_customers(&ListQuery::new(2, 10).search("mary w"))
        .await
        .unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].display_code(), "CST007");
    assert_eq!(page.metadata.total_pages, 2);
}

#[tokio::test]
async fn message_on_success_status_is_an_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/loans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "message": "Database unavailable",
            "data": null
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_loans(&ListQuery::new(1, 10))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Application);
    assert_eq!(err.message, "Database unavailable");
}

#[tokio::test]
async fn failed_status_without_message_reports_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customer/half/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_customer(CustomerId::new(3).unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Transport);
    assert!(err.message.contains("500"), "{}", err.message);
}

#[tokio::test]
async fn failed_status_prefers_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/customer/half/3"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Customer not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_customer(CustomerId::new(3).unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.message, "Customer not found");
}

#[tokio::test]
async fn assign_payment_patches_with_customer_query() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/payment/8"))
        .and(query_param("customerId", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .assign_payment(PaymentId::new(8).unwrap(), CustomerId::new(5).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn send_sms_posts_all_recipients_at_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sms"))
        .and(body_json(json!({
            "message": "Your loan is due tomorrow",
            "customer_ids": [1, 2]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let sms = NewSms {
        message: "Your loan is due tomorrow".to_string(),
        customer_ids: vec![CustomerId::new(1).unwrap(), CustomerId::new(2).unwrap()],
    };

    client_for(&server).send_sms(&sms).await.unwrap();
}

#[tokio::test]
async fn update_customer_sends_status_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/customer/3"))
        .and(body_json(json!({
            "id": 3,
            "name": "Jane",
            "phone_number": "0712345678",
            "status": "true"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .expect(1)
        .mount(&server)
        .await;

    let updates = UpdateCustomer {
        id: CustomerId::new(3).unwrap(),
        name: "Jane".to_string(),
        phone_number: "0712345678".to_string(),
        status: true,
    };

    client_for(&server).update_customer(&updates).await.unwrap();
}

#[tokio::test]
async fn create_loan_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/loan"))
        .and(body_json(json!({
            "customer_id": 5,
            "amount": 2500.5,
            "description": "Boda boda repairs"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let loan = NewLoan {
        customer_id: CustomerId::new(5).unwrap(),
        amount: 2500.5,
        description: "Boda boda repairs".to_string(),
    };

    client_for(&server).create_loan(&loan).await.unwrap();
}

#[tokio::test]
async fn payment_dates_use_month_day_year() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/payments"))
        .and(query_param("from", "01/01/2024"))
        .and(query_param("to", "02/29/2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "metadata": {"page_size": 10, "current_page": 1, "total_data": 0, "total_pages": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::new(1, 10).date_range(
        NaiveDate::from_ymd_opt(2024, 1, 1),
        NaiveDate::from_ymd_opt(2024, 2, 29),
    );
    let page = client_for(&server).list_payments(&query).await.unwrap();

    assert!(page.data.is_empty());
}
