use std::sync::Arc;

use crate::api::{CustomerReader, SmsReader, SmsWriter};
use crate::cache::{QueryCache, keys};
use crate::domain::sms::NewSms;
use crate::dto::{NewSmsPageData, SmsPageData};
use crate::forms::query::NewSmsQuery;
use crate::forms::sms::SendSmsForm;
use crate::services::customers::load_customer_options;
use crate::services::{ServiceResult, fetch_list, invalidate_all};
use crate::state::table::TableState;

pub async fn load_sms_page<R>(
    repo: &Arc<R>,
    cache: &QueryCache,
    state: &mut TableState,
) -> SmsPageData
where
    R: SmsReader + ?Sized + 'static,
{
    let query = state.list_query();
    let key = keys::sms_list(&query);
    let repo = Arc::clone(repo);

    let messages = fetch_list(cache, key, state, move || async move {
        repo.list_sms(&query).await
    })
    .await;

    SmsPageData {
        messages,
        search: state.filter().to_string(),
    }
}

/// Loads the recipients for the send form, pre-selecting `?customer=`.
pub async fn load_new_sms_page<R>(
    repo: &Arc<R>,
    cache: &QueryCache,
    query: &NewSmsQuery,
) -> NewSmsPageData
where
    R: CustomerReader + ?Sized + 'static,
{
    let customers = load_customer_options(repo, cache).await;
    let selected = query
        .customer
        .filter(|id| customers.iter().any(|row| row.customer.id.get() == *id))
        .into_iter()
        .collect();

    NewSmsPageData {
        customers,
        selected,
    }
}

/// Validates the form and sends the message to every selected customer.
pub async fn send_sms<R>(repo: &R, cache: &QueryCache, form: SendSmsForm) -> ServiceResult<usize>
where
    R: SmsWriter + ?Sized,
{
    let sms = NewSms::try_from(form)?;

    repo.send_sms(&sms).await.map_err(|err| {
        log::error!("Failed to send SMS: {err}");
        err
    })?;

    invalidate_all(cache, &[keys::sms(), keys::customers(), keys::dashboard()]);

    Ok(sms.customer_ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockBackend;
    use crate::domain::customer::Customer;
    use crate::domain::types::CustomerId;
    use crate::forms::FormError;
    use crate::services::ServiceError;

    #[tokio::test]
    async fn zero_recipients_make_no_network_call() {
        let mut repo = MockBackend::new();
        repo.expect_send_sms().times(0);

        let form = SendSmsForm {
            message: "Your loan is due tomorrow".to_string(),
            customer_ids: vec![],
        };
        let result = send_sms(&repo, &QueryCache::default(), form).await;

        assert!(matches!(
            result,
            Err(ServiceError::Form(FormError::NoRecipients))
        ));
    }

    #[tokio::test]
    async fn message_fans_out_to_all_recipients() {
        let mut repo = MockBackend::new();
        repo.expect_send_sms()
            .withf(|sms: &NewSms| sms.customer_ids.len() == 2)
            .times(1)
            .returning(|_| Ok(()));

        let form = SendSmsForm {
            message: "Your loan is due tomorrow".to_string(),
            customer_ids: vec![3, 1],
        };

        assert_eq!(send_sms(&repo, &QueryCache::default(), form).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unknown_preselected_customer_is_ignored() {
        let mut repo = MockBackend::new();
        repo.expect_list_customer_options().returning(|| {
            Ok(vec![Customer {
                id: CustomerId::new(2).unwrap(),
                name: "Jane".to_string(),
                phone_number: "0712345678".to_string(),
                status: true,
                loaned: 0.0,
                created_at: None,
            }])
        });
        let repo = Arc::new(repo);
        let cache = QueryCache::default();

        let known = load_new_sms_page(&repo, &cache, &NewSmsQuery { customer: Some(2) }).await;
        assert_eq!(known.selected, vec![2]);

        let unknown = load_new_sms_page(&repo, &cache, &NewSmsQuery { customer: Some(9) }).await;
        assert!(unknown.selected.is_empty());
    }
}
