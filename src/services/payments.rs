use std::sync::Arc;

use crate::api::{CustomerReader, PaymentReader, PaymentWriter};
use crate::cache::{QueryCache, keys};
use crate::domain::types::{CustomerId, PaymentId};
use crate::dto::{PaymentRow, PaymentsPageData};
use crate::forms::FormError;
use crate::forms::payments::AssignPaymentForm;
use crate::forms::query::PaymentFilterQuery;
use crate::services::customers::load_customer_options;
use crate::services::{ServiceResult, fetch_list, invalidate_all};
use crate::state::table::TableState;

/// Sources offered by the source filter even when absent from the page.
pub const PAYMENT_SOURCES: [&str; 2] = ["MPESA", "INTERNAL"];

/// Loads the payments page. Search and dates go to the backend; the source
/// and assigned filters narrow the fetched page locally.
pub async fn load_payments_page<R>(
    repo: &Arc<R>,
    cache: &QueryCache,
    state: &mut TableState,
    filters: &PaymentFilterQuery,
) -> PaymentsPageData
where
    R: PaymentReader + CustomerReader + ?Sized + 'static,
{
    let query = state.list_query();
    let key = keys::payment_list(&query);
    let payments_repo = Arc::clone(repo);

    let mut payments = fetch_list(cache, key, state, move || async move {
        payments_repo.list_payments(&query).await
    })
    .await;

    let mut sources = PAYMENT_SOURCES
        .iter()
        .map(|source| source.to_string())
        .collect::<Vec<_>>();
    for payment in &payments.items {
        let source = payment.transaction_source.to_uppercase();
        if !source.is_empty() && !sources.contains(&source) {
            sources.push(source);
        }
    }

    let source = filters.source().map(str::to_string);
    let assigned = filters.assigned;
    payments.retain(|payment| {
        source
            .as_deref()
            .is_none_or(|source| payment.transaction_source.eq_ignore_ascii_case(source))
            && assigned.matches(payment)
    });

    PaymentsPageData {
        payments: payments.map(PaymentRow::from),
        customers: load_customer_options(repo, cache).await,
        search: state.filter().to_string(),
        from: state.from_date().map(|date| date.to_string()),
        to: state.to_date().map(|date| date.to_string()),
        source,
        assigned,
        sources,
    }
}

/// Links an unassigned payment to the selected customer.
pub async fn assign_payment<R>(
    repo: &R,
    cache: &QueryCache,
    payment_id: u32,
    form: AssignPaymentForm,
) -> ServiceResult<()>
where
    R: PaymentWriter + ?Sized,
{
    let payment_id = PaymentId::new(payment_id).map_err(|_| FormError::InvalidId)?;
    let customer_id = CustomerId::try_from(form)?;

    repo.assign_payment(payment_id, customer_id)
        .await
        .map_err(|err| {
            log::error!("Failed to assign payment {payment_id} to customer {customer_id}: {err}");
            err
        })?;

    invalidate_all(
        cache,
        &[keys::payments(), keys::customers(), keys::dashboard()],
    );

    Ok(())
}
