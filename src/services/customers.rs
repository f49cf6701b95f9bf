//! Customer list, detail and edit workflows.

use std::sync::Arc;

use crate::api::{CustomerReader, CustomerWriter};
use crate::cache::{QueryCache, keys};
use crate::domain::customer::{Customer, NewCustomer, UpdateCustomer};
use crate::domain::types::CustomerId;
use crate::dto::{CustomerPageData, CustomerRow, CustomersPageData, PaymentRow};
use crate::forms::customers::{AddCustomerForm, EditCustomerForm};
use crate::forms::query::CustomerTab;
use crate::services::{ServiceResult, fetch_list, invalidate_all};
use crate::state::table::TableState;

/// Loads the customers list for the current table state.
pub async fn load_customers_page<R>(
    repo: &Arc<R>,
    cache: &QueryCache,
    state: &mut TableState,
) -> CustomersPageData
where
    R: CustomerReader + ?Sized + 'static,
{
    let query = state.list_query();
    let key = keys::customer_list(&query);
    let repo = Arc::clone(repo);

    let customers = fetch_list(cache, key, state, move || async move {
        repo.list_customers(&query).await
    })
    .await
    .map(CustomerRow::from);

    CustomersPageData {
        customers,
        search: state.filter().to_string(),
    }
}

/// Loads one customer and the paginated sub-list of the selected tab.
pub async fn load_customer_page<R>(
    repo: &Arc<R>,
    cache: &QueryCache,
    customer_id: u32,
    tab: CustomerTab,
    state: &mut TableState,
) -> ServiceResult<CustomerPageData>
where
    R: CustomerReader + ?Sized + 'static,
{
    let customer_id = CustomerId::new(customer_id)?;

    let customer = {
        let repo = Arc::clone(repo);
        cache
            .fetch(&keys::customer(customer_id), move || async move {
                repo.get_customer(customer_id).await
            })
            .await
            .inspect_err(|err| log::error!("Failed to get customer {customer_id}: {err}"))?
    };

    let query = state.list_query();
    let repo = Arc::clone(repo);
    let mut data = CustomerPageData {
        customer: CustomerRow::from(Customer::clone(&customer)),
        tab,
        loans: None,
        payments: None,
        sms: None,
    };

    match tab {
        CustomerTab::Loans => {
            let key = keys::customer_loans(customer_id, &query);
            data.loans = Some(
                fetch_list(cache, key, state, move || async move {
                    repo.list_customer_loans(customer_id, &query).await
                })
                .await,
            );
        }
        CustomerTab::Payments => {
            let key = keys::customer_payments(customer_id, &query);
            data.payments = Some(
                fetch_list(cache, key, state, move || async move {
                    repo.list_customer_payments(customer_id, &query).await
                })
                .await
                .map(PaymentRow::from),
            );
        }
        CustomerTab::Sms => {
            let key = keys::customer_sms(customer_id, &query);
            data.sms = Some(
                fetch_list(cache, key, state, move || async move {
                    repo.list_customer_sms(customer_id, &query).await
                })
                .await,
            );
        }
    }

    Ok(data)
}

/// Unpaginated customers offered by the loan, payment and SMS pickers.
/// A failed load leaves the picker empty.
pub async fn load_customer_options<R>(repo: &Arc<R>, cache: &QueryCache) -> Vec<CustomerRow>
where
    R: CustomerReader + ?Sized + 'static,
{
    let repo = Arc::clone(repo);
    match cache
        .fetch(&keys::customer_options(), move || async move {
            repo.list_customer_options().await
        })
        .await
    {
        Ok(customers) => customers.iter().cloned().map(CustomerRow::from).collect(),
        Err(err) => {
            log::error!("Failed to load customer options: {err}");
            Vec::new()
        }
    }
}

/// Validates the add-customer form and creates the customer.
pub async fn add_customer<R>(
    repo: &R,
    cache: &QueryCache,
    form: AddCustomerForm,
) -> ServiceResult<()>
where
    R: CustomerWriter + ?Sized,
{
    let new_customer = NewCustomer::try_from(form)?;

    repo.create_customer(&new_customer).await.map_err(|err| {
        log::error!("Failed to add a customer: {err}");
        err
    })?;

    invalidate_all(cache, &[keys::customers(), keys::dashboard()]);

    Ok(())
}

/// Validates the edit form and applies it. Returns the edited id.
pub async fn update_customer<R>(
    repo: &R,
    cache: &QueryCache,
    form: EditCustomerForm,
) -> ServiceResult<CustomerId>
where
    R: CustomerWriter + ?Sized,
{
    let updates = UpdateCustomer::try_from(form)?;

    repo.update_customer(&updates).await.map_err(|err| {
        log::error!("Failed to update customer {}: {err}", updates.id);
        err
    })?;

    invalidate_all(cache, &[keys::customers(), keys::dashboard()]);

    Ok(updates.id)
}
