use std::sync::Arc;

use crate::api::{CustomerReader, LoanReader, LoanWriter};
use crate::cache::{QueryCache, keys};
use crate::domain::loan::NewLoan;
use crate::dto::LoansPageData;
use crate::forms::loans::AddLoanForm;
use crate::services::customers::load_customer_options;
use crate::services::{ServiceResult, fetch_list, invalidate_all};
use crate::state::table::TableState;

/// Loads the loans list together with the customer picker of the add form.
pub async fn load_loans_page<R>(
    repo: &Arc<R>,
    cache: &QueryCache,
    state: &mut TableState,
) -> LoansPageData
where
    R: LoanReader + CustomerReader + ?Sized + 'static,
{
    let query = state.list_query();
    let key = keys::loan_list(&query);
    let loans_repo = Arc::clone(repo);

    let loans = fetch_list(cache, key, state, move || async move {
        loans_repo.list_loans(&query).await
    })
    .await;

    LoansPageData {
        loans,
        customers: load_customer_options(repo, cache).await,
        search: state.filter().to_string(),
    }
}

/// Validates the add-loan form and issues the loan.
pub async fn add_loan<R>(repo: &R, cache: &QueryCache, form: AddLoanForm) -> ServiceResult<()>
where
    R: LoanWriter + ?Sized,
{
    let new_loan = NewLoan::try_from(form)?;

    repo.create_loan(&new_loan).await.map_err(|err| {
        log::error!("Failed to add a loan: {err}");
        err
    })?;

    // The customer's loaned total changes with every loan.
    invalidate_all(cache, &[keys::loans(), keys::customers(), keys::dashboard()]);

    Ok(())
}
