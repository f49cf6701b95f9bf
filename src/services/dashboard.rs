use std::sync::Arc;

use crate::api::{DashboardReader, ListQuery, LoanReader, PaymentReader};
use crate::cache::{QueryCache, keys};
use crate::dto::{DashboardPageData, PaymentRow};
use crate::services::fetch_list;
use crate::state::table::TableState;

const RECENT_PAYMENTS: u32 = 4;
const RECENT_LOANS: u32 = 6;

/// Loads the stats cards, the overview series and the two recent-activity
/// feeds. Each section fails on its own.
pub async fn load_dashboard<R>(repo: &Arc<R>, cache: &QueryCache) -> DashboardPageData
where
    R: DashboardReader + PaymentReader + LoanReader + ?Sized + 'static,
{
    let stats_repo = Arc::clone(repo);
    let (stats, overview, stats_error) = match cache
        .fetch(&keys::dashboard(), move || async move {
            stats_repo.dashboard().await
        })
        .await
    {
        Ok(dashboard) => (
            Some(dashboard.stats.clone()),
            dashboard.overview.clone(),
            None,
        ),
        Err(err) => {
            log::error!("Failed to load dashboard stats: {err}");
            (None, Vec::new(), Some(err.message))
        }
    };

    let payments_query = ListQuery::new(1, RECENT_PAYMENTS);
    let payments_repo = Arc::clone(repo);
    let recent_payments = fetch_list(
        cache,
        keys::payment_list(&payments_query),
        &mut TableState::new(RECENT_PAYMENTS),
        move || async move { payments_repo.list_payments(&payments_query).await },
    )
    .await
    .map(PaymentRow::from);

    let loans_query = ListQuery::new(1, RECENT_LOANS);
    let loans_repo = Arc::clone(repo);
    let recent_loans = fetch_list(
        cache,
        keys::loan_list(&loans_query),
        &mut TableState::new(RECENT_LOANS),
        move || async move { loans_repo.list_loans(&loans_query).await },
    )
    .await;

    DashboardPageData {
        stats,
        overview,
        stats_error,
        recent_payments,
        recent_loans,
    }
}
