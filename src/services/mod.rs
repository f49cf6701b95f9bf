//! Page services: validate input, read through the query cache, write
//! through the backend and invalidate what a write made stale.

use std::future::Future;

use thiserror::Error;

use crate::api::{ApiError, ApiResult};
use crate::cache::{QueryCache, QueryKey};
use crate::domain::page::Page;
use crate::domain::types::TypeConstraintError;
use crate::forms::FormError;
use crate::pagination::Paginated;
use crate::state::table::TableState;

pub mod customers;
pub mod dashboard;
pub mod loans;
pub mod payments;
pub mod sms;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("not found")]
    NotFound,
}

impl From<TypeConstraintError> for ServiceError {
    fn from(_: TypeConstraintError) -> Self {
        ServiceError::NotFound
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Reads one list page through the cache and records the server's
/// pagination in `state`. A failed fetch becomes an error page.
pub(crate) async fn fetch_list<T, F, Fut>(
    cache: &QueryCache,
    key: QueryKey,
    state: &mut TableState,
    fetcher: F,
) -> Paginated<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = ApiResult<Page<T>>> + Send + 'static,
{
    match cache.fetch(&key, fetcher).await {
        Ok(page) => {
            state.update_table_context(&page.metadata);
            Paginated::new(page.data.clone(), state)
        }
        Err(err) => {
            log::error!("Failed to load {key}: {err}");
            Paginated::failed(err.message, state)
        }
    }
}

/// Marks the given resources stale after a successful write.
pub(crate) fn invalidate_all(cache: &QueryCache, prefixes: &[QueryKey]) {
    for prefix in prefixes {
        cache.invalidate(prefix);
    }
}
