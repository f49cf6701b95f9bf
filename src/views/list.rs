//! Headless list view: table state, debounced search, cached fetches and
//! stale-response protection for one resource.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::api::{ApiResult, ListQuery};
use crate::cache::{QueryCache, QueryKey, QueryObserver, QueryStatus};
use crate::domain::page::Page;
use crate::state::debounce::{Debouncer, SEARCH_DEBOUNCE};
use crate::state::table::{PaginationControls, TableState};

pub type ListFetcher<T> =
    Arc<dyn Fn(ListQuery) -> BoxFuture<'static, ApiResult<Page<T>>> + Send + Sync>;

/// What a list currently shows.
#[derive(Clone, Debug, Serialize)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub status: QueryStatus,
    pub controls: PaginationControls,
    /// `items` belong to the previous key while the current one loads.
    pub placeholder: bool,
}

struct View<T> {
    state: TableState,
    items: Vec<T>,
    status: QueryStatus,
    placeholder: bool,
}

pub struct ListController<T> {
    resource: String,
    cache: QueryCache,
    observer: QueryObserver,
    fetcher: ListFetcher<T>,
    view: Mutex<View<T>>,
    search: Debouncer<String>,
    search_task: JoinHandle<()>,
}

impl<T> ListController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Must be called inside a Tokio runtime.
    pub fn new(
        resource: &str,
        cache: QueryCache,
        state: TableState,
        fetcher: ListFetcher<T>,
    ) -> Arc<Self> {
        Self::with_search_delay(resource, cache, state, fetcher, SEARCH_DEBOUNCE)
    }

    pub fn with_search_delay(
        resource: &str,
        cache: QueryCache,
        mut state: TableState,
        fetcher: ListFetcher<T>,
        delay: Duration,
    ) -> Arc<Self> {
        state.enter(resource);
        let search = Debouncer::new(state.filter().to_string(), delay);
        let mut settled = search.subscribe();

        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let search_task = tokio::spawn(async move {
                while settled.changed().await.is_ok() {
                    let filter = settled.borrow_and_update().clone();
                    let Some(controller) = weak.upgrade() else {
                        break;
                    };
                    controller.apply_filter(&filter).await;
                }
            });

            Self {
                resource: resource.to_string(),
                cache,
                observer: QueryObserver::new(),
                fetcher,
                view: Mutex::new(View {
                    state,
                    items: Vec::new(),
                    status: QueryStatus::Idle,
                    placeholder: false,
                }),
                search,
                search_task,
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, View<T>> {
        self.view
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        let view = self.lock();
        ListSnapshot {
            items: view.items.clone(),
            status: view.status.clone(),
            controls: view.state.controls(),
            placeholder: view.placeholder,
        }
    }

    pub fn state(&self) -> TableState {
        self.lock().state.clone()
    }

    pub async fn set_page_index(&self, page_index: u32) {
        self.lock().state.set_page_index(page_index);
        self.refresh().await;
    }

    pub async fn set_page_size(&self, page_size: u32) {
        self.lock().state.set_page_size(page_size);
        self.refresh().await;
    }

    pub async fn set_date_range(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.lock().state.set_date_range(from, to);
        self.refresh().await;
    }

    pub async fn reset(&self) {
        self.lock().state.reset_table_state();
        self.refresh().await;
    }

    /// Queues search text; the list refetches once typing settles.
    pub fn search(&self, text: &str) {
        self.search.push(text.trim().to_string());
    }

    async fn apply_filter(&self, filter: &str) {
        self.lock().state.set_filter(filter);
        self.refresh().await;
    }

    /// Fetches the page described by the current state and shows it if no
    /// newer request was made in the meantime.
    pub async fn refresh(&self) {
        let query = {
            let mut view = self.lock();
            view.placeholder = !view.items.is_empty();
            view.status = QueryStatus::Loading;
            view.state.list_query()
        };
        let key = QueryKey::new(&self.resource).with_list(&query);
        let ticket = self.observer.observe(key.clone());

        let fetcher = Arc::clone(&self.fetcher);
        let result = self.cache.fetch(&key, move || fetcher(query)).await;

        if !self.observer.accept(&ticket) {
            log::debug!("Ignoring response for superseded key {key}");
            return;
        }

        let mut view = self.lock();
        view.placeholder = false;
        match result {
            Ok(page) => {
                view.state.update_table_context(&page.metadata);
                view.items = page.data.clone();
                view.status = QueryStatus::Ready;
            }
            Err(err) => {
                log::error!("Failed to load {}: {err}", self.resource);
                view.items.clear();
                view.status = QueryStatus::Failed(err.message);
            }
        }
    }
}

impl<T> Drop for ListController<T> {
    fn drop(&mut self) {
        self.search_task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use tokio::time::sleep;

    use crate::api::ApiError;
    use crate::domain::page::PageMetadata;

    fn page_of(query: &ListQuery) -> Page<String> {
        Page {
            data: vec![format!("page {}", query.page)],
            metadata: PageMetadata {
                page_size: query.limit,
                current_page: query.page,
                total_data: 50,
                total_pages: 5,
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_page_changes_show_only_last_page() {
        // Earlier pages answer later than newer ones.
        let fetcher: ListFetcher<String> = Arc::new(|query: ListQuery| {
            async move {
                let delay = 400 - u64::from(query.page) * 100;
                sleep(Duration::from_millis(delay)).await;
                Ok::<_, ApiError>(page_of(&query))
            }
            .boxed()
        });
        let list = ListController::new(
            "loans",
            QueryCache::default(),
            TableState::default(),
            fetcher,
        );

        tokio::join!(
            list.set_page_index(1),
            list.set_page_index(2),
            list.set_page_index(3)
        );

        let snapshot = list.snapshot();
        assert_eq!(snapshot.items, vec!["page 3".to_string()]);
        assert_eq!(snapshot.status, QueryStatus::Ready);
        assert_eq!(snapshot.controls.page, 3);
        assert!(snapshot.controls.previous_enabled);
        assert!(snapshot.controls.next_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn search_fetches_only_after_debounce() {
        let calls = Arc::new(AtomicUsize::new(0));
        let searches = Arc::new(Mutex::new(Vec::new()));
        let fetcher: ListFetcher<String> = {
            let calls = Arc::clone(&calls);
            let searches = Arc::clone(&searches);
            Arc::new(move |query: ListQuery| {
                calls.fetch_add(1, Ordering::SeqCst);
                searches.lock().unwrap().push(query.search.clone());
                async move { Ok::<_, ApiError>(page_of(&query)) }.boxed()
            })
        };
        let list = ListController::new(
            "customers",
            QueryCache::default(),
            TableState::default(),
            fetcher,
        );

        list.search("j");
        sleep(Duration::from_millis(300)).await;
        list.search("jan");
        sleep(Duration::from_millis(300)).await;
        list.search("jane");

        sleep(Duration::from_millis(499)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*searches.lock().unwrap(), vec![Some("jane".to_string())]);
        assert_eq!(list.state().filter(), "jane");
        assert_eq!(list.state().page_index(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_reported_not_empty() {
        let fetcher: ListFetcher<String> = Arc::new(|_query: ListQuery| {
            async { Err::<Page<String>, _>(ApiError::transport("Request failed with status 502")) }.boxed()
        });
        let list = ListController::new(
            "payments",
            QueryCache::default(),
            TableState::default(),
            fetcher,
        );

        list.refresh().await;

        let snapshot = list.snapshot();
        assert!(snapshot.items.is_empty());
        assert_eq!(
            snapshot.status,
            QueryStatus::Failed("Request failed with status 502".to_string())
        );
    }
}
