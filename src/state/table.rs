//! Pagination and filter state shared by the list views of one session.
//!
//! A [`TableState`] is scoped to the active resource tab: entering a
//! different scope resets it so pagination from one list never leaks into
//! another.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::ListQuery;
use crate::domain::page::PageMetadata;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes offered by the "Rows per page" selector.
pub const PAGE_SIZE_OPTIONS: [u32; 6] = [2, 10, 20, 30, 40, 50];

/// State of the Previous/Next buttons derived from server metadata.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct PaginationControls {
    pub page: u32,
    pub total_pages: u32,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableState {
    scope: String,
    default_page_size: u32,
    page_index: u32,
    page_size: u32,
    filter: String,
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
    current_page: u32,
    total_pages: u32,
    total_data: u32,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn new(default_page_size: u32) -> Self {
        let default_page_size = default_page_size.max(1);
        Self {
            scope: String::new(),
            default_page_size,
            page_index: 1,
            page_size: default_page_size,
            filter: String::new(),
            from_date: None,
            to_date: None,
            current_page: 0,
            total_pages: 0,
            total_data: 0,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn from_date(&self) -> Option<NaiveDate> {
        self.from_date
    }

    pub fn to_date(&self) -> Option<NaiveDate> {
        self.to_date
    }

    pub fn total_data(&self) -> u32 {
        self.total_data
    }

    /// Switches to `scope`, resetting the state when it differs from the
    /// current one. Returns `true` when a reset happened.
    pub fn enter(&mut self, scope: &str) -> bool {
        if self.scope == scope {
            return false;
        }
        self.reset_table_state();
        self.scope = scope.to_string();
        true
    }

    pub fn set_page_index(&mut self, page_index: u32) {
        self.page_index = page_index.max(1);
    }

    /// Changing the page size always returns to the first page.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page_index = 1;
    }

    /// Replaces the free-text filter; a different filter starts at page 1.
    pub fn set_filter(&mut self, filter: &str) {
        let filter = filter.trim();
        if self.filter != filter {
            self.filter = filter.to_string();
            self.page_index = 1;
        }
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        if self.from_date != from || self.to_date != to {
            self.from_date = from;
            self.to_date = to;
            self.page_index = 1;
        }
    }

    /// Mirrors the server's view of the pagination after a successful fetch.
    /// Page numbers past the last page are clamped to it.
    pub fn update_table_context(&mut self, metadata: &PageMetadata) {
        self.total_pages = metadata.total_pages;
        self.total_data = metadata.total_data;
        self.current_page = metadata.current_page;
        if self.total_pages > 0 {
            self.current_page = self.current_page.min(self.total_pages);
            self.page_index = self.page_index.min(self.total_pages);
        }
    }

    /// Restores defaults. The scope is kept.
    pub fn reset_table_state(&mut self) {
        self.page_index = 1;
        self.page_size = self.default_page_size;
        self.filter.clear();
        self.from_date = None;
        self.to_date = None;
        self.current_page = 0;
        self.total_pages = 0;
        self.total_data = 0;
    }

    pub fn controls(&self) -> PaginationControls {
        let page = if self.current_page == 0 {
            self.page_index
        } else {
            self.current_page
        };

        PaginationControls {
            page,
            total_pages: self.total_pages,
            previous_enabled: page > 1,
            next_enabled: page < self.total_pages,
        }
    }

    /// Query for the list endpoint described by this state.
    pub fn list_query(&self) -> ListQuery {
        ListQuery::new(self.page_index, self.page_size)
            .search(&self.filter)
            .date_range(self.from_date(), self.to_date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(current_page: u32, total_pages: u32) -> PageMetadata {
        PageMetadata {
            page_size: 10,
            current_page,
            total_data: total_pages * 10,
            total_pages,
        }
    }

    #[test]
    fn page_size_change_resets_page_index() {
        let mut state = TableState::default();
        for size in PAGE_SIZE_OPTIONS {
            state.set_page_index(4);
            state.set_page_size(size);
            assert_eq!(state.page_index(), 1);
            assert_eq!(state.page_size(), size);
        }
    }

    #[test]
    fn middle_page_enables_both_buttons() {
        let mut state = TableState::default();
        state.update_table_context(&metadata(2, 5));

        let controls = state.controls();
        assert!(controls.previous_enabled);
        assert!(controls.next_enabled);
        assert_eq!(controls.page, 2);
    }

    #[test]
    fn pages_past_the_end_are_clamped() {
        let mut state = TableState::default();
        state.set_page_index(9);

        state.update_table_context(&metadata(9, 3));
        assert_eq!(state.page_index(), 3);
        assert_eq!(state.controls().page, 3);
        assert!(!state.controls().next_enabled);

        state.set_page_index(7);
        state.update_table_context(&metadata(0, 0));
        assert_eq!(state.page_index(), 7);
    }

    #[test]
    fn edges_disable_buttons() {
        let mut state = TableState::default();

        state.update_table_context(&metadata(5, 5));
        assert!(!state.controls().next_enabled);
        assert!(state.controls().previous_enabled);

        state.update_table_context(&metadata(1, 5));
        assert!(!state.controls().previous_enabled);
        assert!(state.controls().next_enabled);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = TableState::new(20);
        state.set_page_size(50);
        state.set_page_index(7);
        state.set_filter("otieno");
        state.set_date_range(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 2, 1),
        );
        state.update_table_context(&metadata(7, 9));

        state.reset_table_state();

        assert_eq!(state, {
            let mut fresh = TableState::new(20);
            fresh.scope = state.scope.clone();
            fresh
        });
        assert_eq!(state.page_index(), 1);
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.filter(), "");
        assert_eq!(state.from_date(), None);
    }

    #[test]
    fn entering_another_scope_resets() {
        let mut state = TableState::default();
        assert!(state.enter("customers"));
        state.set_page_index(3);

        assert!(!state.enter("customers"));
        assert_eq!(state.page_index(), 3);

        assert!(state.enter("loans"));
        assert_eq!(state.page_index(), 1);
        assert_eq!(state.scope(), "loans");
    }

    #[test]
    fn new_filter_starts_from_first_page() {
        let mut state = TableState::default();
        state.set_page_index(3);
        state.set_filter("  ");
        assert_eq!(state.page_index(), 3);

        state.set_filter("wanjiku");
        assert_eq!(state.page_index(), 1);
        assert_eq!(
            state.list_query().to_query_string(),
            "limit=10&page=1&search=wanjiku"
        );
    }
}
