use serde::Serialize;

use crate::state::table::{PAGE_SIZE_OPTIONS, TableState};

fn get_pages(
    total_pages: u32,
    current_page: u32,
    left_edge: u32,
    left_current: u32,
    right_current: u32,
    right_edge: u32,
) -> Vec<Option<u32>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let current_page = current_page.clamp(1, last_page);
    let mut pages = Vec::new();

    let left_end = left_edge
        .saturating_add(1)
        .min(last_page.saturating_add(1));
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = current_page
        .saturating_add(right_current)
        .saturating_add(1)
        .min(last_page.saturating_add(1));

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge).saturating_add(1));

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

/// One rendered page of a list table, or the error that replaced it.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<u32>>,
    pub page: u32,
    pub page_size: u32,
    pub page_sizes: [u32; 6],
    pub total_pages: u32,
    pub total_data: u32,
    pub previous_enabled: bool,
    pub next_enabled: bool,
    /// Set when the fetch failed; templates show it instead of "No results".
    pub error: Option<String>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, state: &TableState) -> Self {
        let controls = state.controls();
        let page = controls.page.max(1);

        Self {
            items,
            pages: get_pages(controls.total_pages, page, 2, 2, 4, 2),
            page,
            page_size: state.page_size(),
            page_sizes: PAGE_SIZE_OPTIONS,
            total_pages: controls.total_pages,
            total_data: state.total_data(),
            previous_enabled: controls.previous_enabled,
            next_enabled: controls.next_enabled,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, state: &TableState) -> Self {
        Self {
            previous_enabled: false,
            next_enabled: false,
            pages: vec![],
            error: Some(message.into()),
            ..Self::new(Vec::new(), state)
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            page_size: self.page_size,
            page_sizes: self.page_sizes,
            total_pages: self.total_pages,
            total_data: self.total_data,
            previous_enabled: self.previous_enabled,
            next_enabled: self.next_enabled,
            error: self.error,
        }
    }

    /// Drops items the view filters out locally; server totals are kept.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }
}
