//! Query-string parameters accepted by the list pages.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::payment::AssignedFilter;
use crate::forms::FormError;
use crate::state::table::TableState;

/// Layout produced by `<input type="date">`.
const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a submitted date; a blank value clears it.
fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, FormError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, INPUT_DATE_FORMAT)
            .map(Some)
            .map_err(|_| FormError::InvalidDate),
        None => Ok(None),
    }
}

/// Pagination and filter parameters shared by every list page.
#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Any value clears the stored pagination and filters.
    pub reset: Option<String>,
}

impl TableQuery {
    /// Applies the submitted parameters on top of the stored table state.
    ///
    /// Page size, filter and date range are applied before the page index
    /// so a change that returns to the first page cannot be undone by a
    /// stale `page` value in the same request. Malformed dates are rejected
    /// before the state is touched.
    pub fn apply(&self, state: &mut TableState) -> Result<(), FormError> {
        let dates = if self.from.is_some() || self.to.is_some() {
            Some((
                parse_date(self.from.as_deref())?,
                parse_date(self.to.as_deref())?,
            ))
        } else {
            None
        };
        if self.reset.is_some() {
            state.reset_table_state();
        }
        if let Some(size) = self.page_size.filter(|size| *size != state.page_size()) {
            state.set_page_size(size);
        }
        if let Some(search) = &self.search {
            state.set_filter(search);
        }
        if let Some((from, to)) = dates {
            state.set_date_range(from, to);
        }
        if let Some(page) = self.page {
            state.set_page_index(page);
        }
        Ok(())
    }
}

/// Filters the payments page applies to the fetched page only.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentFilterQuery {
    /// Transaction source such as `MPESA` or `INTERNAL`.
    pub source: Option<String>,
    #[serde(default)]
    pub assigned: AssignedFilter,
}

impl PaymentFilterQuery {
    pub fn source(&self) -> Option<&str> {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|source| !source.is_empty())
    }
}

/// Selected sub-list on the customer page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerTab {
    #[default]
    Loans,
    Payments,
    Sms,
}

impl CustomerTab {
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerTab::Loans => "loans",
            CustomerTab::Payments => "payments",
            CustomerTab::Sms => "sms",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerTabQuery {
    #[serde(default)]
    pub tab: CustomerTab,
}

/// `?customer=` on the SMS form pre-selects a recipient.
#[derive(Debug, Default, Deserialize)]
pub struct NewSmsQuery {
    pub customer: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> TableQuery {
        serde_urlencoded::from_str(raw).unwrap()
    }

    #[test]
    fn page_is_applied_after_filters() {
        let mut state = TableState::default();
        state.set_page_index(4);

        query("search=otieno&page=2").apply(&mut state).unwrap();
        assert_eq!(state.filter(), "otieno");
        assert_eq!(state.page_index(), 2);

        query("page_size=20").apply(&mut state).unwrap();
        assert_eq!(state.page_size(), 20);
        assert_eq!(state.page_index(), 1);
    }

    #[test]
    fn same_page_size_keeps_page() {
        let mut state = TableState::default();
        state.set_page_index(3);

        query("page_size=10").apply(&mut state).unwrap();
        assert_eq!(state.page_index(), 3);
    }

    #[test]
    fn empty_dates_clear_range() {
        let mut state = TableState::default();
        query("from=2024-01-01&to=2024-01-31").apply(&mut state).unwrap();
        assert_eq!(state.from_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(state.to_date(), NaiveDate::from_ymd_opt(2024, 1, 31));

        query("from=&to=").apply(&mut state).unwrap();
        assert_eq!(state.from_date(), None);
        assert_eq!(state.to_date(), None);
    }

    #[test]
    fn malformed_dates_are_rejected_without_changes() {
        let mut state = TableState::default();
        query("from=2024-01-01&page=3").apply(&mut state).unwrap();

        for raw in ["from=01/02/2024", "to=2024-13-01", "from=yesterday&page=1"] {
            let result = query(raw).apply(&mut state);
            assert!(matches!(result, Err(FormError::InvalidDate)), "{raw}");
            assert_eq!(state.from_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
            assert_eq!(state.page_index(), 3);
        }
    }

    #[test]
    fn reset_clears_previous_state() {
        let mut state = TableState::default();
        query("search=jane&page=3&page_size=50").apply(&mut state).unwrap();

        query("reset=1").apply(&mut state).unwrap();
        assert_eq!(state.filter(), "");
        assert_eq!(state.page_index(), 1);
        assert_eq!(state.page_size(), 10);
    }

    #[test]
    fn payment_filters_decode() {
        let filters: PaymentFilterQuery =
            serde_urlencoded::from_str("source=MPESA&assigned=unassigned").unwrap();
        assert_eq!(filters.source(), Some("MPESA"));
        assert_eq!(filters.assigned, AssignedFilter::Unassigned);

        let filters: PaymentFilterQuery = serde_urlencoded::from_str("source=").unwrap();
        assert_eq!(filters.source(), None);
        assert_eq!(filters.assigned, AssignedFilter::All);
    }
}
