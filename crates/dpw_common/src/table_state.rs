//! Table view state
//!
//! Page size, global search term, per-column filter text, and the column whose
//! filter was applied last. Only input handlers mutate it; a fresh value is
//! the reset.

use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Choices offered by the page-size changer
pub const PAGE_SIZE_OPTIONS: &[usize] = &[10, 20, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub page_size: usize,
    pub search_term: String,
    pub column_filters: BTreeMap<String, String>,
    pub active_filter_column: String,
    /// 1-based
    pub page: usize,
    pub sort: Option<SortState>,
}

impl Default for TableState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            search_term: String::new(),
            column_filters: BTreeMap::new(),
            active_filter_column: String::new(),
            page: 1,
            sort: None,
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Commit a column filter from its dropdown.
    pub fn on_column_search<F>(&mut self, selected_values: &[String], confirm: F, column: &str)
    where
        F: FnOnce(),
    {
        confirm();
        let value = selected_values.first().cloned().unwrap_or_default();
        self.column_filters.insert(column.to_string(), value);
        self.active_filter_column = column.to_string();
        self.page = 1;
    }

    /// Reset a column filter. The stored text is emptied whether or not a
    /// `clear` action is supplied.
    pub fn on_column_reset<F>(&mut self, clear: Option<F>, column: &str)
    where
        F: FnOnce(),
    {
        if let Some(clear) = clear {
            clear();
        }
        self.column_filters.insert(column.to_string(), String::new());
        self.active_filter_column.clear();
    }

    /// Search submitted (Enter)
    pub fn on_search(&mut self, value: &str) {
        self.set_search_term(value);
        self.page = 1;
    }

    /// Search input edited; every keystroke lands here
    pub fn on_search_change(&mut self, value: &str) {
        self.set_search_term(value);
        self.page = 1;
    }

    pub fn column_filter(&self, column: &str) -> &str {
        self.column_filters.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn is_column_filtered(&self, column: &str) -> bool {
        !self.column_filter(column).is_empty()
    }

    /// Cycle a column's sort: ascending, descending, off.
    pub fn toggle_sort(&mut self, column: &str) {
        self.sort = match &self.sort {
            Some(s) if s.column == column => match s.order {
                SortOrder::Ascend => Some(SortState {
                    column: column.to_string(),
                    order: SortOrder::Descend,
                }),
                SortOrder::Descend => None,
            },
            _ => Some(SortState {
                column: column.to_string(),
                order: SortOrder::Ascend,
            }),
        };
    }

    /// Step to the next entry of [`PAGE_SIZE_OPTIONS`], wrapping around.
    pub fn cycle_page_size(&mut self) {
        let next = PAGE_SIZE_OPTIONS
            .iter()
            .copied()
            .find(|size| *size > self.page_size)
            .unwrap_or(PAGE_SIZE_OPTIONS[0]);
        self.set_page_size(next);
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&mut self, total: usize) {
        self.page = (self.page + 1).min(self.page_count(total));
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Half-open index range of the current page within `total` rows
    pub fn page_bounds(&self, total: usize) -> (usize, usize) {
        let page = self.page.clamp(1, self.page_count(total));
        let start = ((page - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        (start, end)
    }

    /// "Showing 11-20 of 42 assignments"
    pub fn showing_label(&self, total: usize, noun: &str) -> String {
        let (start, end) = self.page_bounds(total);
        if total == 0 {
            format!("Showing 0 of 0 {}", noun)
        } else {
            format!("Showing {}-{} of {} {}", start + 1, end, total, noun)
        }
    }
}
