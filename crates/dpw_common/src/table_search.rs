//! Generic table search
//!
//! Case-insensitive substring filtering over any row type that can expose its
//! fields as text, plus the per-column filter dropdown that drives
//! [`TableState`].

use crate::table_state::{SortOrder, TableState};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A row addressable by field name
pub trait Record {
    /// Display text of `field`, or `None` when the row has no such value.
    fn field(&self, field: &str) -> Option<Cow<'_, str>>;

    /// Ordering used by column sorting. Missing values sort first.
    fn compare_field(&self, other: &Self, field: &str) -> Ordering {
        let a = self.field(field).map(|v| v.to_lowercase());
        let b = other.field(field).map(|v| v.to_lowercase());
        a.cmp(&b)
    }
}

impl Record for BTreeMap<String, String> {
    fn field(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

fn field_contains<R: Record>(record: &R, field: &str, needle_lower: &str) -> bool {
    record
        .field(field)
        .map(|value| value.to_lowercase().contains(needle_lower))
        .unwrap_or(false)
}

/// Rows where any of `fields` contains `term`, ignoring case.
///
/// A blank or whitespace-only term returns `rows` itself, borrowed. Matching
/// rows keep their input order.
pub fn search_across_columns<'a, R>(term: &str, rows: &'a [R], fields: &[&str]) -> Cow<'a, [R]>
where
    R: Record + Clone,
{
    if term.trim().is_empty() {
        return Cow::Borrowed(rows);
    }

    let needle = term.to_lowercase();
    Cow::Owned(
        rows.iter()
            .filter(|row| fields.iter().any(|field| field_contains(*row, field, &needle)))
            .cloned()
            .collect(),
    )
}

/// Filter binding for a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSearchProps {
    column: String,
}

impl ColumnSearchProps {
    pub fn new(column: impl Into<String>) -> Self {
        Self { column: column.into() }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn placeholder(&self) -> String {
        format!("Search {}", self.column)
    }

    /// Same predicate as [`search_across_columns`], restricted to this column.
    pub fn on_filter<R: Record>(&self, value: &str, record: &R) -> bool {
        field_contains(record, &self.column, &value.to_lowercase())
    }

    /// Whether the column header should show its filter as active
    pub fn filter_icon_active(&self, state: &TableState) -> bool {
        state.is_column_filtered(&self.column)
    }

    /// Open the dropdown, pre-filled with the column's current filter text.
    pub fn open_dropdown(&self, state: &TableState) -> FilterDropdown {
        let current = state.column_filter(&self.column);
        FilterDropdown {
            props: self.clone(),
            selected_keys: if current.is_empty() {
                Vec::new()
            } else {
                vec![current.to_string()]
            },
            open: true,
        }
    }
}

/// Filter dropdown for one column: an input plus Search and Reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDropdown {
    props: ColumnSearchProps,
    selected_keys: Vec<String>,
    open: bool,
}

impl FilterDropdown {
    pub fn column(&self) -> &str {
        self.props.column()
    }

    pub fn placeholder(&self) -> String {
        self.props.placeholder()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected_keys(&self) -> &[String] {
        &self.selected_keys
    }

    pub fn value(&self) -> &str {
        self.selected_keys.first().map(String::as_str).unwrap_or("")
    }

    pub fn set_selected_keys(&mut self, keys: Vec<String>) {
        self.selected_keys = keys;
    }

    /// Input changed; an empty value clears the selection.
    pub fn on_input(&mut self, text: &str) {
        if text.is_empty() {
            self.set_selected_keys(Vec::new());
        } else {
            self.set_selected_keys(vec![text.to_string()]);
        }
    }

    pub fn push_char(&mut self, c: char) {
        let mut text = self.value().to_string();
        text.push(c);
        self.on_input(&text);
    }

    pub fn pop_char(&mut self) {
        let mut text = self.value().to_string();
        text.pop();
        self.on_input(&text);
    }

    /// Search button / Enter: commit the filter and close.
    pub fn search(&mut self, state: &mut TableState) {
        let column = self.props.column.clone();
        let open = &mut self.open;
        state.on_column_search(&self.selected_keys, || *open = false, &column);
    }

    /// Reset button: clear the input and the column filter, then close.
    pub fn reset(&mut self, state: &mut TableState) {
        self.set_selected_keys(Vec::new());
        let column = self.props.column.clone();
        let keys = &mut self.selected_keys;
        state.on_column_reset(Some(|| keys.clear()), &column);
        self.open = false;
    }

    /// Close without applying anything
    pub fn dismiss(&mut self) {
        self.open = false;
    }
}

/// Keep rows matching every non-empty column filter.
pub fn apply_column_filters<R>(rows: &[R], filters: &BTreeMap<String, String>) -> Vec<R>
where
    R: Record + Clone,
{
    let active: Vec<(ColumnSearchProps, &str)> = filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(column, value)| (ColumnSearchProps::new(column.as_str()), value.as_str()))
        .collect();

    rows.iter()
        .filter(|row| active.iter().all(|(props, value)| props.on_filter(value, *row)))
        .cloned()
        .collect()
}

/// Stable sort by one column.
pub fn sort_records<R: Record>(rows: &mut [R], column: &str, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ord = a.compare_field(b, column);
        match order {
            SortOrder::Ascend => ord,
            SortOrder::Descend => ord.reverse(),
        }
    });
}

/// Everything the table shows before pagination: global search, column
/// filters, then sort.
pub fn project<R>(rows: &[R], state: &TableState, searchable_fields: &[&str]) -> Vec<R>
where
    R: Record + Clone,
{
    let searched = search_across_columns(&state.search_term, rows, searchable_fields);
    let mut filtered = apply_column_filters(&searched, &state.column_filters);
    if let Some(sort) = &state.sort {
        sort_records(&mut filtered, &sort.column, sort.order);
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn rows() -> Vec<BTreeMap<String, String>> {
        vec![
            row(&[("itemId", "IT001"), ("itemName", "Premium Widget"), ("customerGroup", "001 - AFICONS")]),
            row(&[("itemId", "IT002"), ("itemName", "Standard Gadget"), ("customerGroup", "010 - RHCUST")]),
            row(&[("itemId", "IT003"), ("customerGroup", "011 - HSENT")]),
            row(&[("itemId", "IT004"), ("itemName", "Basic Accessory"), ("customerGroup", "012 - HSLUC")]),
        ]
    }

    #[test]
    fn test_blank_term_is_identity() {
        let data = rows();
        for term in ["", "   ", "\t\n"] {
            let result = search_across_columns(term, &data, &["itemName"]);
            assert!(matches!(result, Cow::Borrowed(_)));
            assert!(std::ptr::eq(result.as_ref(), data.as_slice()));
        }
    }

    #[test]
    fn test_case_insensitive_any_field() {
        let data = rows();
        let result = search_across_columns("WIDGET", &data, &["itemName", "itemId"]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["itemId"], "IT001");

        let result = search_across_columns("it00", &data, &["itemName", "itemId"]);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_missing_field_does_not_match() {
        let data = rows();
        let result = search_across_columns("e", &data, &["itemName"]);
        let ids: Vec<&str> = result.iter().map(|r| r["itemId"].as_str()).collect();
        assert_eq!(ids, vec!["IT001", "IT002", "IT004"]);
    }

    #[test]
    fn test_result_is_ordered_subsequence() {
        let data = rows();
        let result = search_across_columns("s", &data, &["itemName", "customerGroup"]);

        let mut cursor = 0;
        for found in result.iter() {
            let pos = data[cursor..].iter().position(|r| r == found).expect("not a subsequence");
            cursor += pos + 1;
        }
    }

    #[test]
    fn test_unknown_field_matches_nothing() {
        let data = rows();
        assert!(search_across_columns("IT", &data, &["nope"]).is_empty());
    }

    #[test]
    fn test_json_records() {
        let mut a = serde_json::Map::new();
        a.insert("qty".into(), serde_json::json!(1200));
        a.insert("note".into(), serde_json::Value::Null);
        let data = vec![a];

        assert_eq!(search_across_columns("120", &data, &["qty"]).len(), 1);
        assert!(search_across_columns("null", &data, &["note"]).is_empty());
    }

    #[test]
    fn test_column_predicate() {
        let props = ColumnSearchProps::new("customerGroup");
        let data = rows();
        assert!(props.on_filter("rhcust", &data[1]));
        assert!(!props.on_filter("rhcust", &data[0]));
        assert_eq!(props.placeholder(), "Search customerGroup");
    }

    #[test]
    fn test_dropdown_search_and_reset() {
        let mut state = TableState::default();
        let props = ColumnSearchProps::new("itemName");

        let mut dropdown = props.open_dropdown(&state);
        assert!(dropdown.is_open());
        dropdown.push_char('g');
        dropdown.push_char('a');
        assert_eq!(dropdown.selected_keys(), &["ga".to_string()]);

        dropdown.search(&mut state);
        assert!(!dropdown.is_open());
        assert_eq!(state.column_filter("itemName"), "ga");
        assert_eq!(state.active_filter_column, "itemName");
        assert!(props.filter_icon_active(&state));

        let mut dropdown = props.open_dropdown(&state);
        assert_eq!(dropdown.value(), "ga");
        dropdown.reset(&mut state);
        assert!(!dropdown.is_open());
        assert!(dropdown.selected_keys().is_empty());
        assert_eq!(state.column_filter("itemName"), "");
        assert!(state.active_filter_column.is_empty());
    }

    #[test]
    fn test_dropdown_input_clearing() {
        let state = TableState::default();
        let mut dropdown = ColumnSearchProps::new("itemId").open_dropdown(&state);
        dropdown.push_char('x');
        dropdown.pop_char();
        assert!(dropdown.selected_keys().is_empty());
    }

    #[test]
    fn test_apply_column_filters_skips_empty() {
        let data = rows();
        let mut filters = BTreeMap::new();
        filters.insert("itemName".to_string(), String::new());
        assert_eq!(apply_column_filters(&data, &filters).len(), 4);

        filters.insert("customerGroup".to_string(), "01".to_string());
        filters.insert("itemId".to_string(), "4".to_string());
        let result = apply_column_filters(&data, &filters);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0]["itemId"], "IT004");
    }

    #[test]
    fn test_project_search_filter_sort() {
        let data = rows();
        let mut state = TableState::default();
        state.on_search("0");
        state.on_column_search(&["01".to_string()], || {}, "customerGroup");
        state.toggle_sort("itemId");
        state.toggle_sort("itemId");

        let result = project(&data, &state, &["itemId"]);
        let ids: Vec<&str> = result.iter().map(|r| r["itemId"].as_str()).collect();
        assert_eq!(ids, vec!["IT004", "IT003", "IT002", "IT001"]);
    }
}
