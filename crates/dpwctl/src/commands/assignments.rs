//! `dpwctl assignments`

use crate::errors::{EXIT_API_UNAVAILABLE, EXIT_SUCCESS};
use crate::output;
use anyhow::Result;
use dpw_common::activity::sample_activity;
use dpw_common::item_assignment::{ItemAssignment, SEARCHABLE_FIELDS};
use dpw_common::table_search::{project, ColumnSearchProps};
use dpw_common::{AppContext, TableState};
use serde::Serialize;

pub const LOAD_CONTEXT: &str = "loading item assignments";

#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
    pub sort: Option<String>,
    pub desc: bool,
    pub page: usize,
    pub page_size: Option<usize>,
}

impl AssignmentQuery {
    /// Drive a table state through the same handlers the TUI uses.
    pub fn table_state(&self, default_page_size: usize) -> TableState {
        let mut table = TableState::with_page_size(self.page_size.unwrap_or(default_page_size));

        if let Some(term) = &self.search {
            table.on_search(term);
        }

        for (column, value) in &self.filters {
            let mut dropdown = ColumnSearchProps::new(column.as_str()).open_dropdown(&table);
            dropdown.on_input(value);
            dropdown.search(&mut table);
        }

        if let Some(column) = &self.sort {
            table.toggle_sort(column);
            if self.desc {
                table.toggle_sort(column);
            }
        }

        table.page = self.page.max(1);
        table
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentPage<'a> {
    total: usize,
    page: usize,
    page_size: usize,
    items: &'a [ItemAssignment],
}

pub async fn assignments(ctx: &AppContext, query: AssignmentQuery, json: bool) -> Result<i32> {
    let scope = ctx.new_error_scope();
    let rows = scope.run(LOAD_CONTEXT, || ctx.assignments.fetch_all()).await;

    // The scope already reported the failure through the console sink
    let Some(rows) = rows else {
        return Ok(EXIT_API_UNAVAILABLE);
    };

    let table = query.table_state(ctx.settings.table.page_size);
    let visible = project(&rows, &table, SEARCHABLE_FIELDS);
    let (start, end) = table.page_bounds(visible.len());
    let page_rows = &visible[start..end];

    if json {
        let page = AssignmentPage {
            total: visible.len(),
            page: table.page.min(table.page_count(visible.len())),
            page_size: table.page_size,
            items: page_rows,
        };
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        output::print_assignments(page_rows, &table.showing_label(visible.len(), "assignments"));
        output::print_activity(&sample_activity());
    }

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpw_common::table_state::SortOrder;

    #[test]
    fn test_query_builds_table_state() {
        let query = AssignmentQuery {
            search: Some("widget".into()),
            filters: vec![("customerGroup".into(), "RHCUST".into())],
            sort: Some("itemId".into()),
            desc: true,
            page: 3,
            page_size: Some(20),
        };
        let table = query.table_state(10);

        assert_eq!(table.search_term, "widget");
        assert_eq!(table.column_filter("customerGroup"), "RHCUST");
        assert_eq!(table.active_filter_column, "customerGroup");
        assert_eq!(table.sort.as_ref().map(|s| s.order), Some(SortOrder::Descend));
        assert_eq!(table.page, 3);
        assert_eq!(table.page_size, 20);
    }

    #[test]
    fn test_query_defaults() {
        let table = AssignmentQuery::default().table_state(50);
        assert_eq!(table.page_size, 50);
        assert_eq!(table.page, 1);
        assert!(table.sort.is_none());
        assert!(table.column_filters.is_empty());
    }
}
