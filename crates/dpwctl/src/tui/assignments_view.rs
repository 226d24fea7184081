//! Item Assignments page: search, column filters, sorting, paging, error
//! banner and the recent activity panel.

use crate::theme::customer_group_tag;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dpw_common::activity::{sample_activity, ActivityKind, ActivityLog};
use dpw_common::item_assignment::{ItemAssignment, SEARCHABLE_FIELDS, TABLE_COLUMNS};
use dpw_common::table_search::{project, ColumnSearchProps, FilterDropdown, Record};
use dpw_common::table_state::SortOrder;
use dpw_common::{AsyncErrorScope, TableState};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::layout::{assignments_layout, centered_rect};

pub const LOAD_CONTEXT: &str = "loading item assignments";
const SEARCH_PLACEHOLDER: &str = "Search items...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing in the global search box
    Search,
    /// Column filter dropdown open
    ColumnFilter,
}

/// What the page asks the event loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    None,
    Reload,
    Retry,
    GoHome,
}

pub struct AssignmentsView {
    pub rows: Vec<ItemAssignment>,
    pub loaded: bool,
    pub loading: bool,
    pub table: TableState,
    pub search_input: String,
    pub dropdown: Option<FilterDropdown>,
    pub selected_column: usize,
    pub mode: InputMode,
    pub activity: Vec<ActivityLog>,
    pub scope: AsyncErrorScope,
}

impl AssignmentsView {
    pub fn new(scope: AsyncErrorScope, page_size: usize) -> Self {
        Self {
            rows: Vec::new(),
            loaded: false,
            loading: false,
            table: TableState::with_page_size(page_size),
            search_input: String::new(),
            dropdown: None,
            selected_column: 0,
            mode: InputMode::Normal,
            activity: sample_activity(),
            scope,
        }
    }

    /// Field name of the highlighted column
    pub fn selected_field(&self) -> &'static str {
        TABLE_COLUMNS[self.selected_column.min(TABLE_COLUMNS.len() - 1)].0
    }

    pub fn is_editing(&self) -> bool {
        self.mode != InputMode::Normal
    }

    pub fn error(&self) -> Option<String> {
        self.scope.error()
    }

    pub fn set_rows(&mut self, rows: Vec<ItemAssignment>) {
        self.rows = rows;
        self.loaded = true;
        self.loading = false;
        let total = self.visible().len();
        self.table.page = self.table.page.min(self.table.page_count(total));
    }

    /// Rows after search, filters and sort
    pub fn visible(&self) -> Vec<ItemAssignment> {
        project(&self.rows, &self.table, SEARCHABLE_FIELDS)
    }

    /// Current page and the filtered total
    pub fn page(&self) -> (Vec<ItemAssignment>, usize) {
        let visible = self.visible();
        let total = visible.len();
        let (start, end) = self.table.page_bounds(total);
        (visible[start..end].to_vec(), total)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        match self.mode {
            InputMode::Search => {
                self.handle_search_key(key);
                ViewAction::None
            }
            InputMode::ColumnFilter => {
                self.handle_filter_key(key);
                ViewAction::None
            }
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => {
                self.table.on_search(&self.search_input);
                self.mode = InputMode::Normal;
            }
            (KeyCode::Esc, _) => {
                self.mode = InputMode::Normal;
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.search_input.clear();
                self.table.on_search_change("");
            }
            (KeyCode::Backspace, _) => {
                self.search_input.pop();
                self.table.on_search_change(&self.search_input);
            }
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                self.search_input.push(c);
                self.table.on_search_change(&self.search_input);
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let Some(dropdown) = self.dropdown.as_mut() else {
            self.mode = InputMode::Normal;
            return;
        };

        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => dropdown.search(&mut self.table),
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => dropdown.reset(&mut self.table),
            (KeyCode::Esc, _) => dropdown.dismiss(),
            (KeyCode::Backspace, _) => dropdown.pop_char(),
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                dropdown.push_char(c)
            }
            _ => {}
        }

        if !dropdown.is_open() {
            self.dropdown = None;
            self.mode = InputMode::Normal;
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> ViewAction {
        let has_error = self.error().is_some();

        match key.code {
            KeyCode::Char('/') => self.mode = InputMode::Search,
            KeyCode::Left => self.selected_column = self.selected_column.saturating_sub(1),
            KeyCode::Right => {
                self.selected_column = (self.selected_column + 1).min(TABLE_COLUMNS.len() - 1)
            }
            KeyCode::Char('f') => {
                let props = ColumnSearchProps::new(self.selected_field());
                self.dropdown = Some(props.open_dropdown(&self.table));
                self.mode = InputMode::ColumnFilter;
            }
            KeyCode::Char('s') => {
                let field = self.selected_field();
                self.table.toggle_sort(field);
            }
            KeyCode::PageDown | KeyCode::Char('n') => {
                let total = self.visible().len();
                self.table.next_page(total);
            }
            KeyCode::PageUp | KeyCode::Char('p') => self.table.prev_page(),
            KeyCode::Char('z') => self.table.cycle_page_size(),
            KeyCode::Char('r') if has_error => return ViewAction::Retry,
            KeyCode::Char('r') if !self.loading => return ViewAction::Reload,
            KeyCode::Char('c') => self.scope.clear(),
            KeyCode::Char('g') if has_error => return ViewAction::GoHome,
            _ => {}
        }
        ViewAction::None
    }
}

fn column_header(view: &AssignmentsView, index: usize, field: &str, title: &str) -> Cell<'static> {
    let mut text = title.to_string();
    if let Some(sort) = view.table.sort.as_ref().filter(|s| s.column == field) {
        text.push_str(match sort.order {
            SortOrder::Ascend => " ▲",
            SortOrder::Descend => " ▼",
        });
    }
    if ColumnSearchProps::new(field).filter_icon_active(&view.table) {
        text.push_str(" *");
    }

    let mut style = Style::default().add_modifier(Modifier::BOLD);
    if index == view.selected_column {
        style = style.add_modifier(Modifier::REVERSED);
    }
    Cell::from(text).style(style)
}

fn column_width(field: &str) -> Constraint {
    match field {
        "itemId" => Constraint::Length(12),
        "itemName" => Constraint::Min(18),
        "customerGroup" => Constraint::Min(18),
        "assignedDate" => Constraint::Length(24),
        _ => Constraint::Length(18),
    }
}

pub fn draw_assignments(f: &mut Frame, area: Rect, view: &AssignmentsView) {
    let grid = assignments_layout(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled("Item Assignments", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            "Manage customer group assignments for items",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    f.render_widget(title, grid.title);

    draw_search_bar(f, grid.search, view);

    if let Some(error) = view.error() {
        draw_error_banner(f, grid.table, &error, true);
    } else if view.loading && !view.loaded {
        let loading = Paragraph::new("Loading item assignments...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(loading, grid.table);
    } else {
        draw_table(f, grid.table, view);
    }

    let (_, total) = view.page();
    let footer = Line::from(vec![
        Span::styled(
            view.table.showing_label(total, "assignments"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(format!(
            "   Page {}/{}   {} / page",
            view.table.page.min(view.table.page_count(total)),
            view.table.page_count(total),
            view.table.page_size
        )),
    ]);
    f.render_widget(Paragraph::new(footer), grid.footer);

    if grid.activity.height > 0 {
        draw_activity(f, grid.activity, &view.activity);
    }

    if let Some(dropdown) = &view.dropdown {
        draw_filter_dropdown(f, area, dropdown);
    }
}

fn draw_search_bar(f: &mut Frame, area: Rect, view: &AssignmentsView) {
    let editing = view.mode == InputMode::Search;
    let border = if editing { Color::Yellow } else { Color::DarkGray };

    let mut spans = if view.search_input.is_empty() && !editing {
        vec![Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))]
    } else {
        vec![Span::raw(view.search_input.clone())]
    };
    if editing {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }

    let filters: Vec<String> = view
        .table
        .column_filters
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(column, value)| format!("{}={}", column, value))
        .collect();
    if !filters.is_empty() {
        spans.push(Span::styled(
            format!("   Filters: {}", filters.join(", ")),
            Style::default().fg(Color::Cyan),
        ));
    }

    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" / Search "),
    );
    f.render_widget(search, area);
}

fn draw_table(f: &mut Frame, area: Rect, view: &AssignmentsView) {
    let header = Row::new(
        TABLE_COLUMNS
            .iter()
            .enumerate()
            .map(|(i, (field, title))| column_header(view, i, field, title)),
    );

    let (page_rows, _) = view.page();
    let rows: Vec<Row> = page_rows
        .iter()
        .map(|record| {
            Row::new(TABLE_COLUMNS.iter().map(|(field, _)| {
                let text = record.field(field).unwrap_or_default().into_owned();
                if *field == "customerGroup" {
                    let color = customer_group_tag(&record.customer_group).tui();
                    Cell::from(text).style(Style::default().fg(color))
                } else {
                    Cell::from(text)
                }
            }))
        })
        .collect();

    let widths: Vec<Constraint> = TABLE_COLUMNS.iter().map(|(field, _)| column_width(field)).collect();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(Block::default().borders(Borders::ALL));

    if page_rows.is_empty() {
        f.render_widget(table, area);
        let inner = Rect::new(area.x + 2, area.y + 2, area.width.saturating_sub(4), 1);
        if area.height > 3 {
            f.render_widget(
                Paragraph::new("No data").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
        }
    } else {
        f.render_widget(table, area);
    }
}

/// "Something went wrong" banner with its actions
pub fn draw_error_banner(f: &mut Frame, area: Rect, error: &str, can_retry: bool) {
    let mut actions = Vec::new();
    if can_retry {
        actions.push(Span::styled("[r] Try Again", Style::default().fg(Color::Cyan)));
        actions.push(Span::raw("   "));
    }
    actions.push(Span::raw("[g] Go to Home"));

    let text = vec![
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(error.to_string()),
        Line::from(""),
        Line::from(actions),
    ];

    let banner = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(banner, area);
}

fn activity_icon(kind: ActivityKind) -> Span<'static> {
    match kind {
        ActivityKind::Assigned => Span::styled("~", Style::default().fg(Color::Blue)),
        ActivityKind::Added => Span::styled("+", Style::default().fg(Color::Green)),
        ActivityKind::Removed => Span::styled("-", Style::default().fg(Color::Red)),
    }
}

fn draw_activity(f: &mut Frame, area: Rect, logs: &[ActivityLog]) {
    let lines: Vec<Line> = logs
        .iter()
        .map(|log| {
            Line::from(vec![
                activity_icon(log.kind),
                Span::raw(" "),
                Span::raw(log.summary()),
                Span::styled(
                    format!("  by {} at {}", log.user_name, log.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recent Activity Logs "),
    );
    f.render_widget(panel, area);
}

fn draw_filter_dropdown(f: &mut Frame, area: Rect, dropdown: &FilterDropdown) {
    let rect = centered_rect(48, 5, area);
    let value = if dropdown.value().is_empty() {
        Span::styled(dropdown.placeholder(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(dropdown.value().to_string())
    };

    let text = vec![
        Line::from(vec![value, Span::styled("_", Style::default().fg(Color::Yellow))]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter Search   Ctrl+R Reset   Esc Close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(format!(" Filter {} ", dropdown.column())),
        ),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpw_common::notify::{Notifier, ToastQueue};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn assignment(id: &str, name: &str, group: &str) -> ItemAssignment {
        ItemAssignment {
            key: id.into(),
            item_id: id.into(),
            item_name: name.into(),
            customer_group: group.into(),
            assigned_date: "5/12/2023, 9:45:22 AM".into(),
            last_modified_by: "john.doe".into(),
            assigned_at: None,
        }
    }

    fn view() -> AssignmentsView {
        let notifier = Notifier::new(Arc::new(ToastQueue::new()), None);
        let mut view = AssignmentsView::new(AsyncErrorScope::start(notifier), 10);
        view.set_rows(vec![
            assignment("IT001", "Premium Widget", "001 - AFICONS"),
            assignment("IT002", "Standard Gadget", "010 - RHCUST"),
            assignment("IT003", "Deluxe Component", "011 - HSENT"),
        ]);
        view
    }

    fn type_text(view: &mut AssignmentsView, text: &str) {
        for c in text.chars() {
            view.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn ids(view: &AssignmentsView) -> Vec<String> {
        view.visible().into_iter().map(|r| r.item_id).collect()
    }

    #[test]
    fn test_search_filters_while_typing() {
        let mut view = view();
        view.handle_key(key(KeyCode::Char('/')));
        assert!(view.is_editing());

        type_text(&mut view, "WIDGET");
        assert_eq!(ids(&view), vec!["IT001"]);

        view.handle_key(key(KeyCode::Enter));
        assert!(!view.is_editing());
        assert_eq!(view.table.search_term, "WIDGET");
    }

    #[test]
    fn test_search_clear_restores_rows() {
        let mut view = view();
        view.handle_key(key(KeyCode::Char('/')));
        type_text(&mut view, "rhcust");
        assert_eq!(ids(&view), vec!["IT002"]);

        view.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(ids(&view).len(), 3);
    }

    #[test]
    fn test_column_filter_dropdown() {
        let mut view = view();
        view.handle_key(key(KeyCode::Right));
        view.handle_key(key(KeyCode::Right));
        assert_eq!(view.selected_field(), "customerGroup");

        view.handle_key(key(KeyCode::Char('f')));
        assert_eq!(view.mode, InputMode::ColumnFilter);
        type_text(&mut view, "HSENT");
        view.handle_key(key(KeyCode::Enter));

        assert_eq!(view.mode, InputMode::Normal);
        assert!(view.dropdown.is_none());
        assert_eq!(view.table.column_filter("customerGroup"), "HSENT");
        assert_eq!(view.table.active_filter_column, "customerGroup");
        assert_eq!(ids(&view), vec!["IT003"]);

        // Reopening shows the committed value; reset clears it
        view.handle_key(key(KeyCode::Char('f')));
        assert_eq!(view.dropdown.as_ref().map(|d| d.value().to_string()), Some("HSENT".into()));
        view.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(view.table.column_filter("customerGroup"), "");
        assert_eq!(ids(&view).len(), 3);
    }

    #[test]
    fn test_dropdown_escape_keeps_filter() {
        let mut view = view();
        view.handle_key(key(KeyCode::Char('f')));
        type_text(&mut view, "IT00");
        view.handle_key(key(KeyCode::Esc));

        assert!(view.dropdown.is_none());
        assert_eq!(view.table.column_filter("itemId"), "");
    }

    #[test]
    fn test_sort_cycle() {
        let mut view = view();
        view.handle_key(key(KeyCode::Right));
        view.handle_key(key(KeyCode::Char('s')));
        assert_eq!(ids(&view), vec!["IT003", "IT001", "IT002"]);

        view.handle_key(key(KeyCode::Char('s')));
        assert_eq!(ids(&view), vec!["IT002", "IT001", "IT003"]);

        view.handle_key(key(KeyCode::Char('s')));
        assert!(view.table.sort.is_none());
    }

    #[test]
    fn test_paging_and_page_size() {
        let mut view = view();
        let rows = (0..25)
            .map(|i| assignment(&format!("IT{:03}", i), "Thing", "010 - RHCUST"))
            .collect();
        view.set_rows(rows);

        view.handle_key(key(KeyCode::PageDown));
        view.handle_key(key(KeyCode::PageDown));
        view.handle_key(key(KeyCode::PageDown));
        assert_eq!(view.table.page, 3);
        assert_eq!(view.page().0.len(), 5);

        view.handle_key(key(KeyCode::Char('z')));
        assert_eq!(view.table.page_size, 20);
        assert_eq!(view.table.page, 1);
    }

    #[test]
    fn test_reload_retry_and_home_actions() {
        let mut view = view();
        assert_eq!(view.handle_key(key(KeyCode::Char('r'))), ViewAction::Reload);
        assert_eq!(view.handle_key(key(KeyCode::Char('g'))), ViewAction::None);

        view.scope.handle("API call failed: 500 Internal Server Error", Some(LOAD_CONTEXT));
        assert_eq!(view.handle_key(key(KeyCode::Char('r'))), ViewAction::Retry);
        assert_eq!(view.handle_key(key(KeyCode::Char('g'))), ViewAction::GoHome);

        view.handle_key(key(KeyCode::Char('c')));
        assert!(view.error().is_none());
    }
}
