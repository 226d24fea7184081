//! Rendering - header, navigation, page body, status bar and overlays

use chrono::Local;
use dpw_common::notify::{NotificationLevel, Toast};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use super::assignments_view::draw_assignments;
use super::dev_tools::draw_dev_tools;
use super::layout::{self, centered_rect, toast_areas, TOAST_WIDTH};
use super::pages::{draw_auth_required, draw_home, draw_location_override, draw_not_found};
use super::state::{Route, TuiState};
use crate::theme::environment_tag;

/// Draw one frame. `dev_info` feeds the Developer Tools environment panel.
pub fn draw_ui(f: &mut Frame, state: &TuiState, toasts: &[Toast], dev_info: &[(&'static str, String)]) {
    let size = f.size();
    let grid = layout::compute_layout(size, state.is_authenticated());

    draw_header(f, grid.header, state);
    if state.is_authenticated() {
        draw_nav(f, grid.nav, state);
        draw_body(f, grid.body, state, dev_info);
    } else {
        draw_auth_required(f, grid.body);
    }
    draw_status_bar(f, grid.status_bar, state);

    draw_toasts(f, grid.body, toasts);

    if state.show_help {
        draw_help_overlay(f, size);
    }
}

fn draw_body(f: &mut Frame, area: Rect, state: &TuiState, dev_info: &[(&'static str, String)]) {
    match state.route {
        Route::Home => draw_home(
            f,
            area,
            &state.app_name,
            &state.environment,
            state.environment_kind,
        ),
        Route::ItemAssignments => draw_assignments(f, area, &state.assignments),
        Route::ItemLocationOverride => draw_location_override(f, area),
        Route::PlanningMasterControl => draw_not_found(f, area),
        Route::DeveloperTools => draw_dev_tools(f, area, &state.dev_tools, dev_info),
    }
}

/// App name and environment tag on the left, the user on the right
pub fn draw_header(f: &mut Frame, area: Rect, state: &TuiState) {
    let tag_color = environment_tag(state.environment_kind).tui();

    let mut left = vec![
        Span::raw(" "),
        Span::styled(state.app_name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", state.environment.to_uppercase()),
            Style::default().fg(Color::Black).bg(tag_color),
        ),
    ];

    let right = match state.user_label() {
        Some(name) => format!("{} | {} ", name, state.role_label()),
        None => "Not signed in  [i] Sign in ".to_string(),
    };

    let used: usize = left.iter().map(|s| s.content.chars().count()).sum();
    let pad = (area.width as usize).saturating_sub(used + right.chars().count());
    left.push(Span::raw(" ".repeat(pad)));
    left.push(Span::styled(right, Style::default().fg(Color::Cyan)));

    f.render_widget(
        Paragraph::new(Line::from(left)).style(Style::default().bg(Color::Rgb(0, 0, 0))),
        area,
    );
}

fn draw_nav(f: &mut Frame, area: Rect, state: &TuiState) {
    let menu = state.menu();
    let titles: Vec<Line> = menu
        .iter()
        .enumerate()
        .map(|(i, route)| Line::from(format!("{} {}", i + 1, route.title())))
        .collect();
    let selected = menu.iter().position(|r| *r == state.route).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider("|");
    f.render_widget(tabs, area);
}

fn key_hints(state: &TuiState) -> &'static str {
    if !state.is_authenticated() {
        return "i sign in  ? help  q quit";
    }
    match state.route {
        Route::ItemAssignments if state.assignments.is_editing() => "Enter apply  Esc close",
        Route::ItemAssignments => "/ search  f filter  s sort  n/p page  r reload  ? help",
        Route::DeveloperTools => "a/n/u/e simulate  c clear  s/m notify  l log  ? help",
        _ => "Tab next page  o sign out  ? help  q quit",
    }
}

/// Location, key hints, clock, and a marker when running on the fallback config
pub fn draw_status_bar(f: &mut Frame, area: Rect, state: &TuiState) {
    let time = Local::now().format("%H:%M:%S").to_string();

    let mut spans = vec![
        Span::styled(format!(" {} ", state.route.location()), Style::default().fg(Color::Cyan)),
        Span::raw("| "),
        Span::styled(key_hints(state), Style::default().fg(Color::DarkGray)),
    ];
    if state.fallback_config {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("fallback config", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::raw(" | "));
    spans.push(Span::raw(time));

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Rgb(0, 0, 0))),
        area,
    );
}

fn draw_toasts(f: &mut Frame, body: Rect, toasts: &[Toast]) {
    let areas = toast_areas(body, toasts.len());
    for (toast, area) in toasts.iter().zip(areas) {
        let color = match toast.notification.level {
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Error => Color::Red,
        };
        let inner_width = TOAST_WIDTH.saturating_sub(2).max(1) as usize;

        let mut lines = vec![Line::from(Span::styled(
            toast.notification.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if let Some(description) = &toast.notification.description {
            // Only the first wrapped line fits
            if let Some(first) = textwrap::wrap(description, inner_width).into_iter().next() {
                lines.push(Line::from(first.into_owned()));
            }
        }

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            area,
        );
    }
}

const HELP_LINES: &[(&str, &str)] = &[
    ("Tab / Shift+Tab", "Next / previous page"),
    ("1-9", "Jump to page"),
    ("i / o", "Sign in / sign out"),
    ("x", "Dismiss notifications"),
    ("/", "Search item assignments"),
    ("Left / Right", "Select column"),
    ("f", "Filter selected column"),
    ("s", "Sort selected column"),
    ("n / p", "Next / previous page of rows"),
    ("z", "Change page size"),
    ("r", "Reload or retry"),
    ("q / Ctrl+C", "Quit"),
];

fn draw_help_overlay(f: &mut Frame, size: Rect) {
    let area = centered_rect(56, HELP_LINES.len() as u16 + 4, size);
    let mut lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:<18}", keys), Style::default().fg(Color::Cyan)),
                Span::raw(*action),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Esc to close", Style::default().fg(Color::DarkGray))));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Keys ")),
        area,
    );
}
