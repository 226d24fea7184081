//! Static pages: home, placeholders, not found, sign-in required

use crate::theme::environment_tag;
use dpw_common::config::EnvironmentKind;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const FEATURES: &[&str] = &[
    "Item-Customer Group Management",
    "Real-time Activity Tracking",
    "Advanced Search & Filtering",
    "Terminal UI and scriptable CLI",
    "Structured client-side logging",
    "Enterprise Security",
];

pub fn draw_home(f: &mut Frame, area: Rect, app_name: &str, environment: &str, kind: EnvironmentKind) {
    let tag_color = environment_tag(kind).tui();

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(app_name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!(" {} ", environment.to_uppercase()),
                Style::default().fg(Color::Black).bg(tag_color),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Demand planning for item and customer group assignments",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled("Application Features", Style::default().add_modifier(Modifier::BOLD))),
    ];
    lines.extend(FEATURES.iter().map(|feature| Line::from(format!("  * {}", feature))));

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

pub fn draw_location_override(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Item Location Override", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("This page will be used to manage item location overrides."),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

pub fn draw_not_found(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("404", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Sorry, the page you visited does not exist."),
        Line::from(""),
        Line::from(Span::styled("[Tab] Back to the menu", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

pub fn draw_auth_required(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Authentication Required",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Please sign in to access the Demand Planning Web application."),
        Line::from(""),
        Line::from(Span::styled("[i] Sign in", Style::default().fg(Color::Cyan))),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::NONE)),
        area,
    );
}
