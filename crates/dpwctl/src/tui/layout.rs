//! Layout - TUI layout grid computation
//!
//! Header, navigation bar, page body and status bar, plus the overlay
//! rectangles for toasts and dialogs.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// TUI layout structure containing all panel rectangles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiLayout {
    /// Header bar (top)
    pub header: Rect,
    /// Navigation menu, zero height while signed out
    pub nav: Rect,
    /// Page content
    pub body: Rect,
    /// Status bar (bottom)
    pub status_bar: Rect,
}

const HEADER_HEIGHT: u16 = 1;
const NAV_HEIGHT: u16 = 1;
const STATUS_BAR_HEIGHT: u16 = 1;

/// Toast overlay width, clipped to the frame
pub const TOAST_WIDTH: u16 = 44;
/// Lines per toast: border, title, description, border
pub const TOAST_HEIGHT: u16 = 4;

/// Compute the TUI layout grid
///
/// The navigation bar is only shown to signed-in users.
pub fn compute_layout(frame_area: Rect, show_nav: bool) -> TuiLayout {
    let nav_height = if show_nav { NAV_HEIGHT } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(nav_height),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(frame_area);

    TuiLayout {
        header: chunks[0],
        nav: chunks[1],
        body: chunks[2],
        status_bar: chunks[3],
    }
}

/// Stack of toast rectangles in the top-right corner of `body`, newest last.
/// Only as many as fit are returned.
pub fn toast_areas(body: Rect, count: usize) -> Vec<Rect> {
    let width = TOAST_WIDTH.min(body.width);
    if width == 0 {
        return Vec::new();
    }
    let x = body.x + body.width - width;
    let fit = (body.height / TOAST_HEIGHT) as usize;

    (0..count.min(fit))
        .map(|i| Rect::new(x, body.y + i as u16 * TOAST_HEIGHT, width, TOAST_HEIGHT))
        .collect()
}

/// Rectangle of at most `width` x `height` centred in `area`
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Vertical split of the item assignments page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentsLayout {
    pub title: Rect,
    pub search: Rect,
    pub table: Rect,
    pub footer: Rect,
    /// Zero height when the terminal is too short
    pub activity: Rect,
}

const TITLE_HEIGHT: u16 = 2;
const SEARCH_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;
const ACTIVITY_HEIGHT: u16 = 6;
const MIN_TABLE_HEIGHT: u16 = 6;

pub fn assignments_layout(body: Rect) -> AssignmentsLayout {
    let fixed = TITLE_HEIGHT + SEARCH_HEIGHT + FOOTER_HEIGHT;
    let show_activity = body.height >= fixed + MIN_TABLE_HEIGHT + ACTIVITY_HEIGHT;
    let activity_height = if show_activity { ACTIVITY_HEIGHT } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Length(SEARCH_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
            Constraint::Length(activity_height),
        ])
        .split(body);

    AssignmentsLayout {
        title: chunks[0],
        search: chunks[1],
        table: chunks[2],
        footer: chunks[3],
        activity: chunks[4],
    }
}
