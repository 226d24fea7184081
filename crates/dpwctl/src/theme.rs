//! Tag colours shared by the CLI tables and the TUI

use dpw_common::config::EnvironmentKind;
use owo_colors::OwoColorize;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagColor {
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Cyan,
    GeekBlue,
    Yellow,
    Grey,
}

/// Customer group markers, checked in order; the first one contained wins.
const CUSTOMER_GROUP_TAGS: &[(&str, TagColor)] = &[
    ("AFICONS", TagColor::Blue),
    ("RHCUST", TagColor::Green),
    ("HSENT", TagColor::Purple),
    ("HSLUC", TagColor::Orange),
    ("MASSRENT", TagColor::Red),
    ("ECOMM", TagColor::Cyan),
    ("INT", TagColor::GeekBlue),
];

pub fn customer_group_tag(group: &str) -> TagColor {
    CUSTOMER_GROUP_TAGS
        .iter()
        .find(|(marker, _)| group.contains(marker))
        .map(|(_, color)| *color)
        .unwrap_or(TagColor::Grey)
}

pub fn environment_tag(kind: EnvironmentKind) -> TagColor {
    match kind {
        EnvironmentKind::Production => TagColor::Green,
        EnvironmentKind::Staging => TagColor::Yellow,
        EnvironmentKind::Development => TagColor::Blue,
        EnvironmentKind::Other => TagColor::Grey,
    }
}

impl TagColor {
    pub fn tui(self) -> Color {
        match self {
            TagColor::Blue => Color::Blue,
            TagColor::Green => Color::Green,
            TagColor::Purple => Color::Magenta,
            TagColor::Orange => Color::Rgb(250, 140, 22),
            TagColor::Red => Color::Red,
            TagColor::Cyan => Color::Cyan,
            TagColor::GeekBlue => Color::Rgb(47, 84, 235),
            TagColor::Yellow => Color::Yellow,
            TagColor::Grey => Color::Gray,
        }
    }

    /// Colour `text` for a terminal line
    pub fn paint(self, text: &str) -> String {
        match self {
            TagColor::Blue => text.blue().to_string(),
            TagColor::Green => text.green().to_string(),
            TagColor::Purple => text.magenta().to_string(),
            TagColor::Orange => text.truecolor(250, 140, 22).to_string(),
            TagColor::Red => text.red().to_string(),
            TagColor::Cyan => text.cyan().to_string(),
            TagColor::GeekBlue => text.bright_blue().to_string(),
            TagColor::Yellow => text.yellow().to_string(),
            TagColor::Grey => text.dimmed().to_string(),
        }
    }
}
