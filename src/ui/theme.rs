//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::scale::{ERROR_TEXT_COLORS, HEALTH_COLORS};
use crate::data::{BreakerStatus, Rgb};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for half-open (mixed) breakers.
    pub warning: Color,
    /// Color for open breakers.
    pub critical: Color,
    /// Color for closed breakers.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
    /// Light backgrounds cannot show the black end of the error text scale.
    pub light: bool,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
            light: false,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
            light: true,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a circuit breaker status
    pub fn breaker_style(&self, status: BreakerStatus) -> Style {
        match status {
            BreakerStatus::Closed | BreakerStatus::ForcedClosed => {
                Style::default().fg(self.healthy)
            }
            BreakerStatus::Mixed => Style::default().fg(self.warning),
            BreakerStatus::Open | BreakerStatus::ForcedOpen => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
            BreakerStatus::Unreported => Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// Style for an entity's health indicator, coloured by error percentage.
    pub fn health_style(&self, error_percentage: f64) -> Style {
        Style::default().fg(rgb(HEALTH_COLORS.color(error_percentage)))
    }

    /// Style for an error percentage figure.
    pub fn error_text_style(&self, error_percentage: f64) -> Style {
        let color = ERROR_TEXT_COLORS.color(error_percentage);
        // Black and grey read poorly on a dark background.
        if !self.light && (color == Rgb::BLACK || color == Rgb::GREY) {
            return Style::default();
        }
        Style::default().fg(rgb(color))
    }
}

/// Convert a scale colour to a terminal colour.
pub fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}
