//! Terminal UI rendering using ratatui.
//!
//! Each view is implemented in its own submodule with a `render` function.
//! Renderers only read the dashboard; they never mutate it.
//!
//! ## Submodules
//!
//! - [`circuits`]: Table of circuits with rates, counters, latencies and trend
//! - [`thread_pools`]: Table of thread pools
//! - [`detail`]: Modal overlay for the selected circuit
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (circuits/thread_pools::render)      │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod circuits;
pub mod common;
pub mod detail;
pub mod theme;
pub mod thread_pools;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

pub use theme::Theme;

/// Minimum terminal size for a usable display.
const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 12;

/// Rows above the first table row: header, tabs, block border, table header.
pub const CONTENT_START_ROW: u16 = 3;

/// Draw one frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let centered = Rect::new(
            0,
            (area.height / 2).saturating_sub(2),
            area.width,
            5u16.min(area.height),
        );
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match app.current_view {
        View::Circuits => circuits::render(frame, app, chunks[2]),
        View::ThreadPools => thread_pools::render(frame, app, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_detail_overlay {
        detail::render_overlay(frame, app, area);
    }

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::data::Dashboard;
    use crate::source::{ChannelSource, MetricSnapshot};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn renders_circuits_and_detail() {
        let (tx, source) = ChannelSource::create("test");
        tx.send(
            MetricSnapshot::default()
                .with_gauge("gauge.hystrix.HystrixCommand.svc.lookup.requestCount", 50.0)
                .with_gauge(
                    "gauge.hystrix.HystrixCommand.svc.lookup.isCircuitBreakerOpen",
                    true,
                )
                .with_gauge("gauge.hystrix.HystrixCommand.svc.lookup.reportingHosts", 1.0),
        )
        .unwrap();
        let mut app = App::new(Box::new(source), Dashboard::new());
        app.reload_data().unwrap();
        app.enter_detail();

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("svc.lookup"));
        assert!(text.contains("Circuit Detail"));
        assert!(text.contains("Open"));
    }

    #[test]
    fn small_terminal_shows_hint() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), Dashboard::new());
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();
        assert!(buffer_text(&terminal).contains("Terminal too small"));
    }
}
