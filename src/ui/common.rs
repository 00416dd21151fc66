//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay
//! and the sparkline glyphs.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Number of trend samples shown in a table row.
pub const SPARKLINE_WIDTH: usize = 8;

/// Render the header bar with a dashboard overview.
///
/// Displays: breaker indicator, circuit and pool counts, naming scheme.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if app.last_updated.is_none() {
        let line = Line::from(vec![
            Span::styled(" HYSTRIX ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let dashboard = &app.dashboard;
    let open = dashboard.open_breaker_count();
    let status_style = if open > 0 {
        Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.healthy)
    };

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("HYSTRIX ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            format!("{}", dashboard.circuit_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" circuits "),
        if open > 0 {
            Span::styled(format!("{}", open), status_style)
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" open │ "),
        Span::styled(
            format!("{}", dashboard.thread_pool_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" thread pools │ "),
        Span::raw(format!("{} naming", dashboard.naming_scheme().label())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Circuits "), Line::from(" 2:Thread Pools ")];

    let selected = match app.current_view {
        View::Circuits => 0,
        View::ThreadPools => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the source, time since last update and available controls, or a
/// temporary status message or load error.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else if let Some(updated) = app.last_updated {
        let controls = match app.current_view {
            View::Circuits => {
                "s:sort a/v/e/t/m/d/9/p/P Enter:detail C:clear x:export ?:help q:quit"
            }
            View::ThreadPools => "s:sort a/v Tab:switch C:clear x:export ?:help q:quit",
        };
        format!(
            " {} | Updated {:.1}s ago | {}",
            app.source_description(),
            updated.elapsed().as_secs_f64(),
            controls,
        )
    } else {
        format!(" Waiting for {} | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab ←/→     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Circuit detail"),
        Line::from("  Esc         Close overlay"),
        Line::from(""),
        section(" Sorting (repeat to reverse)"),
        Line::from("  s / S       Next mode / reverse"),
        Line::from("  a v         Alphabetical / volume"),
        Line::from("  e t         Error / error then volume"),
        Line::from("  m d         Mean / median latency"),
        Line::from("  9 p P       90th / 99th / 99.5th"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Reload data"),
        Line::from("  C           Clear dashboard"),
        Line::from("  x           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 27u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Draw sparkline levels (0-7) as bar glyphs.
pub fn render_sparkline(levels: &[u8]) -> String {
    if levels.is_empty() {
        return " ".repeat(SPARKLINE_WIDTH);
    }
    levels.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}
