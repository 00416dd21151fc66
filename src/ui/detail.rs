//! Detail overlay rendering.
//!
//! Displays a modal overlay with everything known about the selected
//! circuit: rates, breaker state, counters, latency percentiles and the
//! full rate trend.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Sparkline, Table},
    Frame,
};

use super::theme::rgb;
use crate::app::App;
use crate::data::format::{format_count, format_rate, format_value};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 20;

/// Render the circuit detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(circuit) = app.selected_circuit() else {
        return;
    };
    let data = circuit.data();
    let status = data.breaker_status();
    let indicator = circuit.indicator();

    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 40);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(7), // Header
        Constraint::Min(8),    // Counters and latencies
        Constraint::Length(6), // Trend
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header_lines = vec![
        Line::from(vec![
            Span::styled(" ● ", Style::default().fg(rgb(indicator.color))),
            Span::styled(format!("{} ", circuit.id()), bold),
        ]),
        Line::from(Span::styled(
            format!(" {}", circuit.prefix()),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(vec![
            Span::raw(" Rate: "),
            Span::styled(format!("{}/s", format_rate(data.rate_per_second)), bold),
            Span::raw("    Per host: "),
            Span::styled(format!("{}/s", format_rate(data.rate_per_second_per_host)), bold),
            Span::raw("    Hosts: "),
            Span::styled(format_value(data.display_hosts), bold),
        ]),
        Line::from(vec![
            Span::raw(" Error: "),
            Span::styled(
                format!("{}%", format_value(data.error_percentage)),
                app.theme.error_text_style(data.error_percentage).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Breaker: "),
            Span::styled(
                status.label(),
                app.theme.breaker_style(status).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Window: "),
            Span::styled(format!("{}s", format_value(data.window_seconds)), bold),
        ]),
        Line::from(vec![Span::styled(
            format!(
                " Indicator: x {:.1}% y {:.1}% r {:.1}px {}",
                indicator.x,
                indicator.y,
                indicator.radius,
                indicator.color.to_hex()
            ),
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let header_block = Block::default()
        .title(" Circuit Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(Paragraph::new(header_lines).block(header_block), chunks[0]);

    // ===== CONTENT SECTION =====
    let content = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    let counters = [
        ("Success", data.rolling_count_success),
        ("Short-circuited", data.rolling_count_short_circuited),
        ("Bad request", data.rolling_count_bad_requests),
        ("Timeout", data.rolling_count_timeout),
        (data.rejected.label(), data.rejected.count()),
        ("Failure", data.rolling_count_failure),
        ("Total requests", data.total_requests),
    ];
    frame.render_widget(
        value_table(app, " Rolling Counts ", &counters, format_count),
        content[0],
    );

    let latencies = [
        ("Mean", data.latency_mean),
        ("Median", data.latency_median),
        ("90th", data.latency_90),
        ("99th", data.latency_99),
        ("99.5th", data.latency_995),
    ];
    frame.render_widget(
        value_table(app, " Latency (ms) ", &latencies, format_value),
        content[1],
    );

    // ===== TREND =====
    let trend_block = Block::default()
        .title(format!(" Rate Trend ({} samples) ", circuit.trend().len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let width = chunks[2].width.saturating_sub(2) as usize;
    let levels: Vec<u64> = circuit.trend().sparkline(width).into_iter().map(u64::from).collect();
    let sparkline = Sparkline::default()
        .block(trend_block)
        .data(&levels)
        .max(7)
        .style(Style::default().fg(app.theme.highlight));
    frame.render_widget(sparkline, chunks[2]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " ↑/↓ next circuit | Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[3]);
}

fn value_table<'a>(
    app: &App,
    title: &'a str,
    values: &[(&'a str, f64)],
    format: fn(f64) -> String,
) -> Table<'a> {
    let rows: Vec<Row> = values
        .iter()
        .map(|(label, value)| Row::new(vec![Cell::from(*label), Cell::from(format(*value))]))
        .collect();

    Table::new(rows, [Constraint::Fill(2), Constraint::Fill(1)]).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    )
}
