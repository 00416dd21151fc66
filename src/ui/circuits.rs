//! Circuits view rendering.
//!
//! One row per circuit in dashboard order, with request rate, rolling
//! counters, latency percentiles, breaker status and a rate sparkline.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::common::{render_sparkline, SPARKLINE_WIDTH};
use crate::app::App;
use crate::data::format::{format_count, format_rate, format_value};
use crate::data::CircuitSort;

/// Render the Circuits view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let sort = app.dashboard.circuit_sort();

    let header = Row::new(vec![
        Cell::from(" "),
        Cell::from(format_header("Circuit", CircuitSort::Alphabetical, app)),
        Cell::from(format_header("Rate/s", CircuitSort::Volume, app)),
        Cell::from(format_header("Err%", CircuitSort::Error, app)),
        Cell::from("Ok"),
        Cell::from("Short"),
        Cell::from("Bad"),
        Cell::from("Tmout"),
        Cell::from("Rej"),
        Cell::from("Fail"),
        Cell::from("Hosts"),
        Cell::from(format_header("Mean", CircuitSort::LatencyMean, app)),
        Cell::from(format_header("50th", CircuitSort::LatencyMedian, app)),
        Cell::from(format_header("90th", CircuitSort::Latency90, app)),
        Cell::from(format_header("99th", CircuitSort::Latency99, app)),
        Cell::from(format_header("99.5th", CircuitSort::Latency995, app)),
        Cell::from("Trend"),
        Cell::from("Breaker"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .dashboard
        .circuits()
        .map(|c| {
            let data = c.data();
            let status = data.breaker_status();
            let rejected_style = if data.rejected.count() > 0.0 {
                Style::default().fg(app.theme.warning)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from("●").style(app.theme.health_style(data.error_percentage)),
                Cell::from(c.id().to_string()),
                Cell::from(format_rate(data.rate_per_second)),
                Cell::from(format!("{}%", format_value(data.error_percentage)))
                    .style(app.theme.error_text_style(data.error_percentage)),
                Cell::from(format_count(data.rolling_count_success)),
                Cell::from(format_count(data.rolling_count_short_circuited)),
                Cell::from(format_count(data.rolling_count_bad_requests)),
                Cell::from(format_count(data.rolling_count_timeout)),
                Cell::from(format_count(data.rejected.count())).style(rejected_style),
                Cell::from(format_count(data.rolling_count_failure)),
                Cell::from(format_value(data.display_hosts)),
                Cell::from(format_value(data.latency_mean)),
                Cell::from(format_value(data.latency_median)),
                Cell::from(format_value(data.latency_90)),
                Cell::from(format_value(data.latency_99)),
                Cell::from(format_value(data.latency_995)),
                Cell::from(render_sparkline(&c.trend().sparkline(SPARKLINE_WIDTH))),
                Cell::from(status.label()).style(app.theme.breaker_style(status)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(1),
        Constraint::Fill(4),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(SPARKLINE_WIDTH as u16),
        Constraint::Min(13),
    ];

    let count = app.dashboard.circuit_count();
    let selected = app.selected_circuit_index.min(count.saturating_sub(1));
    let position_info = if count > 0 {
        format!(" [{}/{}]", selected + 1, count)
    } else {
        String::new()
    };

    let title = format!(
        " Circuits ({}) [s:sort {}]{} ",
        count,
        sort.label(),
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if count > 0 {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, mode: CircuitSort, app: &App) -> Span<'static> {
    let sort = app.dashboard.circuit_sort();
    let active = sort.mode() == mode
        || (mode == CircuitSort::Error && sort.mode() == CircuitSort::ErrorThenVolume);
    if active {
        Span::raw(format!("{}{}", name, sort.direction().arrow()))
    } else {
        Span::raw(name.to_string())
    }
}
