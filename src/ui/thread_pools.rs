//! Thread Pools view rendering.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::format::{format_count, format_rate, format_value};
use crate::data::ThreadPoolSort;

/// Render the Thread Pools view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from(" "),
        Cell::from(format_header("Pool", ThreadPoolSort::Alphabetical, app)),
        Cell::from(format_header("Rate/s", ThreadPoolSort::Volume, app)),
        Cell::from("Rate/host"),
        Cell::from("Active"),
        Cell::from("Queued"),
        Cell::from("Pool Size"),
        Cell::from("Max Active"),
        Cell::from("Executions"),
        Cell::from("Queue Limit"),
        Cell::from("Hosts"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = app
        .dashboard
        .thread_pools()
        .map(|p| {
            let data = p.data();
            let queue_style = if data.current_queue_size > 0.0 {
                Style::default().fg(app.theme.warning)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from("●").style(app.theme.health_style(data.error_percentage)),
                Cell::from(p.service().to_string()),
                Cell::from(format_rate(data.rate_per_second)),
                Cell::from(format_rate(data.rate_per_second_per_host)),
                Cell::from(format_value(data.current_active_count)),
                Cell::from(format_value(data.current_queue_size)).style(queue_style),
                Cell::from(format_value(data.current_pool_size)),
                Cell::from(format_value(data.rolling_max_active_threads)),
                Cell::from(format_count(data.threads_executed)),
                Cell::from(format_value(data.queue_rejection_threshold)),
                Cell::from(format_value(data.reporting_hosts)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(1),
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(5),
    ];

    let count = app.dashboard.thread_pool_count();
    let selected = app.selected_pool_index.min(count.saturating_sub(1));
    let position_info = if count > 0 {
        format!(" [{}/{}]", selected + 1, count)
    } else {
        String::new()
    };

    let title = format!(
        " Thread Pools ({}) [s:sort {}]{} ",
        count,
        app.dashboard.thread_pool_sort().label(),
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

fn format_header(name: &str, mode: ThreadPoolSort, app: &App) -> Span<'static> {
    let sort = app.dashboard.thread_pool_sort();
    if sort.mode() == mode {
        Span::raw(format!("{}{}", name, sort.direction().arrow()))
    } else {
        Span::raw(name.to_string())
    }
}
