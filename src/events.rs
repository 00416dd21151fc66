use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};
use crate::data::CircuitSort;

/// File written by the export key.
pub const EXPORT_FILE: &str = "hystrix_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow scrolling through circuits while overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::PageUp => app.select_prev_n(10),
            KeyCode::PageDown => app.select_next_n(10),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::Char('1') => app.set_view(View::Circuits),
        KeyCode::Char('2') => app.set_view(View::ThreadPools),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc => app.close_overlay(),

        // Sorting
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('S') => app.repeat_sort(),
        KeyCode::Char('a') => app.request_sort(CircuitSort::Alphabetical),
        KeyCode::Char('v') => app.request_sort(CircuitSort::Volume),
        KeyCode::Char('e') => app.request_sort(CircuitSort::Error),
        KeyCode::Char('t') => app.request_sort(CircuitSort::ErrorThenVolume),
        KeyCode::Char('m') => app.request_sort(CircuitSort::LatencyMean),
        KeyCode::Char('d') => app.request_sort(CircuitSort::LatencyMedian),
        KeyCode::Char('9') => app.request_sort(CircuitSort::Latency90),
        KeyCode::Char('p') => app.request_sort(CircuitSort::Latency99),
        KeyCode::Char('P') => app.request_sort(CircuitSort::Latency995),

        KeyCode::Char('C') => app.clear_dashboard(),

        KeyCode::Char('r') => {
            let _ = app.force_reload();
        }

        KeyCode::Char('x') => app.export_with_status(&PathBuf::from(EXPORT_FILE)),

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        // Click to select
        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            // Rows after header, tabs and the table header are items
            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;
                let count = match app.current_view {
                    View::Circuits => app.dashboard.circuit_count(),
                    View::ThreadPools => app.dashboard.thread_pool_count(),
                };
                if item_row < count {
                    match app.current_view {
                        View::Circuits => app.selected_circuit_index = item_row,
                        View::ThreadPools => app.selected_pool_index = item_row,
                    }
                }
            }

            // Tab clicks (row 1, after header)
            if clicked_row == 1 {
                // Approximate tab positions: Circuits (0-13), Thread Pools (14-30)
                if mouse.column < 14 {
                    app.set_view(View::Circuits);
                } else if mouse.column < 31 {
                    app.set_view(View::ThreadPools);
                }
            }
        }

        MouseEventKind::Down(MouseButton::Right) => app.close_overlay(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dashboard, Direction};
    use crate::source::{ChannelSource, MetricSnapshot};

    fn press(app: &mut App, c: char) {
        handle_key_event(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    fn loaded_app() -> (tokio::sync::watch::Sender<MetricSnapshot>, App) {
        let (tx, source) = ChannelSource::create("test");
        let mut snapshot = MetricSnapshot::default();
        for method in ["one", "two"] {
            snapshot = snapshot.with_gauge(
                format!("gauge.hystrix.HystrixCommand.svc.{method}.requestCount"),
                1.0,
            );
        }
        tx.send(snapshot).unwrap();
        let mut app = App::new(Box::new(source), Dashboard::new());
        app.reload_data().unwrap();
        (tx, app)
    }

    #[test]
    fn sort_keys() {
        let (_tx, mut app) = loaded_app();
        press(&mut app, 'e');
        assert_eq!(app.dashboard.circuit_sort().mode(), CircuitSort::Error);
        press(&mut app, 'S');
        assert_eq!(app.dashboard.circuit_sort().direction(), Direction::Asc);
        press(&mut app, 'P');
        assert_eq!(app.dashboard.circuit_sort().mode(), CircuitSort::Latency995);
        press(&mut app, '9');
        assert_eq!(app.dashboard.circuit_sort().mode(), CircuitSort::Latency90);
        press(&mut app, 's');
        assert_eq!(app.dashboard.circuit_sort().mode(), CircuitSort::Latency99);
    }

    #[test]
    fn help_swallows_next_key() {
        let (_tx, mut app) = loaded_app();
        press(&mut app, '?');
        assert!(app.show_help);
        press(&mut app, 'q');
        assert!(!app.show_help);
        assert!(app.running);
        press(&mut app, 'q');
        assert!(!app.running);
    }

    #[test]
    fn overlay_navigation() {
        let (_tx, mut app) = loaded_app();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(app.show_detail_overlay);
        press(&mut app, 'j');
        assert_eq!(app.selected_circuit_index, 1);
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn view_and_clear_keys() {
        let (_tx, mut app) = loaded_app();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.current_view, View::ThreadPools);
        press(&mut app, '1');
        assert_eq!(app.current_view, View::Circuits);

        press(&mut app, 'C');
        assert_eq!(app.dashboard.circuit_count(), 0);
        press(&mut app, 'r');
        assert_eq!(app.dashboard.circuit_count(), 2);
    }
}
