//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use crate::data::{
    CircuitConfig, CircuitSort, Dashboard, SortMode, ThreadPoolConfig, ThreadPoolSort,
};
use crate::source::DataSource;
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
///
/// Circuit detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Circuits,
    ThreadPools,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Circuits => View::ThreadPools,
            View::ThreadPools => View::Circuits,
        }
    }

    /// Cycle to the previous view. With two views this is the same as
    /// [`View::next`].
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Circuits => "Circuits",
            View::ThreadPools => "Thread Pools",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub dashboard: Dashboard,
    pub last_updated: Option<Instant>,
    pub load_error: Option<String>,

    // Navigation state
    pub selected_circuit_index: usize,
    pub selected_pool_index: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source` into `dashboard`.
    pub fn new(source: Box<dyn DataSource>, dashboard: Dashboard) -> Self {
        Self {
            running: true,
            current_view: View::Circuits,
            show_help: false,
            show_detail_overlay: false,
            source,
            dashboard,
            last_updated: None,
            load_error: None,
            selected_circuit_index: 0,
            selected_pool_index: 0,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Poll the data source and refresh the dashboard with any new snapshot.
    ///
    /// Returns Ok(true) if new data was received.
    pub fn reload_data(&mut self) -> Result<bool> {
        let snapshot = self.source.poll();
        self.load_error = self.source.error().map(str::to_string);

        let Some(snapshot) = snapshot else {
            return Ok(false);
        };

        let outcome = self.dashboard.refresh(&snapshot);
        if outcome.new_circuits > 0 || outcome.new_thread_pools > 0 {
            info!(
                new_circuits = outcome.new_circuits,
                new_thread_pools = outcome.new_thread_pools,
                "Discovered new entities"
            );
        }
        self.last_updated = Some(Instant::now());
        self.clamp_selection();
        Ok(true)
    }

    /// Re-read the source even if it reports no change.
    pub fn force_reload(&mut self) -> Result<bool> {
        self.source.invalidate();
        self.reload_data()
    }

    fn clamp_selection(&mut self) {
        let circuits = self.dashboard.circuit_count();
        let pools = self.dashboard.thread_pool_count();
        self.selected_circuit_index = self.selected_circuit_index.min(circuits.saturating_sub(1));
        self.selected_pool_index = self.selected_pool_index.min(pools.saturating_sub(1));
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
        self.show_detail_overlay = false;
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
        self.show_detail_overlay = false;
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.show_detail_overlay = false;
    }

    fn item_count(&self) -> usize {
        match self.current_view {
            View::Circuits => self.dashboard.circuit_count(),
            View::ThreadPools => self.dashboard.thread_pool_count(),
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Circuits => &mut self.selected_circuit_index,
            View::ThreadPools => &mut self.selected_pool_index,
        }
    }

    /// Index of the selected row in the current view.
    pub fn selected_index(&self) -> usize {
        match self.current_view {
            View::Circuits => self.selected_circuit_index,
            View::ThreadPools => self.selected_pool_index,
        }
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.item_count().saturating_sub(1);
        let selected = self.selection_mut();
        *selected = (*selected + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let selected = self.selection_mut();
        *selected = selected.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.selection_mut() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.item_count().saturating_sub(1);
        *self.selection_mut() = last;
    }

    /// The circuit under the cursor, in display order.
    pub fn selected_circuit(&self) -> Option<&CircuitConfig> {
        self.dashboard.circuits().nth(self.selected_circuit_index)
    }

    /// The thread pool under the cursor, in display order.
    pub fn selected_thread_pool(&self) -> Option<&ThreadPoolConfig> {
        self.dashboard.thread_pools().nth(self.selected_pool_index)
    }

    /// Open the detail overlay for the selected circuit.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Circuits && self.selected_circuit().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Switch the current view to its next sort mode.
    pub fn cycle_sort(&mut self) {
        match self.current_view {
            View::Circuits => {
                let next = self.dashboard.circuit_sort().mode().next();
                self.dashboard.sort_circuits(next);
            }
            View::ThreadPools => {
                let next = self.dashboard.thread_pool_sort().mode().next();
                self.dashboard.sort_thread_pools(next);
            }
        }
    }

    /// Request the active sort mode again, flipping its direction.
    pub fn repeat_sort(&mut self) {
        match self.current_view {
            View::Circuits => {
                let mode = self.dashboard.circuit_sort().mode();
                self.dashboard.sort_circuits(mode);
            }
            View::ThreadPools => {
                let mode = self.dashboard.thread_pool_sort().mode();
                self.dashboard.sort_thread_pools(mode);
            }
        }
    }

    /// Request a circuit sort mode. Thread pools only know alphabetical and
    /// volume ordering, so other modes are ignored on that view.
    pub fn request_sort(&mut self, mode: CircuitSort) {
        match self.current_view {
            View::Circuits => self.dashboard.sort_circuits(mode),
            View::ThreadPools => match mode {
                CircuitSort::Alphabetical => {
                    self.dashboard.sort_thread_pools(ThreadPoolSort::Alphabetical)
                }
                CircuitSort::Volume => self.dashboard.sort_thread_pools(ThreadPoolSort::Volume),
                _ => {}
            },
        }
    }

    /// Label of the active sort for the current view, e.g. `Volume ▼`.
    pub fn sort_label(&self) -> String {
        match self.current_view {
            View::Circuits => self.dashboard.circuit_sort().label(),
            View::ThreadPools => self.dashboard.thread_pool_sort().label(),
        }
    }

    /// Forget every circuit and thread pool; the next poll rediscovers them.
    pub fn clear_dashboard(&mut self) {
        self.dashboard.clear();
        self.selected_circuit_index = 0;
        self.selected_pool_index = 0;
        self.show_detail_overlay = false;
        self.source.invalidate();
        self.set_status_message("Dashboard cleared".to_string());
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the ordered view-models to a JSON file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if self.last_updated.is_none() {
            anyhow::bail!("No data to export");
        }
        let json = serde_json::to_string_pretty(&self.dashboard.to_json())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Export and report the outcome in the status bar.
    pub fn export_with_status(&mut self, path: &Path) {
        match self.export_state(path) {
            Ok(()) => {
                info!(path = %path.display(), "Exported dashboard");
                self.set_status_message(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                self.set_status_message(format!("Export failed: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Direction;
    use crate::source::{ChannelSource, MetricSnapshot};
    use tokio::sync::watch;

    fn snapshot() -> MetricSnapshot {
        let mut snapshot = MetricSnapshot::default();
        for (method, requests) in [("alpha", 10.0), ("beta", 30.0), ("gamma", 20.0)] {
            let prefix = format!("gauge.hystrix.HystrixCommand.svc.{method}");
            snapshot = snapshot
                .with_gauge(format!("{prefix}.requestCount"), requests)
                .with_gauge(
                    format!("{prefix}.propertyValue_metricsRollingStatisticalWindowInMilliseconds"),
                    10_000.0,
                )
                .with_gauge(format!("{prefix}.reportingHosts"), 1.0);
        }
        snapshot.with_gauge("gauge.hystrix.HystrixThreadPool.svc.currentQueueSize", 0.0)
    }

    fn app() -> (watch::Sender<MetricSnapshot>, App) {
        let (tx, source) = ChannelSource::create("test");
        tx.send(snapshot()).unwrap();
        let mut app = App::new(Box::new(source), Dashboard::new());
        assert!(app.reload_data().unwrap());
        (tx, app)
    }

    fn methods(app: &App) -> Vec<String> {
        app.dashboard.circuits().map(|c| c.id().method.clone()).collect()
    }

    #[test]
    fn reload_refreshes_dashboard() {
        let (_tx, mut app) = app();
        assert_eq!(app.dashboard.circuit_count(), 3);
        assert_eq!(app.dashboard.thread_pool_count(), 1);
        assert!(app.last_updated.is_some());
        assert!(!app.reload_data().unwrap());
    }

    #[test]
    fn selection_is_clamped_per_view() {
        let (_tx, mut app) = app();
        app.select_last();
        assert_eq!(app.selected_circuit_index, 2);
        app.select_next_n(10);
        assert_eq!(app.selected_circuit_index, 2);
        assert_eq!(app.selected_circuit().unwrap().id().method, "gamma");

        app.next_view();
        assert_eq!(app.current_view, View::ThreadPools);
        app.select_next();
        assert_eq!(app.selected_pool_index, 0);
        app.prev_view();
        assert_eq!(app.selected_index(), 2);
    }

    #[test]
    fn sort_keys_reorder_circuits() {
        let (_tx, mut app) = app();
        app.request_sort(CircuitSort::Volume);
        assert_eq!(methods(&app), vec!["beta", "gamma", "alpha"]);
        app.repeat_sort();
        assert_eq!(methods(&app), vec!["alpha", "gamma", "beta"]);
        assert_eq!(app.sort_label(), "Volume ▲");

        app.cycle_sort();
        assert_eq!(app.dashboard.circuit_sort().mode(), CircuitSort::Error);
    }

    #[test]
    fn thread_pool_view_ignores_latency_sorts() {
        let (_tx, mut app) = app();
        app.set_view(View::ThreadPools);
        app.request_sort(CircuitSort::Latency99);
        assert_eq!(app.dashboard.thread_pool_sort().mode(), ThreadPoolSort::Alphabetical);
        app.request_sort(CircuitSort::Volume);
        assert_eq!(app.dashboard.thread_pool_sort().mode(), ThreadPoolSort::Volume);
        assert_eq!(app.dashboard.thread_pool_sort().direction(), Direction::Desc);
    }

    #[test]
    fn clear_then_reload_rediscovers() {
        let (_tx, mut app) = app();
        app.clear_dashboard();
        assert_eq!(app.dashboard.circuit_count(), 0);
        assert_eq!(app.get_status_message(), Some("Dashboard cleared"));

        assert!(app.reload_data().unwrap());
        assert_eq!(app.dashboard.circuit_count(), 3);
    }

    #[test]
    fn detail_overlay_only_for_circuits() {
        let (_tx, mut app) = app();
        app.enter_detail();
        assert!(app.show_detail_overlay);
        app.close_overlay();

        app.set_view(View::ThreadPools);
        app.enter_detail();
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn export_writes_json() {
        let (_tx, app) = app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["circuits"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn export_without_data_fails() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), Dashboard::new());
        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_state(&dir.path().join("x.json")).is_err());
    }
}
