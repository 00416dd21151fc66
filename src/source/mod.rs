//! Data source abstraction for receiving metric snapshots.
//!
//! This module provides a trait-based abstraction for receiving metrics
//! documents from a polled file or an in-memory channel.

mod channel;
mod file;
mod snapshot;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use snapshot::{get_metric_value, MetricMap, MetricRecord, MetricSnapshot, MetricValue};

use std::fmt::Debug;

/// Trait for receiving metric snapshots from various sources.
///
/// # Example
///
/// ```
/// use hystrix_watch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("hystrix.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} metrics", snapshot.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<MetricSnapshot>;

    /// Make the next [`poll`](DataSource::poll) return the current data even
    /// if nothing changed.
    fn invalidate(&mut self) {}

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns the error message if the last poll failed.
    fn error(&self) -> Option<&str>;
}
