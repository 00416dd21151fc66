//! Channel-based data source.
//!
//! Receives metric snapshots via a tokio watch channel, for embedding the
//! dashboard in a process that already fetches or produces metrics.

use tokio::sync::watch;

use super::{DataSource, MetricSnapshot};

/// A data source that receives metric snapshots via a channel.
///
/// The producer (a poller task, a test harness) sends snapshots through the
/// channel and this source hands the latest one to the dashboard.
///
/// # Example
///
/// ```
/// use hystrix_watch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("in-process");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<MetricSnapshot>,
    description: String,
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// `source_description` names where snapshots come from, e.g.
    /// `http://host:8080/metrics`.
    pub fn new(receiver: watch::Receiver<MetricSnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    pub fn create(source_description: &str) -> (watch::Sender<MetricSnapshot>, Self) {
        let (tx, rx) = watch::channel(MetricSnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<MetricSnapshot> {
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            Some(self.receiver.borrow_and_update().clone())
        } else {
            None
        }
    }

    fn invalidate(&mut self) {
        self.receiver.mark_changed();
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}
