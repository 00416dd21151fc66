//! File-based data source.
//!
//! Polls a JSON metrics document on disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::warn;

use super::{DataSource, MetricSnapshot};

/// A data source that reads metric snapshots from a JSON file.
///
/// Point it at a file periodically refreshed from a metrics servlet
/// (for example `curl -s host/metrics > hystrix.json`).
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file once, regardless of its modification time.
    pub fn load(&mut self) -> Option<MetricSnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(snapshot) => {
                    self.last_error = None;
                    Some(snapshot)
                }
                Err(e) => {
                    self.record_error(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                self.record_error(format!("Read error: {}", e));
                None
            }
        }
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn record_error(&mut self, message: String) {
        if self.last_error.as_deref() != Some(message.as_str()) {
            warn!(path = %self.path.display(), error = %message, "Failed to load metrics file");
        }
        self.last_error = Some(message);
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<MetricSnapshot> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,
            // File disappeared, keep showing the last data
            (Some(_), None) => false,
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        let snapshot = self.load()?;
        self.last_modified = current_modified;
        Some(snapshot)
    }

    fn invalidate(&mut self) {
        self.last_modified = None;
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
