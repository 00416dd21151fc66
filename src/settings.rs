//! Layered runtime settings.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `HYSTRIX_WATCH_*` environment variables. Command line flags are applied
//! on top by the binary.
//!
//! ```toml
//! file = "/var/run/hystrix.json"
//! refresh_secs = 2
//! log_file = "/tmp/hystrix-watch.log"
//! log_level = "debug"
//! circuit_sort = "error-then-volume"
//! thread_pool_sort = "volume"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

use crate::data::{CircuitSort, ThreadPoolSort};

/// Prefix for environment overrides, e.g. `HYSTRIX_WATCH_REFRESH_SECS`.
pub const ENV_PREFIX: &str = "HYSTRIX_WATCH";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid settings: {0}")]
    Config(#[from] config::ConfigError),

    #[error("refresh_secs must be at least 1")]
    InvalidRefresh,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Metrics document to poll.
    pub file: PathBuf,
    pub refresh_secs: u64,
    /// Tracing output goes here; without it nothing is logged.
    pub log_file: Option<PathBuf>,
    pub log_level: String,
    pub circuit_sort: CircuitSort,
    pub thread_pool_sort: ThreadPoolSort,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("hystrix.json"),
            refresh_secs: 1,
            log_file: None,
            log_level: "info".to_string(),
            circuit_sort: CircuitSort::default(),
            thread_pool_sort: ThreadPoolSort::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                return Err(SettingsError::NotFound(path.to_path_buf()));
            }
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()?;

        if settings.refresh_secs == 0 {
            return Err(SettingsError::InvalidRefresh);
        }
        Ok(settings)
    }
}
