//! # hystrix-watch
//!
//! A terminal dashboard and library for Hystrix circuit breaker metrics.
//!
//! The crate reads flat, dotted-key metric documents as published by a
//! Dropwizard/Codahale metrics servlet, discovers the Hystrix commands
//! ("circuits") and thread pools they describe, derives rates, error
//! signals and latency figures for each, and keeps them in a sortable
//! order for display.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(dashboard)    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── FileSource | ChannelSource                  │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation and key actions
//! - **[`source`]**: The [`MetricSnapshot`] document and the [`DataSource`]
//!   trait with file polling and channel implementations
//! - **[`data`]**: Key classification, per-entity aggregation, trend history,
//!   ordering, and the [`Dashboard`] that ties them together
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`settings`]**: Layered configuration
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a metrics document refreshed by another process
//! hystrix-watch --file hystrix.json
//!
//! # One-shot JSON export of every circuit and thread pool
//! hystrix-watch --file hystrix.json --export dashboard.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use hystrix_watch::{CircuitSort, Dashboard, MetricSnapshot};
//!
//! let snapshot = MetricSnapshot::from_gauges([
//!     ("gauge.hystrix.HystrixCommand.books.list.requestCount", 120.0),
//!     ("gauge.hystrix.HystrixCommand.books.list.reportingHosts", 2.0),
//!     (
//!         "gauge.hystrix.HystrixCommand.books.list.propertyValue_metricsRollingStatisticalWindowInMilliseconds",
//!         10000.0,
//!     ),
//! ]);
//!
//! let mut dashboard = Dashboard::new();
//! dashboard.refresh(&snapshot);
//! dashboard.sort_circuits(CircuitSort::Volume);
//!
//! let circuit = dashboard.circuits().next().unwrap();
//! assert_eq!(circuit.data().rate_per_second, 12.0);
//! assert_eq!(circuit.data().rate_per_second_per_host, 6.0);
//! ```
//!
//! ### With a channel source
//!
//! ```
//! use hystrix_watch::{App, ChannelSource, Dashboard};
//!
//! let (tx, source) = ChannelSource::create("in-process");
//! let app = App::new(Box::new(source), Dashboard::new());
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use data::{
    BreakerStatus, CircuitConfig, CircuitData, CircuitId, CircuitSort, Dashboard, NamingScheme,
    ThreadPoolConfig, ThreadPoolData, ThreadPoolSort,
};
pub use settings::{Settings, SettingsError};
pub use source::{ChannelSource, DataSource, FileSource, MetricSnapshot};
