//! Data models and processing for Hystrix metric snapshots.
//!
//! This module turns raw metric snapshots into per-entity view-models that
//! the UI renders.
//!
//! ## Submodules
//!
//! - [`key`]: Classification of gauge keys into circuits and thread pools
//! - [`circuit`] / [`thread_pool`]: Derived statistics per entity
//! - [`history`]: Rolling rate history for sparklines
//! - [`scale`]: Circle position, size and colour encodings
//! - [`registry`]: Entity storage with display order
//! - [`sort`]: Sort modes and ordering
//! - [`dashboard`]: The session object tying the above together
//!
//! ## Data Flow
//!
//! ```text
//! MetricSnapshot (raw JSON)
//!        │
//!        ▼
//! Dashboard::refresh()
//!        │
//!        ├──▶ key::classify() ──▶ Registry (new circuits / thread pools)
//!        │
//!        ├──▶ CircuitConfig::refresh() / ThreadPoolConfig::refresh()
//!        │
//!        └──▶ sort (only when something new was registered)
//! ```

pub mod circuit;
pub mod dashboard;
pub mod format;
pub mod history;
pub mod key;
pub mod registry;
pub mod scale;
pub mod sort;
pub mod thread_pool;

pub use circuit::{BreakerStatus, CircuitConfig, CircuitData, Rejected};
pub use dashboard::{Dashboard, RefreshOutcome};
pub use history::Trend;
pub use key::{CircuitId, Classification, NamingScheme};
pub use registry::Registry;
pub use scale::{Indicator, Rgb};
pub use sort::{CircuitSort, Direction, SortMode, SortState, ThreadPoolSort};
pub use thread_pool::{ThreadPoolConfig, ThreadPoolData};
