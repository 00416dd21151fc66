//! Display ordering for circuits and thread pools.
//!
//! Each entity class has its own [`SortState`]. Asking for the mode that is
//! already active in its default direction flips the direction; asking for
//! any other mode activates it in its default direction. Repeating a request
//! therefore alternates between the two directions.

use std::cmp::Ordering;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use super::circuit::CircuitConfig;
use super::key::CircuitId;
use super::registry::Section;
use super::thread_pool::ThreadPoolConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    /// Orient an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Asc => "▲",
            Direction::Desc => "▼",
        }
    }
}

/// A sort mode for one entity class.
pub trait SortMode: Copy + PartialEq + Debug {
    /// Direction the mode starts in when first selected.
    fn default_direction(self) -> Direction;

    fn label(self) -> &'static str;

    /// Next mode when cycling through all of them.
    fn next(self) -> Self;
}

/// How circuits are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CircuitSort {
    #[default]
    Alphabetical,
    Volume,
    Error,
    ErrorThenVolume,
    LatencyMean,
    LatencyMedian,
    #[serde(rename = "latency-90")]
    Latency90,
    #[serde(rename = "latency-99")]
    Latency99,
    #[serde(rename = "latency-99.5")]
    Latency995,
}

impl SortMode for CircuitSort {
    fn default_direction(self) -> Direction {
        match self {
            CircuitSort::Alphabetical => Direction::Asc,
            _ => Direction::Desc,
        }
    }

    fn label(self) -> &'static str {
        match self {
            CircuitSort::Alphabetical => "Alphabetical",
            CircuitSort::Volume => "Volume",
            CircuitSort::Error => "Error",
            CircuitSort::ErrorThenVolume => "Error then Volume",
            CircuitSort::LatencyMean => "Mean",
            CircuitSort::LatencyMedian => "Median",
            CircuitSort::Latency90 => "90",
            CircuitSort::Latency99 => "99",
            CircuitSort::Latency995 => "99.5",
        }
    }

    fn next(self) -> Self {
        match self {
            CircuitSort::Alphabetical => CircuitSort::Volume,
            CircuitSort::Volume => CircuitSort::Error,
            CircuitSort::Error => CircuitSort::ErrorThenVolume,
            CircuitSort::ErrorThenVolume => CircuitSort::LatencyMean,
            CircuitSort::LatencyMean => CircuitSort::LatencyMedian,
            CircuitSort::LatencyMedian => CircuitSort::Latency90,
            CircuitSort::Latency90 => CircuitSort::Latency99,
            CircuitSort::Latency99 => CircuitSort::Latency995,
            CircuitSort::Latency995 => CircuitSort::Alphabetical,
        }
    }
}

/// How thread pools are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadPoolSort {
    #[default]
    Alphabetical,
    Volume,
}

impl SortMode for ThreadPoolSort {
    fn default_direction(self) -> Direction {
        match self {
            ThreadPoolSort::Alphabetical => Direction::Asc,
            ThreadPoolSort::Volume => Direction::Desc,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ThreadPoolSort::Alphabetical => "Alphabetical",
            ThreadPoolSort::Volume => "Volume",
        }
    }

    fn next(self) -> Self {
        match self {
            ThreadPoolSort::Alphabetical => ThreadPoolSort::Volume,
            ThreadPoolSort::Volume => ThreadPoolSort::Alphabetical,
        }
    }
}

/// Active mode and direction for one entity class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState<M> {
    mode: M,
    direction: Direction,
}

impl<M: SortMode + Default> Default for SortState<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: SortMode> SortState<M> {
    /// Start in `mode` with its default direction.
    pub fn new(mode: M) -> Self {
        Self {
            mode,
            direction: mode.default_direction(),
        }
    }

    pub fn mode(&self) -> M {
        self.mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Handle a user request for `mode`.
    pub fn request(&mut self, mode: M) {
        if self.mode == mode && self.direction == mode.default_direction() {
            self.direction = self.direction.reverse();
        } else {
            self.mode = mode;
            self.direction = mode.default_direction();
        }
    }

    /// e.g. `Volume ▼`
    pub fn label(&self) -> String {
        format!("{} {}", self.mode.label(), self.direction.arrow())
    }
}

/// Compare two keys where NaN sorts below every number.
pub fn compare_values(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Alphabetical key for circuits: method first, then service.
fn compare_circuit_names(a: &CircuitId, b: &CircuitId) -> Ordering {
    a.method.cmp(&b.method).then_with(|| a.service.cmp(&b.service))
}

fn circuit_key(circuit: &CircuitConfig, mode: CircuitSort) -> f64 {
    let data = circuit.data();
    match mode {
        CircuitSort::Alphabetical => 0.0,
        CircuitSort::Volume => data.rate_per_second,
        CircuitSort::Error => data.error_percentage,
        CircuitSort::ErrorThenVolume => data.error_then_volume,
        CircuitSort::LatencyMean => data.latency_mean,
        CircuitSort::LatencyMedian => data.latency_median,
        CircuitSort::Latency90 => data.latency_90,
        CircuitSort::Latency99 => data.latency_99,
        CircuitSort::Latency995 => data.latency_995,
    }
}

pub fn compare_circuits(
    a: &CircuitConfig,
    b: &CircuitConfig,
    state: &SortState<CircuitSort>,
) -> Ordering {
    let names = compare_circuit_names(a.id(), b.id());
    let primary = match state.mode() {
        CircuitSort::Alphabetical => names,
        mode => compare_values(circuit_key(a, mode), circuit_key(b, mode)),
    };
    // Name tiebreak stays ascending whatever the direction.
    state.direction().apply(primary).then(names)
}

pub fn compare_thread_pools(
    a: &ThreadPoolConfig,
    b: &ThreadPoolConfig,
    state: &SortState<ThreadPoolSort>,
) -> Ordering {
    let names = a.service().cmp(b.service());
    let primary = match state.mode() {
        ThreadPoolSort::Alphabetical => names,
        ThreadPoolSort::Volume => {
            compare_values(a.data().rate_per_second, b.data().rate_per_second)
        }
    };
    state.direction().apply(primary).then(names)
}

/// Reorder circuits under `state`.
pub fn sort_circuits(
    circuits: &mut Section<CircuitId, CircuitConfig>,
    state: &SortState<CircuitSort>,
) {
    circuits.sort_by(|a, b| compare_circuits(a, b, state));
}

/// Reorder thread pools under `state`.
pub fn sort_thread_pools(
    pools: &mut Section<String, ThreadPoolConfig>,
    state: &SortState<ThreadPoolSort>,
) {
    pools.sort_by(|a, b| compare_thread_pools(a, b, state));
}
