//! The dashboard session: discovery, refresh and ordering in one place.

use std::time::Instant;

use serde_json::json;
use tracing::{debug, info};

use super::circuit::{BreakerStatus, CircuitConfig};
use super::key::{classify, CircuitId, Classification, NamingScheme};
use super::registry::Registry;
use super::sort::{self, CircuitSort, SortState, ThreadPoolSort};
use super::thread_pool::ThreadPoolConfig;
use crate::source::MetricSnapshot;

/// What a refresh discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub new_circuits: usize,
    pub new_thread_pools: usize,
}

/// Everything one monitoring session knows: registered entities, the naming
/// scheme it has settled on, and the sort state of each entity class.
///
/// A refresh first classifies every gauge key, registering entities it has
/// not seen, then recomputes every registered entity. Newly registered
/// entities are placed by re-running the active sort after the recompute, so
/// they are ordered by their first real data.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    scheme: NamingScheme,
    registry: Registry,
    circuit_sort: SortState<CircuitSort>,
    thread_pool_sort: SortState<ThreadPoolSort>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given sort modes, each in its default direction.
    pub fn with_sorts(circuit_sort: CircuitSort, thread_pool_sort: ThreadPoolSort) -> Self {
        Self {
            circuit_sort: SortState::new(circuit_sort),
            thread_pool_sort: SortState::new(thread_pool_sort),
            ..Self::default()
        }
    }

    pub fn refresh(&mut self, snapshot: &MetricSnapshot) -> RefreshOutcome {
        self.refresh_at(snapshot, Instant::now())
    }

    /// Refresh with an explicit sample time for the trend buffers.
    pub fn refresh_at(&mut self, snapshot: &MetricSnapshot, now: Instant) -> RefreshOutcome {
        let mut outcome = RefreshOutcome::default();

        for key in snapshot.gauge_keys() {
            match classify(key, snapshot, self.scheme) {
                Classification::Ignore => {}
                Classification::Circuit { id, prefix, scheme } => {
                    if self.registry.circuits.contains(&id) {
                        continue;
                    }
                    info!(circuit = %id, prefix = %prefix, "Registered circuit");
                    self.registry
                        .circuits
                        .register_if_absent(id.clone(), || CircuitConfig::new(id, prefix));
                    outcome.new_circuits += 1;

                    if scheme == NamingScheme::Publisher && self.scheme != scheme {
                        info!("Switching to publisher metric naming");
                        self.scheme = scheme;
                    }
                }
                Classification::ThreadPool { service, prefix } => {
                    if self.registry.thread_pools.contains(&service) {
                        continue;
                    }
                    info!(thread_pool = %service, prefix = %prefix, "Registered thread pool");
                    self.registry
                        .thread_pools
                        .register_if_absent(service.clone(), || {
                            ThreadPoolConfig::new(service, prefix)
                        });
                    outcome.new_thread_pools += 1;
                }
            }
        }

        for circuit in self.registry.circuits.values_mut() {
            circuit.refresh(snapshot, now);
        }
        for pool in self.registry.thread_pools.values_mut() {
            pool.refresh(snapshot, now);
        }

        if outcome.new_circuits > 0 {
            sort::sort_circuits(&mut self.registry.circuits, &self.circuit_sort);
        }
        if outcome.new_thread_pools > 0 {
            sort::sort_thread_pools(&mut self.registry.thread_pools, &self.thread_pool_sort);
        }

        debug!(
            circuits = self.registry.circuits.len(),
            thread_pools = self.registry.thread_pools.len(),
            "Dashboard refreshed"
        );
        outcome
    }

    /// Forget every entity and return to native naming. Sort state survives.
    pub fn clear(&mut self) {
        info!(
            circuits = self.registry.circuits.len(),
            thread_pools = self.registry.thread_pools.len(),
            "Clearing dashboard"
        );
        self.registry.clear_all();
        self.scheme = NamingScheme::default();
    }

    pub fn sort_circuits(&mut self, mode: CircuitSort) {
        self.circuit_sort.request(mode);
        debug!(sort = %self.circuit_sort.label(), "Sorting circuits");
        sort::sort_circuits(&mut self.registry.circuits, &self.circuit_sort);
    }

    pub fn sort_thread_pools(&mut self, mode: ThreadPoolSort) {
        self.thread_pool_sort.request(mode);
        debug!(sort = %self.thread_pool_sort.label(), "Sorting thread pools");
        sort::sort_thread_pools(&mut self.registry.thread_pools, &self.thread_pool_sort);
    }

    pub fn naming_scheme(&self) -> NamingScheme {
        self.scheme
    }

    pub fn circuit_sort(&self) -> SortState<CircuitSort> {
        self.circuit_sort
    }

    pub fn thread_pool_sort(&self) -> SortState<ThreadPoolSort> {
        self.thread_pool_sort
    }

    /// Circuits in display order.
    pub fn circuits(&self) -> impl Iterator<Item = &CircuitConfig> {
        self.registry.circuits.iter()
    }

    /// Thread pools in display order.
    pub fn thread_pools(&self) -> impl Iterator<Item = &ThreadPoolConfig> {
        self.registry.thread_pools.iter()
    }

    pub fn circuit(&self, id: &CircuitId) -> Option<&CircuitConfig> {
        self.registry.circuits.get(id)
    }

    pub fn circuit_count(&self) -> usize {
        self.registry.circuits.len()
    }

    pub fn thread_pool_count(&self) -> usize {
        self.registry.thread_pools.len()
    }

    /// Circuits whose breaker is open on at least one host.
    pub fn open_breaker_count(&self) -> usize {
        self.circuits()
            .filter(|c| {
                matches!(
                    c.data().breaker_status(),
                    BreakerStatus::Open | BreakerStatus::ForcedOpen | BreakerStatus::Mixed
                )
            })
            .count()
    }

    /// Ordered view-models as a JSON document.
    pub fn to_json(&self) -> serde_json::Value {
        let circuits: Vec<serde_json::Value> = self
            .circuits()
            .map(|c| {
                json!({
                    "service": c.id().service,
                    "method": c.id().method,
                    "prefix": c.prefix(),
                    "status": c.data().breaker_status(),
                    "data": c.data(),
                    "indicator": c.indicator(),
                    "trend": c.trend().render_values(),
                })
            })
            .collect();

        let thread_pools: Vec<serde_json::Value> = self
            .thread_pools()
            .map(|p| {
                json!({
                    "service": p.service(),
                    "prefix": p.prefix(),
                    "data": p.data(),
                    "indicator": p.indicator(),
                })
            })
            .collect();

        json!({
            "naming_scheme": self.scheme,
            "circuit_sort": self.circuit_sort,
            "thread_pool_sort": self.thread_pool_sort,
            "circuits": circuits,
            "thread_pools": thread_pools,
        })
    }
}
