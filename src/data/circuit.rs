//! Circuit view-model computation.
//!
//! A circuit is one Hystrix command (service + method). On every snapshot its
//! derived statistics are recomputed from the gauges under its key prefix.

use std::time::Instant;

use serde::Serialize;

use super::format::round1;
use super::history::Trend;
use super::key::CircuitId;
use super::scale::{Indicator, CIRCUIT_RATE_DOMAIN};
use crate::source::{get_metric_value, MetricSnapshot};

/// Rejected request count. Commands isolated by a thread pool report pool
/// rejections; semaphore-isolated ones report semaphore rejections instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Rejected {
    ThreadPool(f64),
    Semaphore(f64),
}

impl Rejected {
    pub fn count(&self) -> f64 {
        match self {
            Rejected::ThreadPool(n) | Rejected::Semaphore(n) => *n,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rejected::ThreadPool(_) => "Threadpool Rejected",
            Rejected::Semaphore(_) => "Semaphore Rejected",
        }
    }
}

impl Default for Rejected {
    fn default() -> Self {
        Rejected::Semaphore(0.0)
    }
}

/// Circuit breaker state as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakerStatus {
    ForcedClosed,
    ForcedOpen,
    Open,
    Closed,
    /// Some reporting hosts have the breaker open, others closed.
    Mixed,
    /// No host reported the breaker state.
    Unreported,
}

impl BreakerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BreakerStatus::ForcedClosed => "Forced Closed",
            BreakerStatus::ForcedOpen => "Forced Open",
            BreakerStatus::Open => "Open",
            BreakerStatus::Closed => "Closed",
            BreakerStatus::Mixed => "Mixed",
            BreakerStatus::Unreported => "-",
        }
    }
}

/// Derived statistics for one circuit.
///
/// Rates divide by the rolling window and by the reporting host count;
/// either can be zero, in which case the rate is NaN or infinite and must be
/// shown as unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CircuitData {
    pub window_seconds: f64,
    pub total_requests: f64,
    pub reporting_hosts: f64,
    /// Host count for display and breaker state; 1 when not reported.
    pub display_hosts: f64,
    pub rate_per_second: f64,
    pub rate_per_second_per_host: f64,
    pub error_percentage: f64,
    /// Sort key where error percentage dominates and volume breaks ties.
    pub error_then_volume: f64,
    pub rolling_count_timeout: f64,
    pub rolling_count_failure: f64,
    pub rolling_count_success: f64,
    pub rolling_count_short_circuited: f64,
    pub rolling_count_bad_requests: f64,
    pub rejected: Rejected,
    pub latency_90: f64,
    pub latency_median: f64,
    pub latency_99: f64,
    pub latency_995: f64,
    pub latency_mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_closed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker_open: Option<f64>,
}

impl CircuitData {
    /// Compute every derived field from the gauges under `prefix`.
    pub fn from_snapshot(snapshot: &MetricSnapshot, prefix: &str) -> Self {
        let metric = |name: &str| format!("{prefix}.{name}");
        let value = |name: &str, default: f64| get_metric_value(snapshot, &metric(name), default);
        let reported = |name: &str| snapshot.gauge(&metric(name));

        let window_seconds =
            value("propertyValue_metricsRollingStatisticalWindowInMilliseconds", 0.0) / 1000.0;
        let total_requests = value("requestCount", 0.0).max(0.0);
        let reporting_hosts = value("reportingHosts", 0.0);
        let display_hosts = value("reportingHosts", 1.0);

        let rate = total_requests / window_seconds;
        let rate_per_second = round1(rate);
        let rate_per_second_per_host = round1(rate / reporting_hosts);

        let error_percentage = value("errorPercentage", 0.0);
        let error_then_volume = if rate_per_second.is_nan() {
            -1.0
        } else {
            error_percentage * 100_000_000.0 + rate_per_second
        };

        let rejected = match reported("rollingCountThreadPoolRejected") {
            Some(n) => Rejected::ThreadPool(n),
            None => Rejected::Semaphore(value("rollingCountSemaphorePoolRejected", 0.0)),
        };

        Self {
            window_seconds,
            total_requests,
            reporting_hosts,
            display_hosts,
            rate_per_second,
            rate_per_second_per_host,
            error_percentage,
            error_then_volume,
            rolling_count_timeout: value("rollingCountTimeout", 0.0),
            rolling_count_failure: value("rollingCountFailure", 0.0),
            rolling_count_success: value("rollingCountSuccess", 0.0),
            rolling_count_short_circuited: value("rollingCountShortCircuited", 0.0),
            rolling_count_bad_requests: value("rollingCountBadRequests", 0.0),
            rejected,
            latency_90: value("90", 0.0),
            latency_median: value("50", 0.0),
            latency_99: value("99", 0.0),
            latency_995: value("99.5", 0.0),
            latency_mean: value("latencyExecute_mean", 0.0),
            force_closed: reported("propertyValue_circuitBreakerForceClosed"),
            force_open: reported("propertyValue_circuitBreakerForceOpen"),
            circuit_breaker_open: reported("isCircuitBreakerOpen"),
        }
    }

    pub fn breaker_status(&self) -> BreakerStatus {
        if self.force_closed == Some(1.0) {
            BreakerStatus::ForcedClosed
        } else if self.force_open == Some(1.0) {
            BreakerStatus::ForcedOpen
        } else {
            match self.circuit_breaker_open {
                None => BreakerStatus::Unreported,
                Some(open) if open == self.display_hosts => BreakerStatus::Open,
                Some(open) if open == 0.0 => BreakerStatus::Closed,
                Some(_) => BreakerStatus::Mixed,
            }
        }
    }
}

/// A discovered circuit and everything the dashboard keeps for it.
#[derive(Debug, Clone)]
pub struct CircuitConfig {
    id: CircuitId,
    prefix: String,
    data: CircuitData,
    trend: Trend,
    indicator: Indicator,
    initialized: bool,
}

impl CircuitConfig {
    pub fn new(id: CircuitId, prefix: impl Into<String>) -> Self {
        Self {
            id,
            prefix: prefix.into(),
            data: CircuitData::default(),
            trend: Trend::new(),
            indicator: Indicator::default(),
            initialized: false,
        }
    }

    /// Recompute derived state from a snapshot taken at `now`.
    pub fn refresh(&mut self, snapshot: &MetricSnapshot, now: Instant) {
        self.data = CircuitData::from_snapshot(snapshot, &self.prefix);
        self.initialized = true;
        self.indicator = Indicator::encode(
            self.data.rate_per_second_per_host,
            self.data.error_percentage,
            CIRCUIT_RATE_DOMAIN,
        );
        self.trend.record(self.data.rate_per_second, now);
    }

    pub fn id(&self) -> &CircuitId {
        &self.id
    }

    /// Gauge key prefix this circuit reads from.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn data(&self) -> &CircuitData {
        &self.data
    }

    pub fn trend(&self) -> &Trend {
        &self.trend
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    /// Whether the circuit has been refreshed at least once.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::scale::Rgb;

    const PREFIX: &str = "gauge.hystrix.HystrixCommand.serviceA.readAuthors";

    fn snapshot(metrics: &[(&str, f64)]) -> MetricSnapshot {
        MetricSnapshot::from_gauges(metrics.iter().map(|(k, v)| (format!("{PREFIX}.{k}"), *v)))
    }

    #[test]
    fn rates_from_requests_window_and_hosts() {
        let data = CircuitData::from_snapshot(
            &snapshot(&[
                ("requestCount", 120.0),
                ("propertyValue_metricsRollingStatisticalWindowInMilliseconds", 10_000.0),
                ("reportingHosts", 2.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.window_seconds, 10.0);
        assert_eq!(data.rate_per_second, 12.0);
        assert_eq!(data.rate_per_second_per_host, 6.0);
        assert_eq!(data.error_then_volume, 12.0);
    }

    #[test]
    fn negative_request_count_is_clamped() {
        let data = CircuitData::from_snapshot(
            &snapshot(&[
                ("requestCount", -5.0),
                ("propertyValue_metricsRollingStatisticalWindowInMilliseconds", 10_000.0),
                ("reportingHosts", 1.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.total_requests, 0.0);
        assert_eq!(data.rate_per_second, 0.0);
    }

    #[test]
    fn zero_window_yields_unknown_rates() {
        let data = CircuitData::from_snapshot(&snapshot(&[]), PREFIX);
        assert!(data.rate_per_second.is_nan());
        assert!(data.rate_per_second_per_host.is_nan());
        assert_eq!(data.error_then_volume, -1.0);

        let busy = CircuitData::from_snapshot(&snapshot(&[("requestCount", 3.0)]), PREFIX);
        assert_eq!(busy.rate_per_second, f64::INFINITY);
    }

    #[test]
    fn zero_hosts_yields_unknown_per_host_rate() {
        let data = CircuitData::from_snapshot(
            &snapshot(&[
                ("requestCount", 10.0),
                ("propertyValue_metricsRollingStatisticalWindowInMilliseconds", 10_000.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.rate_per_second, 1.0);
        assert_eq!(data.rate_per_second_per_host, f64::INFINITY);
    }

    #[test]
    fn error_dominates_error_then_volume() {
        let data = CircuitData::from_snapshot(
            &snapshot(&[
                ("requestCount", 50.0),
                ("propertyValue_metricsRollingStatisticalWindowInMilliseconds", 10_000.0),
                ("errorPercentage", 3.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.error_then_volume, 300_000_005.0);
    }

    #[test]
    fn semaphore_rejections_when_pool_count_absent() {
        let data = CircuitData::from_snapshot(
            &snapshot(&[("rollingCountSemaphorePoolRejected", 5.0)]),
            PREFIX,
        );
        assert_eq!(data.rejected, Rejected::Semaphore(5.0));

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["rejected"]["kind"], "semaphore");
        assert_eq!(json["rejected"]["count"], 5.0);
    }

    #[test]
    fn pool_rejections_win_when_reported() {
        let data = CircuitData::from_snapshot(
            &snapshot(&[
                ("rollingCountThreadPoolRejected", 0.0),
                ("rollingCountSemaphorePoolRejected", 5.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.rejected, Rejected::ThreadPool(0.0));
    }

    #[test]
    fn latency_and_counters() {
        let data = CircuitData::from_snapshot(
            &snapshot(&[
                ("90", 12.0),
                ("50", 4.0),
                ("99", 30.0),
                ("99.5", 41.5),
                ("latencyExecute_mean", 6.25),
                ("rollingCountTimeout", 1.0),
                ("rollingCountFailure", 2.0),
                ("rollingCountSuccess", 97.0),
                ("rollingCountShortCircuited", 3.0),
                ("rollingCountBadRequests", 4.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.latency_90, 12.0);
        assert_eq!(data.latency_median, 4.0);
        assert_eq!(data.latency_99, 30.0);
        assert_eq!(data.latency_995, 41.5);
        assert_eq!(data.latency_mean, 6.25);
        assert_eq!(data.rolling_count_timeout, 1.0);
        assert_eq!(data.rolling_count_failure, 2.0);
        assert_eq!(data.rolling_count_success, 97.0);
        assert_eq!(data.rolling_count_short_circuited, 3.0);
        assert_eq!(data.rolling_count_bad_requests, 4.0);
    }

    #[test]
    fn breaker_flags_absent_unless_reported() {
        let data = CircuitData::from_snapshot(&snapshot(&[]), PREFIX);
        assert_eq!(data.force_closed, None);
        assert_eq!(data.force_open, None);
        assert_eq!(data.circuit_breaker_open, None);
        assert_eq!(data.breaker_status(), BreakerStatus::Unreported);

        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("circuit_breaker_open").is_none());
    }

    #[test]
    fn breaker_reported_as_boolean() {
        let snapshot = MetricSnapshot::default()
            .with_gauge(format!("{PREFIX}.isCircuitBreakerOpen"), false)
            .with_gauge(format!("{PREFIX}.reportingHosts"), 1.0);
        let data = CircuitData::from_snapshot(&snapshot, PREFIX);
        assert_eq!(data.circuit_breaker_open, Some(0.0));
        assert_eq!(data.breaker_status(), BreakerStatus::Closed);
    }

    #[test]
    fn breaker_without_host_count_assumes_one_host() {
        let closed = MetricSnapshot::default()
            .with_gauge(format!("{PREFIX}.isCircuitBreakerOpen"), false);
        let data = CircuitData::from_snapshot(&closed, PREFIX);
        assert_eq!(data.reporting_hosts, 0.0);
        assert_eq!(data.display_hosts, 1.0);
        assert_eq!(data.breaker_status(), BreakerStatus::Closed);

        let open = MetricSnapshot::default()
            .with_gauge(format!("{PREFIX}.isCircuitBreakerOpen"), true);
        let data = CircuitData::from_snapshot(&open, PREFIX);
        assert_eq!(data.breaker_status(), BreakerStatus::Open);
    }

    #[test]
    fn breaker_status_from_open_hosts() {
        let status = |open: f64, hosts: f64| {
            CircuitData::from_snapshot(
                &snapshot(&[("isCircuitBreakerOpen", open), ("reportingHosts", hosts)]),
                PREFIX,
            )
            .breaker_status()
        };
        assert_eq!(status(2.0, 2.0), BreakerStatus::Open);
        assert_eq!(status(0.0, 2.0), BreakerStatus::Closed);
        assert_eq!(status(1.0, 2.0), BreakerStatus::Mixed);
    }

    #[test]
    fn forced_flags_take_precedence() {
        let data = CircuitData::from_snapshot(
            &snapshot(&[
                ("propertyValue_circuitBreakerForceClosed", 1.0),
                ("propertyValue_circuitBreakerForceOpen", 1.0),
                ("isCircuitBreakerOpen", 0.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.breaker_status(), BreakerStatus::ForcedClosed);

        let data = CircuitData::from_snapshot(
            &snapshot(&[
                ("propertyValue_circuitBreakerForceClosed", 0.0),
                ("propertyValue_circuitBreakerForceOpen", 1.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.breaker_status(), BreakerStatus::ForcedOpen);
    }

    #[test]
    fn refresh_updates_state() {
        let mut circuit = CircuitConfig::new(CircuitId::new("serviceA", "readAuthors"), PREFIX);
        assert!(!circuit.is_initialized());

        circuit.refresh(
            &snapshot(&[
                ("requestCount", 120.0),
                ("propertyValue_metricsRollingStatisticalWindowInMilliseconds", 10_000.0),
                ("reportingHosts", 2.0),
                ("errorPercentage", 60.0),
            ]),
            Instant::now(),
        );

        assert!(circuit.is_initialized());
        assert_eq!(circuit.data().rate_per_second, 12.0);
        assert_eq!(circuit.trend().render_values(), Some(vec![12.0]));
        assert_eq!(circuit.indicator().color, Rgb::RED);
        assert!(circuit.indicator().radius > 5.0);
    }

    #[test]
    fn unknown_rates_serialize_as_null() {
        let data = CircuitData::from_snapshot(&snapshot(&[]), PREFIX);
        let json = serde_json::to_value(&data).unwrap();
        assert!(json["rate_per_second"].is_null());
    }
}
