//! Thread pool view-model computation.

use std::time::Instant;

use serde::Serialize;

use super::format::round1;
use super::scale::{Indicator, THREAD_POOL_RATE_DOMAIN};
use crate::source::{get_metric_value, MetricSnapshot};

/// Derived statistics for one thread pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThreadPoolData {
    pub reporting_hosts: f64,
    pub queue_rejection_threshold: f64,
    /// Rolling window in seconds, averaged over the reporting hosts.
    pub window_seconds: f64,
    pub threads_executed: f64,
    pub rate_per_second: f64,
    pub rate_per_second_per_host: f64,
    pub current_active_count: f64,
    pub rolling_max_active_threads: f64,
    pub current_queue_size: f64,
    pub current_pool_size: f64,
    /// Queue depth per host. Pools have no error rate; queueing stands in
    /// for it when colouring.
    pub error_percentage: f64,
}

impl ThreadPoolData {
    pub fn from_snapshot(snapshot: &MetricSnapshot, prefix: &str) -> Self {
        let value = |name: &str| get_metric_value(snapshot, &format!("{prefix}.{name}"), 0.0);

        let reporting_hosts = value("reportingHosts");
        let queue_rejection_threshold =
            round1(value("propertyValue_queueSizeRejectionThreshold") / reporting_hosts);
        // Unlike circuits the window is divided by the host count first.
        let window_seconds = round1(
            value("propertyValue_metricsRollingStatisticalWindowInMilliseconds") / reporting_hosts,
        ) / 1000.0;

        let threads_executed = value("rollingCountThreadsExecuted").max(0.0);
        let rate = threads_executed / window_seconds;
        let current_queue_size = value("currentQueueSize");

        Self {
            reporting_hosts,
            queue_rejection_threshold,
            window_seconds,
            threads_executed,
            rate_per_second: round1(rate),
            rate_per_second_per_host: round1(rate / reporting_hosts),
            current_active_count: value("currentActiveCount"),
            rolling_max_active_threads: value("rollingMaxActiveThreads"),
            current_queue_size,
            current_pool_size: value("currentPoolSize"),
            error_percentage: current_queue_size / reporting_hosts,
        }
    }
}

/// A discovered thread pool.
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    service: String,
    prefix: String,
    data: ThreadPoolData,
    indicator: Indicator,
    initialized: bool,
}

impl ThreadPoolConfig {
    pub fn new(service: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            prefix: prefix.into(),
            data: ThreadPoolData::default(),
            indicator: Indicator::default(),
            initialized: false,
        }
    }

    /// Recompute derived state. Pools keep no trend, so `_now` is unused.
    pub fn refresh(&mut self, snapshot: &MetricSnapshot, _now: Instant) {
        self.data = ThreadPoolData::from_snapshot(snapshot, &self.prefix);
        self.initialized = true;
        self.indicator = Indicator::encode(
            self.data.rate_per_second_per_host,
            self.data.error_percentage,
            THREAD_POOL_RATE_DOMAIN,
        );
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn data(&self) -> &ThreadPoolData {
        &self.data
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "gauge.hystrix.HystrixThreadPool.serviceA";

    fn snapshot(metrics: &[(&str, f64)]) -> MetricSnapshot {
        MetricSnapshot::from_gauges(metrics.iter().map(|(k, v)| (format!("{PREFIX}.{k}"), *v)))
    }

    #[test]
    fn window_is_averaged_over_hosts_before_conversion() {
        let data = ThreadPoolData::from_snapshot(
            &snapshot(&[
                ("propertyValue_metricsRollingStatisticalWindowInMilliseconds", 10_000.0),
                ("reportingHosts", 2.0),
                ("rollingCountThreadsExecuted", 100.0),
            ]),
            PREFIX,
        );
        // 10000 / 2 hosts = 5000 ms, so 5 s rather than the 10 s a circuit
        // with the same window would report.
        assert_eq!(data.window_seconds, 5.0);
        assert_eq!(data.rate_per_second, 20.0);
        assert_eq!(data.rate_per_second_per_host, 10.0);
    }

    #[test]
    fn per_host_fields() {
        let data = ThreadPoolData::from_snapshot(
            &snapshot(&[
                ("reportingHosts", 4.0),
                ("propertyValue_queueSizeRejectionThreshold", 10.0),
                ("currentQueueSize", 6.0),
                ("currentActiveCount", 3.0),
                ("rollingMaxActiveThreads", 8.0),
                ("currentPoolSize", 10.0),
            ]),
            PREFIX,
        );
        assert_eq!(data.queue_rejection_threshold, 2.5);
        assert_eq!(data.error_percentage, 1.5);
        assert_eq!(data.current_active_count, 3.0);
        assert_eq!(data.rolling_max_active_threads, 8.0);
        assert_eq!(data.current_pool_size, 10.0);
    }

    #[test]
    fn no_hosts_yields_unknown_values() {
        let data = ThreadPoolData::from_snapshot(&snapshot(&[]), PREFIX);
        assert!(data.window_seconds.is_nan());
        assert!(data.rate_per_second.is_nan());
        assert!(data.queue_rejection_threshold.is_nan());
        assert!(data.error_percentage.is_nan());
    }

    #[test]
    fn negative_executions_are_clamped() {
        let data = ThreadPoolData::from_snapshot(
            &snapshot(&[("rollingCountThreadsExecuted", -3.0), ("reportingHosts", 1.0)]),
            PREFIX,
        );
        assert_eq!(data.threads_executed, 0.0);
    }

    #[test]
    fn refresh_marks_initialized() {
        let mut pool = ThreadPoolConfig::new("serviceA", PREFIX);
        assert!(!pool.is_initialized());
        pool.refresh(
            &snapshot(&[
                ("propertyValue_metricsRollingStatisticalWindowInMilliseconds", 10_000.0),
                ("reportingHosts", 1.0),
                ("rollingCountThreadsExecuted", 2_000.0),
            ]),
            Instant::now(),
        );
        assert!(pool.is_initialized());
        assert_eq!(pool.service(), "serviceA");
        assert_eq!(pool.data().rate_per_second, 200.0);
        assert!(pool.indicator().radius > 5.0);
    }
}
