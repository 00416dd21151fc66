//! Metric key classification.
//!
//! Hystrix metrics reach the dashboard under one of two naming conventions:
//!
//! ```text
//! native     gauge.hystrix.HystrixCommand.<service>.<method>.<metric>
//!            gauge.hystrix.HystrixThreadPool.<service>.<metric>
//! publisher  <service>.<method>.<metric>
//! ```
//!
//! The publisher form is what `hystrix-codahale-metrics-publisher` emits. A
//! document carrying publisher keys usually carries native ones too, so a
//! native key is cross-checked against its publisher sibling before the
//! entity's metric prefix is chosen.

use std::fmt;

use serde::Serialize;

use crate::source::MetricSnapshot;

/// Literal prefix of native circuit keys.
pub const COMMAND_PREFIX: &str = "gauge.hystrix.HystrixCommand";
/// Literal prefix of native thread pool keys.
pub const THREAD_POOL_PREFIX: &str = "gauge.hystrix.HystrixThreadPool";
/// Metric probed to confirm a three-token key belongs to a publisher circuit.
pub const PUBLISHER_PROBE_METRIC: &str = "countShortCircuited";

const NATIVE_COMMAND_TOKENS: usize = 6;
const PUBLISHER_COMMAND_TOKENS: usize = 3;
const NATIVE_THREAD_POOL_TOKENS: usize = 5;

/// Which metric naming convention the dashboard is reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    #[default]
    Native,
    Publisher,
}

impl NamingScheme {
    pub fn label(&self) -> &'static str {
        match self {
            NamingScheme::Native => "native",
            NamingScheme::Publisher => "publisher",
        }
    }
}

/// Identity of a circuit: the command's service and method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CircuitId {
    pub service: String,
    pub method: String,
}

impl CircuitId {
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.method)
    }
}

/// Outcome of classifying one gauge key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Not a Hystrix key, or a malformed one.
    Ignore,
    /// A circuit metric. `scheme` is the convention the key was resolved
    /// under; registering a `Publisher` circuit locks the dashboard onto it.
    Circuit {
        id: CircuitId,
        prefix: String,
        scheme: NamingScheme,
    },
    /// A thread pool metric.
    ThreadPool { service: String, prefix: String },
}

/// Classify a gauge key against the snapshot it came from.
pub fn classify(key: &str, snapshot: &MetricSnapshot, scheme: NamingScheme) -> Classification {
    match classify_circuit(key, snapshot, scheme) {
        Classification::Ignore => classify_thread_pool(key),
        found => found,
    }
}

/// Circuit half of [`classify`].
pub fn classify_circuit(
    key: &str,
    snapshot: &MetricSnapshot,
    scheme: NamingScheme,
) -> Classification {
    let tokens: Vec<&str> = key.split('.').collect();

    if scheme == NamingScheme::Native
        && key.starts_with(COMMAND_PREFIX)
        && tokens.len() == NATIVE_COMMAND_TOKENS
    {
        let (service, method, metric) = (tokens[3], tokens[4], tokens[5]);
        let sibling = format!("{service}.{method}.{metric}");
        let (prefix, scheme) = if snapshot.has_gauge(&sibling) {
            (format!("{service}.{method}"), NamingScheme::Publisher)
        } else {
            (tokens[..5].join("."), NamingScheme::Native)
        };
        return Classification::Circuit {
            id: CircuitId::new(service, method),
            prefix,
            scheme,
        };
    }

    if tokens.len() == PUBLISHER_COMMAND_TOKENS {
        let (service, method) = (tokens[0], tokens[1]);
        let probe = format!("{service}.{method}.{PUBLISHER_PROBE_METRIC}");
        if snapshot.has_gauge(&probe) {
            return Classification::Circuit {
                id: CircuitId::new(service, method),
                prefix: format!("{service}.{method}"),
                scheme: NamingScheme::Publisher,
            };
        }
    }

    Classification::Ignore
}

/// Thread pool half of [`classify`]. Only the native convention carries
/// enough thread pool metrics, so the naming scheme is not consulted.
pub fn classify_thread_pool(key: &str) -> Classification {
    if !key.starts_with(THREAD_POOL_PREFIX) {
        return Classification::Ignore;
    }
    let tokens: Vec<&str> = key.split('.').collect();
    if tokens.len() != NATIVE_THREAD_POOL_TOKENS {
        return Classification::Ignore;
    }
    Classification::ThreadPool {
        service: tokens[3].to_string(),
        prefix: tokens[..4].join("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NATIVE_KEY: &str =
        "gauge.hystrix.HystrixCommand.serviceA.readAuthors.countShortCircuited";

    #[test]
    fn native_key_without_sibling_stays_native() {
        let snapshot = MetricSnapshot::from_gauges([(NATIVE_KEY, 0.0)]);
        assert_eq!(
            classify(NATIVE_KEY, &snapshot, NamingScheme::Native),
            Classification::Circuit {
                id: CircuitId::new("serviceA", "readAuthors"),
                prefix: "gauge.hystrix.HystrixCommand.serviceA.readAuthors".to_string(),
                scheme: NamingScheme::Native,
            }
        );
    }

    #[test]
    fn native_key_with_sibling_resolves_to_publisher() {
        let snapshot = MetricSnapshot::from_gauges([
            (NATIVE_KEY, 0.0),
            ("serviceA.readAuthors.countShortCircuited", 0.0),
        ]);
        assert_eq!(
            classify(NATIVE_KEY, &snapshot, NamingScheme::Native),
            Classification::Circuit {
                id: CircuitId::new("serviceA", "readAuthors"),
                prefix: "serviceA.readAuthors".to_string(),
                scheme: NamingScheme::Publisher,
            }
        );
    }

    #[test]
    fn publisher_scheme_skips_native_keys() {
        let snapshot = MetricSnapshot::from_gauges([(NATIVE_KEY, 0.0)]);
        assert_eq!(
            classify(NATIVE_KEY, &snapshot, NamingScheme::Publisher),
            Classification::Ignore
        );
    }

    #[test]
    fn publisher_key_requires_probe() {
        let key = "serviceB.listBooks.requestCount";
        let without = MetricSnapshot::from_gauges([(key, 3.0)]);
        assert_eq!(
            classify(key, &without, NamingScheme::Native),
            Classification::Ignore
        );

        let with = without.with_gauge("serviceB.listBooks.countShortCircuited", 0.0);
        for scheme in [NamingScheme::Native, NamingScheme::Publisher] {
            assert_eq!(
                classify(key, &with, scheme),
                Classification::Circuit {
                    id: CircuitId::new("serviceB", "listBooks"),
                    prefix: "serviceB.listBooks".to_string(),
                    scheme: NamingScheme::Publisher,
                }
            );
        }
    }

    #[test]
    fn wrong_token_counts_are_ignored() {
        let snapshot = MetricSnapshot::default();
        for key in [
            "gauge.hystrix.HystrixCommand.serviceA.readAuthors",
            "gauge.hystrix.HystrixCommand.serviceA.readAuthors.latency.extra",
            "gauge.hystrix.HystrixThreadPool.serviceA",
            "gauge.hystrix.HystrixThreadPool.serviceA.a.b",
            "jvm.memory",
            "",
        ] {
            assert_eq!(
                classify(key, &snapshot, NamingScheme::Native),
                Classification::Ignore,
                "key {key:?}"
            );
        }
    }

    #[test]
    fn thread_pool_key() {
        let snapshot = MetricSnapshot::default();
        assert_eq!(
            classify(
                "gauge.hystrix.HystrixThreadPool.serviceA.currentActiveCount",
                &snapshot,
                NamingScheme::Publisher
            ),
            Classification::ThreadPool {
                service: "serviceA".to_string(),
                prefix: "gauge.hystrix.HystrixThreadPool.serviceA".to_string(),
            }
        );
    }

    #[test]
    fn thread_pool_prefix_is_not_a_command() {
        assert_eq!(
            classify_circuit(
                "gauge.hystrix.HystrixThreadPool.serviceA.x.y",
                &MetricSnapshot::default(),
                NamingScheme::Native
            ),
            Classification::Ignore
        );
    }

    #[test]
    fn circuit_id_display() {
        assert_eq!(CircuitId::new("svc", "call").to_string(), "svc.call");
    }
}
