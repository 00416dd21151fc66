//! Shared types for metric snapshots.
//!
//! These types match the JSON document produced by a Dropwizard/Codahale
//! metrics servlet: four metric categories, each mapping a dotted metric key
//! to a record with a `value` field. Only gauges are consulted by the
//! dashboard; the other categories are kept so a document round-trips.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::format::round_to;

/// Metrics keyed by their dotted name.
pub type MetricMap = BTreeMap<String, MetricRecord>;

/// A complete metrics document for one polling tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counters: Option<MetricMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauges: Option<MetricMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meters: Option<MetricMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timers: Option<MetricMap>,
}

/// A single metric entry. Meters and timers carry more fields than `value`;
/// those are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<MetricValue>,
}

/// The raw scalar carried by a metric record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Bool(bool),
    Number(f64),
    /// Strings, arrays and objects. Never coerced to a number.
    Other(serde_json::Value),
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Number(v)
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Number(v as f64)
    }
}

impl From<bool> for MetricValue {
    fn from(v: bool) -> Self {
        MetricValue::Bool(v)
    }
}

impl MetricValue {
    /// Coerce to a number: booleans become 0/1, numbers are rounded to four
    /// fractional digits, anything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Bool(true) => Some(1.0),
            MetricValue::Bool(false) => Some(0.0),
            MetricValue::Number(n) => Some(round_to(*n, 4)),
            MetricValue::Other(_) => None,
        }
    }
}

impl MetricSnapshot {
    /// Build a snapshot holding only gauges. Mostly useful for tests and
    /// in-process producers.
    pub fn from_gauges<I, K, V>(gauges: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetricValue>,
    {
        let gauges = gauges
            .into_iter()
            .map(|(k, v)| {
                (
                    k.into(),
                    MetricRecord {
                        value: Some(v.into()),
                    },
                )
            })
            .collect();
        Self {
            gauges: Some(gauges),
            ..Self::default()
        }
    }

    /// Add or replace a gauge.
    pub fn with_gauge(mut self, key: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        self.gauges.get_or_insert_with(MetricMap::new).insert(
            key.into(),
            MetricRecord {
                value: Some(value.into()),
            },
        );
        self
    }

    /// Iterate the gauge keys in sorted key order.
    pub fn gauge_keys(&self) -> impl Iterator<Item = &str> {
        self.gauges.iter().flat_map(|g| g.keys().map(String::as_str))
    }

    /// Whether a gauge record with this name exists, whatever its value.
    pub fn has_gauge(&self, name: &str) -> bool {
        self.gauges.as_ref().is_some_and(|g| g.contains_key(name))
    }

    /// Numeric value of a gauge, or `None` if it is missing or not coercible.
    pub fn gauge(&self, name: &str) -> Option<f64> {
        self.gauges.as_ref()?.get(name)?.value.as_ref()?.as_number()
    }

    /// Total number of metrics across every category.
    pub fn len(&self) -> usize {
        [&self.counters, &self.gauges, &self.meters, &self.timers]
            .iter()
            .map(|m| m.as_ref().map_or(0, BTreeMap::len))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Look up a gauge value, falling back to `default` when the gauge is absent
/// or cannot be read as a number.
pub fn get_metric_value(snapshot: &MetricSnapshot, metric_name: &str, default: f64) -> f64 {
    snapshot.gauge(metric_name).unwrap_or(default)
}
