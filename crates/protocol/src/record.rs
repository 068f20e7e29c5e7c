use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::value::MetricValue;

/// Key under which the sample timestamp is serialized.
pub const TIME_KEY: &str = "time";

/// Metric name to value, as produced by a single source.
pub type Metrics = BTreeMap<String, MetricValue>;

/// One timestamped sample: every metric collected during a tick.
///
/// Serializes as a single flat JSON object, `time` alongside the metric keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Unix epoch seconds.
    pub time: i64,
    #[serde(flatten)]
    metrics: Metrics,
}

impl MetricRecord {
    pub fn new(time: i64) -> Self {
        Self {
            time,
            metrics: Metrics::new(),
        }
    }

    /// Empty record stamped with the current wall-clock time.
    pub fn now() -> Self {
        Self::new(Utc::now().timestamp())
    }

    /// Insert a metric, replacing any previous value under the same key.
    ///
    /// `time` is reserved for the timestamp and is ignored here.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetricValue>) {
        let key = key.into();
        if key == TIME_KEY {
            return;
        }
        self.metrics.insert(key, value.into());
    }

    /// Merge a source's output. Later merges win on key collision.
    pub fn merge(&mut self, metrics: Metrics) {
        for (key, value) in metrics {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.metrics.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.metrics.contains_key(key)
    }

    /// Metric keys in sorted order, excluding `time`.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_merge_wins() {
        let mut record = MetricRecord::new(1);
        let mut gpu = Metrics::new();
        gpu.insert("shared".to_string(), MetricValue::from("gpu"));
        let mut cpu = Metrics::new();
        cpu.insert("shared".to_string(), MetricValue::from("cpu"));

        record.merge(gpu);
        record.merge(cpu);

        assert_eq!(record.get("shared"), Some(&MetricValue::from("cpu")));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_time_key_is_reserved() {
        let mut record = MetricRecord::new(100);
        record.insert(TIME_KEY, 5i64);
        assert_eq!(record.time, 100);
        assert!(record.is_empty());
    }
}
