use std::fmt;

use serde::{Deserialize, Serialize};

/// A single metric value.
///
/// Sources hand back whatever they can parse with confidence: integers for
/// counters, floats for derived quantities and the raw text (units and all)
/// for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value.
    ///
    /// Text values are read leniently: the first whitespace-delimited token,
    /// with a trailing `%` removed, is parsed as a float. `"45 %"` and
    /// `" 1500 MHz"` both succeed, `"[N/A]"` does not.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Int(v) => Some(*v as f64),
            MetricValue::Float(v) => Some(*v),
            MetricValue::Text(s) => s
                .split_whitespace()
                .next()
                .map(|token| token.trim_end_matches('%'))
                .and_then(|token| token.parse::<f64>().ok()),
        }
    }

    /// Integer view of the value. Floats are truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetricValue::Int(v) => Some(*v),
            MetricValue::Float(v) => Some(*v as i64),
            MetricValue::Text(_) => self.as_f64().map(|v| v as i64),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Int(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}
