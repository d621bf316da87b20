//! Scalar metric values

use serde_json::Value;

/// A single reportable metric value
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Convert a JSON scalar
    ///
    /// Booleans map to `1`/`0`. Arrays, objects and `null` have no scalar
    /// form and return `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(MetricValue::Integer(i)),
                None => n.as_f64().map(MetricValue::Float),
            },
            Value::String(s) => Some(MetricValue::Text(s.clone())),
            Value::Bool(b) => Some(MetricValue::Integer(i64::from(*b))),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Numeric view, `None` for text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(i) => Some(*i as f64),
            MetricValue::Float(f) => Some(*f),
            MetricValue::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, MetricValue::Text(_))
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Integer(i) => write!(f, "{}", i),
            MetricValue::Float(v) => write!(f, "{}", v),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_string())
    }
}
