//! Nested JSON lookup by key path
//!
//! A [`MetricPath`] names a location inside a Solr stats document, e.g.
//! `jvm.memory.raw.used`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered key sequence locating a value within a nested JSON document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricPath(Vec<String>);

impl MetricPath {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[&str]> for MetricPath {
    fn from(keys: &[&str]) -> Self {
        Self::new(keys.iter().copied())
    }
}

impl std::fmt::Display for MetricPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Walk `path` through `document`
///
/// Returns `None` as soon as a key is missing or an intermediate value is
/// not an object. An empty path returns the document itself.
pub fn extract<'a>(document: &'a Value, path: &MetricPath) -> Option<&'a Value> {
    path.keys()
        .iter()
        .try_fold(document, |current, key| current.as_object()?.get(key))
}

/// Whether an extracted value should be reported at all
///
/// `null`, `false`, numeric zero, the empty string and empty containers are
/// all treated like a missing value. This means a genuine zero reading
/// (e.g. zero cache evictions) is never emitted. Downstream dashboards may
/// rely on that, so it is kept, but it is probably a latent bug.
pub fn is_reportable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
