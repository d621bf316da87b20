//! Counter accumulation
//!
//! Solr exposes most counters as monotonically increasing totals. The
//! [`Accumulator`] turns them into per-poll deltas or per-second rates by
//! remembering the last value seen for each metric path.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, trace};

use super::path::MetricPath;
use super::value::MetricValue;

/// How an accumulated counter is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccumulateMode {
    /// Difference since the previous poll
    #[default]
    Delta,
    /// Difference divided by elapsed seconds
    Rate,
}

#[derive(Debug, Clone)]
struct Sample {
    value: MetricValue,
    observed_at: Instant,
}

/// Last-seen value per metric path
#[derive(Debug, Default)]
pub struct Accumulator {
    mode: AccumulateMode,
    samples: HashMap<MetricPath, Sample>,
}

impl Accumulator {
    pub fn new(mode: AccumulateMode) -> Self {
        Self {
            mode,
            samples: HashMap::new(),
        }
    }

    pub fn mode(&self) -> AccumulateMode {
        self.mode
    }

    /// Number of tracked paths
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Accumulate `value` observed now
    pub fn accumulate(&mut self, path: &MetricPath, value: MetricValue) -> Option<MetricValue> {
        self.accumulate_at(path, value, Instant::now())
    }

    /// Accumulate `value` observed at `now`
    ///
    /// Returns `None` on the first observation of a path, after a counter
    /// reset (the new value becomes the baseline), and for text values.
    pub fn accumulate_at(
        &mut self,
        path: &MetricPath,
        value: MetricValue,
        now: Instant,
    ) -> Option<MetricValue> {
        if !value.is_numeric() {
            debug!(path = %path, "Cannot accumulate non-numeric value");
            return None;
        }

        let sample = Sample {
            value,
            observed_at: now,
        };

        let previous = match self.samples.insert(path.clone(), sample.clone()) {
            Some(previous) => previous,
            None => {
                trace!(path = %path, "Seeded accumulator");
                return None;
            }
        };

        let Some(delta) = counter_delta(&sample.value, &previous.value) else {
            debug!(
                path = %path,
                previous = %previous.value,
                current = %sample.value,
                "Counter reset detected, re-seeding"
            );
            return None;
        };

        match self.mode {
            AccumulateMode::Delta => Some(delta),
            AccumulateMode::Rate => {
                let elapsed = now.saturating_duration_since(previous.observed_at);
                if elapsed.is_zero() {
                    return None;
                }
                let delta = delta.as_f64()?;
                Some(MetricValue::Float(delta / elapsed.as_secs_f64()))
            }
        }
    }
}

/// `current - last`, or `None` when the counter went backwards
///
/// Integer pairs are compared and subtracted as integers.
fn counter_delta(current: &MetricValue, last: &MetricValue) -> Option<MetricValue> {
    match (current, last) {
        (MetricValue::Integer(c), MetricValue::Integer(l)) => {
            if c < l {
                return None;
            }
            Some(match c.checked_sub(*l) {
                Some(d) => MetricValue::Integer(d),
                None => MetricValue::Float(*c as f64 - *l as f64),
            })
        }
        _ => {
            let (c, l) = (current.as_f64()?, last.as_f64()?);
            (c >= l).then(|| MetricValue::Float(c - l))
        }
    }
}
