//! Extraction engine - Solr stats documents to flat metrics
//!
//! This module runs every mapping table against its endpoint's document and
//! produces the named metrics that are handed to the sink.

use serde_json::Value;
use tracing::{debug, trace};

use super::accumulator::Accumulator;
use super::mapping::{MappingTable, MappingTables};
use super::path::{extract, is_reportable};
use super::value::MetricValue;
use crate::collector::StatsSnapshot;

/// A metric ready for emission
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedMetric {
    /// Full metric name, prefix included
    pub name: String,
    pub value: MetricValue,
}

impl ExtractedMetric {
    pub fn new(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Extraction engine
///
/// Owns the mapping tables and the accumulator state, which lives as long
/// as the engine does.
#[derive(Debug)]
pub struct Extractor {
    tables: MappingTables,
    accumulator: Accumulator,
    prefix: String,
}

impl Extractor {
    /// Create a new Extractor
    ///
    /// # Example
    ///
    /// ```ignore
    /// use rsolr_exporter::transformer::{Accumulator, Extractor, MappingTables};
    ///
    /// let mut extractor = Extractor::new(MappingTables::builtin(), Accumulator::default())
    ///     .with_prefix("PROD_");
    /// let metrics = extractor.extract(&snapshot);
    /// ```
    pub fn new(tables: MappingTables, accumulator: Accumulator) -> Self {
        Self {
            tables,
            accumulator,
            prefix: String::new(),
        }
    }

    /// Set the metric name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn tables(&self) -> &MappingTables {
        &self.tables
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    /// Extract all metrics from one snapshot
    ///
    /// Order is system, threads, mbeans, each in table order.
    pub fn extract(&mut self, snapshot: &StatsSnapshot) -> Vec<ExtractedMetric> {
        let mut metrics = Vec::new();
        for table in self.tables.iter() {
            apply_table(
                table,
                snapshot.document(table.endpoint()),
                &mut self.accumulator,
                &self.prefix,
                &mut metrics,
            );
        }
        metrics
    }

    /// Extract metrics from a single document using an arbitrary table
    pub fn extract_table(&mut self, table: &MappingTable, document: &Value) -> Vec<ExtractedMetric> {
        let mut metrics = Vec::new();
        apply_table(
            table,
            document,
            &mut self.accumulator,
            &self.prefix,
            &mut metrics,
        );
        metrics
    }
}

fn apply_table(
    table: &MappingTable,
    document: &Value,
    accumulator: &mut Accumulator,
    prefix: &str,
    out: &mut Vec<ExtractedMetric>,
) {
    for entry in table.entries() {
        let Some(raw) = extract(document, &entry.path).filter(|v| is_reportable(v)) else {
            trace!(endpoint = %table.endpoint(), path = %entry.path, "Value absent, skipping");
            continue;
        };

        let Some(mut value) = MetricValue::from_json(raw) else {
            debug!(
                endpoint = %table.endpoint(),
                path = %entry.path,
                "Value is not a scalar, skipping"
            );
            continue;
        };

        if entry.accumulate {
            match accumulator.accumulate(&entry.path, value) {
                Some(v) => value = v,
                None => continue,
            }
        }

        out.push(ExtractedMetric {
            name: format!("{}{}", prefix, entry.name),
            value,
        });
    }
}
