//! Metric mapping tables
//!
//! Each Solr admin endpoint has a table of `(path, metric name, accumulate)`
//! entries. The tables are plain data: adding a metric means adding a row,
//! not code.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::path::MetricPath;
use crate::collector::Endpoint;
use crate::error::MappingError;

/// Raw table row: path keys, metric name, accumulate flag
type MappingRow = (&'static [&'static str], &'static str, bool);

const SYSTEM_MAPPINGS: &[MappingRow] = &[
    (&["mode"], "SOLR_RUN_MODE", false),
    (
        &["system", "committedVirtualMemorySize"],
        "SOLR_SYSTEM_COMMITED_VIRTUAL_MEMORY_SIZE",
        false,
    ),
    (
        &["system", "freePhysicalMemorySize"],
        "SOLR_SYSTEM_FREE_PHYSICAL_MEMORY_SIZE",
        false,
    ),
    (&["system", "processCpuTime"], "SOLR_SYSTEM_PROCESS_CPU_TIME", false),
    (
        &["system", "openFileDescriptorCount"],
        "SOLR_SYSTEM_OPEN_FILE_DESCRIPTOR_COUNT",
        false,
    ),
    (
        &["system", "maxFileDescriptorCount"],
        "SOLR_SYSTEM_MAX_FILE_DESCRIPTOR_COUNT",
        false,
    ),
    (&["jvm", "jmx", "upTimeMS"], "SOLR_JVM_UPTIME", false),
    (&["jvm", "processors"], "SOLR_JVM_PROCESSORS", false),
    (&["jvm", "memory", "raw", "free"], "SOLR_JVM_MEMORY_FREE", false),
    (&["jvm", "memory", "raw", "total"], "SOLR_JVM_MEMORY_TOTAL", false),
    (&["jvm", "memory", "raw", "max"], "SOLR_JVM_MEMORY_MAX", false),
    (&["jvm", "memory", "raw", "used"], "SOLR_JVM_MEMORY_USED", false),
];

const THREAD_MAPPINGS: &[MappingRow] = &[
    (&["system", "threadCount", "current"], "SOLR_THREAD_CURRENT", false),
    (&["system", "threadCount", "peak"], "SOLR_THREAD_PEAK", false),
    (&["system", "threadCount", "daemon"], "SOLR_THREAD_DAEMON", false),
];

const MBEANS_MAPPINGS: &[MappingRow] = &[
    (
        &["solr-mbeans", "CACHE", "documentCache", "stats", "lookups"],
        "SOLR_CACHE_DOCUMENT_LOOKUPS",
        false,
    ),
    (
        &["solr-mbeans", "CACHE", "documentCache", "stats", "hits"],
        "SOLR_CACHE_DOCUMENT_HITS",
        false,
    ),
    (
        &["solr-mbeans", "CACHE", "documentCache", "stats", "hitratio"],
        "SOLR_CACHE_DOCUMENT_HITRATIO",
        false,
    ),
    (
        &["solr-mbeans", "CACHE", "documentCache", "stats", "inserts"],
        "SOLR_CACHE_DOCUMENT_INSERTS",
        false,
    ),
    (
        &["solr-mbeans", "CACHE", "documentCache", "stats", "size"],
        "SOLR_CACHE_DOCUMENT_SIZE",
        false,
    ),
    (
        &["solr-mbeans", "CACHE", "documentCache", "stats", "evictions"],
        "SOLR_CACHE_DOCUMENT_EVICTIONS",
        false,
    ),
    (
        &["solr-mbeans", "CACHE", "documentCache", "stats", "warmupTime"],
        "SOLR_CACHE_DOCUMENT_WARMUPTIME",
        false,
    ),
];

static METRIC_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("metric name pattern is valid")
});

/// One mapping entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricMapping {
    /// Location of the value in the endpoint's document
    pub path: MetricPath,
    /// Output metric name, before the configured prefix
    pub name: String,
    /// Pass the value through the accumulator
    #[serde(default)]
    pub accumulate: bool,
}

impl MetricMapping {
    pub fn new(path: MetricPath, name: impl Into<String>, accumulate: bool) -> Self {
        Self {
            path,
            name: name.into(),
            accumulate,
        }
    }

    fn from_row((path, name, accumulate): &MappingRow) -> Self {
        Self::new(MetricPath::from(*path), *name, *accumulate)
    }

    /// Check the entry on its own, independent of any table
    pub fn validate(&self) -> Result<(), MappingError> {
        if !METRIC_NAME_RE.is_match(&self.name) {
            return Err(MappingError::InvalidName {
                name: self.name.clone(),
                reason: "must match [A-Za-z_][A-Za-z0-9_]*".to_string(),
            });
        }
        if self.path.is_empty() {
            return Err(MappingError::EmptyPath {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Ordered entries for a single endpoint
///
/// Metric names are unique within a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTable {
    endpoint: Endpoint,
    entries: Vec<MetricMapping>,
}

impl MappingTable {
    /// Empty table for `endpoint`
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            entries: Vec::new(),
        }
    }

    /// Built-in table for `endpoint`
    pub fn builtin(endpoint: Endpoint) -> Self {
        let rows = match endpoint {
            Endpoint::System => SYSTEM_MAPPINGS,
            Endpoint::Threads => THREAD_MAPPINGS,
            Endpoint::MBeans => MBEANS_MAPPINGS,
        };
        Self {
            endpoint,
            entries: rows.iter().map(MetricMapping::from_row).collect(),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn entries(&self) -> &[MetricMapping] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, rejecting invalid or duplicate names
    pub fn push(&mut self, mapping: MetricMapping) -> Result<(), MappingError> {
        mapping.validate()?;
        if self.entries.iter().any(|m| m.name == mapping.name) {
            return Err(MappingError::DuplicateName {
                table: self.endpoint.to_string(),
                name: mapping.name,
            });
        }
        self.entries.push(mapping);
        Ok(())
    }
}

/// An extra entry from configuration, tagged with its endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraMapping {
    pub endpoint: Endpoint,
    #[serde(flatten)]
    pub mapping: MetricMapping,
}

/// The three tables evaluated in every poll cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTables {
    pub system: MappingTable,
    pub threads: MappingTable,
    pub mbeans: MappingTable,
}

impl Default for MappingTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MappingTables {
    pub fn builtin() -> Self {
        Self {
            system: MappingTable::builtin(Endpoint::System),
            threads: MappingTable::builtin(Endpoint::Threads),
            mbeans: MappingTable::builtin(Endpoint::MBeans),
        }
    }

    /// Built-in tables extended with `extra`
    pub fn with_extra(extra: &[ExtraMapping]) -> Result<Self, MappingError> {
        let mut tables = Self::builtin();
        for e in extra {
            tables.table_mut(e.endpoint).push(e.mapping.clone())?;
        }
        Ok(tables)
    }

    pub fn table(&self, endpoint: Endpoint) -> &MappingTable {
        match endpoint {
            Endpoint::System => &self.system,
            Endpoint::Threads => &self.threads,
            Endpoint::MBeans => &self.mbeans,
        }
    }

    fn table_mut(&mut self, endpoint: Endpoint) -> &mut MappingTable {
        match endpoint {
            Endpoint::System => &mut self.system,
            Endpoint::Threads => &mut self.threads,
            Endpoint::MBeans => &mut self.mbeans,
        }
    }

    /// Tables in emission order
    pub fn iter(&self) -> impl Iterator<Item = &MappingTable> {
        [&self.system, &self.threads, &self.mbeans].into_iter()
    }
}
