//! Transformer module for converting Solr stats documents to metrics
//!
//! This module provides:
//! - Path lookup into nested JSON documents
//! - Declarative per-endpoint mapping tables
//! - Counter accumulation across polls
//! - The extraction engine tying them together

mod accumulator;
mod engine;
mod mapping;
mod path;
mod value;

pub use accumulator::{AccumulateMode, Accumulator};
pub use engine::{ExtractedMetric, Extractor};
pub use mapping::{ExtraMapping, MappingTable, MappingTables, MetricMapping};
pub use path::{extract, is_reportable, MetricPath};
pub use value::MetricValue;
