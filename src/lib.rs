//! rSolr-Exporter library
//!
//! This crate provides the core functionality for polling Solr admin
//! endpoints, extracting stats from the returned JSON documents and
//! reporting them as named metrics.

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod poller;
pub mod sink;
pub mod transformer;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem
///
/// # Arguments
/// * `level` - Log level string (trace, debug, info, warn, error)
/// * `file` - Append logs to this file instead of stderr
/// * `json` - Emit JSON lines instead of human-readable text
///
/// # Errors
/// Returns an error if the log file cannot be opened or the logging system
/// fails to initialize
pub fn init_logging(level: &str, file: Option<&str>, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let writer = match file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open log file '{}': {}", path, e))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(file.is_none())
        .with_writer(writer);
    let fmt_layer = if json {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
