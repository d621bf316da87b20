//! CLI argument parsing for rSolr-Exporter
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: RSOLR_CONFIG)
//! - `--base-url`: Solr base URL (env: RSOLR_BASE_URL)
//! - `--core-name`: Core whose mbeans stats are collected (env: RSOLR_CORE_NAME)
//! - `--timeout-ms`: HTTP timeout in milliseconds (env: RSOLR_TIMEOUT_MS)
//! - `--interval-ms`: Poll interval in milliseconds (env: RSOLR_INTERVAL_MS)
//! - `--retry-count`: Attempts per cycle, 0 = unlimited (env: RSOLR_RETRY_COUNT)
//! - `--retry-delay-ms`: Delay between attempts (env: RSOLR_RETRY_DELAY_MS)
//! - `--metric-prefix`: Prefix for every metric name (env: RSOLR_METRIC_PREFIX)
//! - `--source`: Source appended to metric lines (env: RSOLR_SOURCE)
//! - `--report-log-file`: Mirror metric lines to a file (env: RSOLR_REPORT_LOG_FILE)
//! - `--log-file`: Write logs to a file instead of stderr (env: RSOLR_LOG_FILE)
//! - `--log-level` / `-l`: Log level (trace/debug/info/warn/error, env: RSOLR_LOG_LEVEL)
//! - `--verbose` / `-v`: Shorthand for at least `info` logging
//! - `--validate`: Validate configuration and exit
//! - `--once`: Run a single poll cycle and exit
//!
//! # Precedence
//!
//! Configuration values are resolved in the following order (highest to lowest priority):
//! 1. CLI arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// rSolr-Exporter - Solr admin stats poller
///
/// Periodically reads Solr's system, thread and mbeans admin endpoints
/// and prints the extracted values as metric lines on stdout.
#[derive(Parser, Debug)]
#[command(name = "rsolr-exporter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "RSOLR_CONFIG"
    )]
    pub config: PathBuf,

    /// Solr base URL (overrides config file)
    #[arg(long, value_name = "URL", env = "RSOLR_BASE_URL")]
    pub base_url: Option<String>,

    /// Core whose mbeans stats are collected (overrides config file)
    #[arg(long, value_name = "CORE", env = "RSOLR_CORE_NAME")]
    pub core_name: Option<String>,

    /// HTTP timeout in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "RSOLR_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Poll interval in milliseconds (overrides config file)
    #[arg(long, value_name = "MS", env = "RSOLR_INTERVAL_MS")]
    pub interval_ms: Option<u64>,

    /// Attempts per poll cycle before giving up, 0 for unlimited
    #[arg(long, value_name = "COUNT", env = "RSOLR_RETRY_COUNT")]
    pub retry_count: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long, value_name = "MS", env = "RSOLR_RETRY_DELAY_MS")]
    pub retry_delay_ms: Option<u64>,

    /// Prefix prepended to every metric name
    #[arg(long, value_name = "PREFIX", env = "RSOLR_METRIC_PREFIX")]
    pub metric_prefix: Option<String>,

    /// Source appended to every metric line
    #[arg(long, value_name = "SOURCE", env = "RSOLR_SOURCE")]
    pub source: Option<String>,

    /// Mirror every metric line to this file
    #[arg(long, value_name = "FILE", env = "RSOLR_REPORT_LOG_FILE")]
    pub report_log_file: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE", env = "RSOLR_LOG_FILE")]
    pub log_file: Option<String>,

    /// Log level (overrides config file and --verbose)
    #[arg(short, long, value_enum, env = "RSOLR_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Verbose logging (info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Validate configuration without polling
    #[arg(long)]
    pub validate: bool,

    /// Run a single poll cycle and exit
    #[arg(long)]
    pub once: bool,
}

/// Log level options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warn level
    Warn,
    /// Error level - default
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Trace.to_string(), "trace");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::Info.to_string(), "info");
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["rsolr-exporter"]);
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
        assert_eq!(cli.base_url, None);
        assert_eq!(cli.core_name, None);
        assert_eq!(cli.interval_ms, None);
        assert_eq!(cli.retry_count, None);
        assert_eq!(cli.log_level, None);
        assert!(!cli.verbose);
        assert!(!cli.validate);
        assert!(!cli.once);
    }

    #[test]
    fn test_cli_with_options() {
        let cli = Cli::parse_from([
            "rsolr-exporter",
            "-c",
            "custom.yaml",
            "--core-name",
            "products",
            "--interval-ms",
            "15000",
            "--log-level",
            "debug",
            "--validate",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.yaml"));
        assert_eq!(cli.core_name, Some("products".to_string()));
        assert_eq!(cli.interval_ms, Some(15000));
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(cli.validate);
    }

    #[test]
    fn test_cli_verbose_and_once() {
        let cli = Cli::parse_from(["rsolr-exporter", "-v", "--once"]);
        assert!(cli.verbose);
        assert!(cli.once);
    }

    #[test]
    fn test_cli_report_options() {
        let cli = Cli::parse_from([
            "rsolr-exporter",
            "--source",
            "solr-01",
            "--report-log-file",
            "/var/log/rsolr/reports.log",
            "--log-file",
            "/var/log/rsolr/rsolr.log",
        ]);
        assert_eq!(cli.source, Some("solr-01".to_string()));
        assert_eq!(
            cli.report_log_file,
            Some("/var/log/rsolr/reports.log".to_string())
        );
        assert_eq!(cli.log_file, Some("/var/log/rsolr/rsolr.log".to_string()));
    }
}
