//! Configuration management for rSolr-Exporter
//!
//! Handles loading and validating configuration from YAML files, and
//! layering command-line / environment overrides on top.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::cli::Cli;
use crate::collector::RetryPolicy;
use crate::error::MappingError;
use crate::transformer::{AccumulateMode, ExtraMapping, MappingTables};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Invalid extra mapping entry
    #[error("Invalid mapping: {0}")]
    Mapping(#[from] MappingError),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Solr endpoint configuration
    #[serde(default)]
    pub solr: SolrConfig,

    /// Poll cycle and retry configuration
    #[serde(default)]
    pub polling: PollingConfig,

    /// Metric output configuration
    #[serde(default)]
    pub reporting: ReportingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extra mapping entries appended to the built-in tables
    #[serde(default)]
    pub mappings: Vec<ExtraMapping>,
}

/// Solr endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolrConfig {
    /// Solr base URL, admin paths are resolved against it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Core whose mbeans stats are collected
    pub core_name: Option<String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

/// Poll cycle and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Sleep between poll cycles in milliseconds
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Attempts per cycle before giving up (0 = unlimited)
    #[serde(default)]
    pub retry_count: u32,

    /// Delay between attempts in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Prefix prepended to every metric name
    #[serde(default)]
    pub metric_prefix: String,

    /// How accumulated counters are reported
    #[serde(default)]
    pub accumulate_mode: AccumulateMode,
}

/// Metric output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Source name appended to every metric line
    pub source: Option<String>,

    /// File mirroring every emitted metric line
    pub report_log_file: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file, stderr when unset
    pub file: Option<String>,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8983/solr/".to_string()
}

fn default_timeout() -> u64 {
    5000
}

fn default_interval() -> u64 {
    5000
}

fn default_retry_delay() -> u64 {
    5000
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            core_name: None,
            timeout_ms: default_timeout(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            retry_count: 0,
            retry_delay_ms: default_retry_delay(),
            metric_prefix: String::new(),
            accumulate_mode: AccumulateMode::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            json: false,
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    ///
    /// # Note
    /// - If the file doesn't exist, returns `ConfigError::ReadError`
    /// - Use `Config::load_or_default()` if you want fallback to defaults
    /// - The result is not validated; call [`Config::validate`] once
    ///   command-line overrides have been applied
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults if not found
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load(path)
    }

    /// Apply command-line (and environment) overrides
    ///
    /// The result still has to be validated.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(ref url) = cli.base_url {
            self.solr.base_url = url.clone();
        }
        if let Some(ref core) = cli.core_name {
            self.solr.core_name = Some(core.clone());
        }
        if let Some(ms) = cli.timeout_ms {
            self.solr.timeout_ms = ms;
        }
        if let Some(ms) = cli.interval_ms {
            self.polling.interval_ms = ms;
        }
        if let Some(count) = cli.retry_count {
            self.polling.retry_count = count;
        }
        if let Some(ms) = cli.retry_delay_ms {
            self.polling.retry_delay_ms = ms;
        }
        if let Some(ref prefix) = cli.metric_prefix {
            self.polling.metric_prefix = prefix.clone();
        }
        if let Some(ref source) = cli.source {
            self.reporting.source = Some(source.clone());
        }
        if let Some(ref path) = cli.report_log_file {
            self.reporting.report_log_file = Some(path.clone());
        }
        if let Some(ref path) = cli.log_file {
            self.logging.file = Some(path.clone());
        }
        if let Some(level) = cli.log_level {
            self.logging.level = level.to_string();
        } else if cli.verbose && !matches!(self.logging.level.as_str(), "trace" | "debug") {
            self.logging.level = "info".to_string();
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.solr.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Invalid base_url '{}': {}",
                self.solr.base_url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if let Some(ref core) = self.solr.core_name {
            if core.trim().is_empty() || core.contains(['/', '?', '#']) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid core_name '{}'",
                    core
                )));
            }
        }

        if self.solr.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.polling.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Polling interval must be greater than 0".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        self.mapping_tables()?;

        Ok(())
    }

    /// Built-in mapping tables plus configured extras
    pub fn mapping_tables(&self) -> Result<MappingTables, ConfigError> {
        Ok(MappingTables::with_extra(&self.mappings)?)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.polling.retry_count,
            Duration::from_millis(self.polling.retry_delay_ms),
        )
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.polling.interval_ms)
    }
}
