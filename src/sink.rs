//! Metric sinks
//!
//! A sink receives every metric emitted by a poll cycle. The default
//! [`LineSink`] writes one `NAME VALUE [SOURCE]` line per metric to stdout,
//! which is what metric-relay agents read from a plugin process.
//!
//! # Format
//!
//! ```text
//! SOLR_JVM_MEMORY_USED 52428800 solr-01
//! SOLR_RUN_MODE solrcloud solr-01
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::transformer::MetricValue;

/// Destination for emitted metrics
pub trait MetricSink {
    /// Report a single metric
    ///
    /// # Errors
    ///
    /// Returns an error when the metric could not be written. The poller
    /// treats this as fatal.
    fn report(&mut self, name: &str, value: &MetricValue) -> io::Result<()>;
}

impl<T: MetricSink + ?Sized> MetricSink for &mut T {
    fn report(&mut self, name: &str, value: &MetricValue) -> io::Result<()> {
        (**self).report(name, value)
    }
}

/// Line-oriented sink
pub struct LineSink<W: Write> {
    out: W,
    source: Option<String>,
    report_log: Option<Box<dyn Write + Send>>,
}

impl LineSink<io::Stdout> {
    /// Sink writing to the process's stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            source: None,
            report_log: None,
        }
    }

    /// Append `source` to every line
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.source = (!source.is_empty()).then_some(source);
        self
    }

    /// Mirror every line to `writer`
    pub fn with_report_log(mut self, writer: impl Write + Send + 'static) -> Self {
        self.report_log = Some(Box::new(writer));
        self
    }

    /// Mirror every line to the file at `path`, appending
    pub fn with_report_log_file<P: AsRef<Path>>(self, path: P) -> io::Result<Self> {
        let file: File = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(self.with_report_log(file))
    }

    /// Format a metric line without the trailing newline
    pub fn format_line(&self, name: &str, value: &MetricValue) -> String {
        match &self.source {
            Some(source) => format!("{} {} {}", name, value, source),
            None => format!("{} {}", name, value),
        }
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MetricSink for LineSink<W> {
    fn report(&mut self, name: &str, value: &MetricValue) -> io::Result<()> {
        let line = self.format_line(name, value);

        writeln!(self.out, "{}", line)?;
        self.out.flush()?;

        if let Some(log) = self.report_log.as_mut() {
            writeln!(log, "{}", line)?;
            log.flush()?;
        }

        Ok(())
    }
}

/// Sink that keeps every metric in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub metrics: Vec<(String, MetricValue)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent value reported under `name`
    pub fn get(&self, name: &str) -> Option<&MetricValue> {
        self.metrics
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> Vec<&str> {
        self.metrics.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl MetricSink for MemorySink {
    fn report(&mut self, name: &str, value: &MetricValue) -> io::Result<()> {
        self.metrics.push((name.to_string(), value.clone()));
        Ok(())
    }
}
