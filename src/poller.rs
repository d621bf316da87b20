//! Polling loop
//!
//! Fetches the three Solr admin documents, extracts metrics, hands them to
//! the sink and sleeps, forever. The only way out is a fatal [`PollError`]
//! or the process being terminated.

use std::convert::Infallible;
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::collector::{Collector, SolrClient, StatsSource};
use crate::config::Config;
use crate::error::PollError;
use crate::sink::{LineSink, MetricSink};
use crate::transformer::{Accumulator, Extractor};

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Fetching,
    Sleeping,
}

/// The polling loop and everything it owns
pub struct Poller<S, K> {
    collector: Collector<S>,
    extractor: Extractor,
    sink: K,
    interval: Duration,
    state: PollState,
    cycles: u64,
}

impl<S: StatsSource, K: MetricSink> Poller<S, K> {
    pub fn new(collector: Collector<S>, extractor: Extractor, sink: K, interval: Duration) -> Self {
        Self {
            collector,
            extractor,
            sink,
            interval,
            state: PollState::Fetching,
            cycles: 0,
        }
    }

    /// Run one fetch-extract-emit cycle
    ///
    /// Returns the number of metrics emitted.
    ///
    /// # Errors
    ///
    /// [`PollError::MaxRetriesExceeded`] when the retry budget is spent, and
    /// [`PollError::Sink`] when the sink rejects a metric.
    #[instrument(skip(self), fields(cycle = self.cycles + 1))]
    pub async fn poll_once(&mut self) -> Result<usize, PollError> {
        self.state = PollState::Fetching;

        let snapshot = self.collector.collect().await?;
        let metrics = self.extractor.extract(&snapshot);

        for metric in &metrics {
            self.sink
                .report(&metric.name, &metric.value)
                .map_err(|source| PollError::Sink {
                    name: metric.name.clone(),
                    source,
                })?;
        }

        self.cycles += 1;
        debug!(emitted = metrics.len(), "Poll cycle complete");

        Ok(metrics.len())
    }

    /// Poll until a fatal error occurs
    pub async fn run(&mut self) -> Result<Infallible, PollError> {
        info!(interval_ms = self.interval.as_millis() as u64, "Polling started");

        loop {
            self.poll_once().await?;

            self.state = PollState::Sleeping;
            tokio::time::sleep(self.interval).await;
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Completed cycles
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Poller<SolrClient, LineSink<io::Stdout>> {
    /// Build the production poller: Solr HTTP client in, stdout lines out
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut client = SolrClient::new(&config.solr.base_url, config.solr.timeout_ms)?;
        if let Some(ref core) = config.solr.core_name {
            client = client.with_core(core);
        }

        let tables = config.mapping_tables()?;
        let extractor = Extractor::new(tables, Accumulator::new(config.polling.accumulate_mode))
            .with_prefix(config.polling.metric_prefix.as_str());

        let mut sink = LineSink::stdout();
        if let Some(ref source) = config.reporting.source {
            sink = sink.with_source(source.as_str());
        }
        if let Some(ref path) = config.reporting.report_log_file {
            sink = sink
                .with_report_log_file(path)
                .with_context(|| format!("Failed to open report log file '{}'", path))?;
        }

        info!(
            base_url = %client.base_url(),
            core = client.core_name().unwrap_or("-"),
            retry_count = config.polling.retry_count,
            "Poller configured"
        );

        let collector = Collector::new(client, config.retry_policy());
        Ok(Self::new(collector, extractor, sink, config.interval()))
    }
}
