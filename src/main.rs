//! rSolr-Exporter - Solr admin stats poller
//!
//! This binary polls a Solr server's admin endpoints and prints the
//! extracted metrics on stdout, one `NAME VALUE [SOURCE]` line each.

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use rsolr_exporter::{cli::Cli, config::Config, error::PollError, poller::Poller};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load_or_default(&cli.config)?;
    config.apply_cli(&cli);
    config.validate()?;

    if cli.validate {
        println!("Configuration is valid");
        println!("  base_url: {}", config.solr.base_url);
        println!(
            "  core_name: {}",
            config.solr.core_name.as_deref().unwrap_or("-")
        );
        println!("  interval_ms: {}", config.polling.interval_ms);
        println!("  retry_count: {}", config.polling.retry_count);
        println!("  extra mappings: {}", config.mappings.len());
        return Ok(());
    }

    // Initialize logging
    rsolr_exporter::init_logging(
        &config.logging.level,
        config.logging.file.as_deref(),
        config.logging.json,
    )?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting rSolr-Exporter"
    );

    let mut poller = Poller::from_config(&config)?;

    if cli.once {
        let emitted = poller.poll_once().await.inspect_err(log_fatal)?;
        info!(emitted, "Single poll cycle complete");
        return Ok(());
    }

    tokio::select! {
        result = poller.run() => {
            // run only returns on a fatal error
            let err = match result {
                Ok(never) => match never {},
                Err(e) => e,
            };
            log_fatal(&err);
            Err(err.into())
        }
        _ = shutdown_signal() => {
            info!("Shutdown complete");
            Ok(())
        }
    }
}

fn log_fatal(err: &PollError) {
    error!(error = %err, "Fatal error, aborting");
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
