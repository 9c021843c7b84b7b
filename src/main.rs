//! PulseWatch - endpoint health and performance monitoring.
//!
//! `monitor` probes a named environment on a schedule, raising alerts and
//! appending metrics until stopped. `perf-check` runs a fixed number of
//! probes against a URL and writes a one-off report.

mod commands;
mod config;
mod notify;
mod probe;
mod report;
mod scheduler;
mod stats;
mod store;
mod threshold;

#[cfg(test)]
mod testutil;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::monitor::MonitorArgs;
use commands::perf_check::PerfCheckArgs;
use config::MonitorConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "pulsewatch",
    about = "Endpoint health and performance monitor",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Continuously monitor a named environment (dev, prod, local)
    Monitor {
        environment: String,
        /// Seconds between checks
        #[arg(long, default_value_t = 5)]
        interval: u64,
        /// Minutes to run; 0 runs until interrupted
        #[arg(long, default_value_t = 0)]
        duration: u64,
        /// Hand alerts off for notification delivery
        #[arg(long)]
        notify: bool,
    },
    /// Probe a URL a fixed number of times and write a performance report
    PerfCheck {
        #[arg(default_value = "http://localhost:8080")]
        url: String,
        /// Include per-request details in the report
        #[arg(long)]
        detailed: bool,
        /// Exit nonzero when any check fails
        #[arg(long)]
        ci: bool,
        /// Number of sequential requests
        #[arg(long, default_value_t = 5)]
        requests: u64,
        /// Report path (default: performance-report.json in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("pulsewatch=info".parse()?))
        .init();

    let cli = Cli::parse();
    let cfg = MonitorConfig::load();

    let result = match cli.command {
        Commands::Monitor { environment, interval, duration, notify } => {
            let args = MonitorArgs {
                environment,
                interval_secs: interval,
                duration_mins: duration,
                notify,
            };
            commands::monitor::run(&cfg, args).await
        }
        Commands::PerfCheck { url, detailed, ci, requests, output } => {
            let args = PerfCheckArgs { url, detailed, ci, requests, output };
            commands::perf_check::run(&cfg, args).await
        }
    };

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
