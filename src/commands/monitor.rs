//! `pulsewatch monitor`: continuous checks against a named environment.

use std::process::ExitCode;
use std::time::Duration;

use tokio::sync::watch;

use super::CommandError;
use crate::config::{ConfigError, Environment, MonitorConfig};
use crate::report::render_report;
use crate::scheduler::MonitorSession;

/// Longest accepted `--duration`, one year in minutes.
pub const MAX_DURATION_MINS: u64 = 365 * 24 * 60;

/// Options of `pulsewatch monitor`.
#[derive(Debug, Clone)]
pub struct MonitorArgs {
    pub environment: String,
    pub interval_secs: u64,
    pub duration_mins: u64,
    pub notify: bool,
}

/// Validated run plan.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorPlan {
    pub environment: Environment,
    pub interval: Duration,
    /// `None` runs until interrupted.
    pub duration: Option<Duration>,
}

impl MonitorArgs {
    pub fn validate(&self) -> Result<MonitorPlan, ConfigError> {
        let environment = self.environment.parse::<Environment>()?;

        if self.interval_secs == 0 {
            return Err(ConfigError::InvalidOption {
                name: "--interval".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }

        if self.duration_mins > MAX_DURATION_MINS {
            return Err(ConfigError::InvalidOption {
                name: "--duration".to_string(),
                reason: format!("must be at most {} minutes", MAX_DURATION_MINS),
            });
        }

        Ok(MonitorPlan {
            environment,
            interval: Duration::from_secs(self.interval_secs),
            duration: (self.duration_mins > 0).then(|| Duration::from_secs(self.duration_mins * 60)),
        })
    }
}

pub async fn run(cfg: &MonitorConfig, args: MonitorArgs) -> Result<ExitCode, CommandError> {
    let plan = match args.validate() {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let target = plan.environment.target();
    tracing::info!("Starting continuous monitoring for {} environment", plan.environment);
    tracing::info!("Target URL: {}", target.url);
    tracing::info!("Check interval: {} seconds", plan.interval.as_secs());
    if let Some(duration) = plan.duration {
        tracing::info!("Duration: {} minutes", duration.as_secs() / 60);
    }

    let mut session = MonitorSession::start(cfg, target, args.notify)?;
    if args.notify {
        tracing::info!("Alert notifications enabled");
    }

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    let summary = session.run(plan.interval, plan.duration, stop_rx).await?;
    println!("{}", render_report(&summary, session.state().alerts()));

    Ok(ExitCode::SUCCESS)
}
