//! Scheduler module for running probes and evaluating results.
//!
//! Continuous mode drives a [`MonitorSession`]: one probe per tick, each
//! sample fully processed (persist, evaluate, alert) before the next tick.
//! Bounded-count mode lives in [`batch`].

mod batch;
mod state;

pub use batch::*;
pub use state::*;

use chrono::Utc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::{MonitorConfig, Target};
use crate::notify::AlertNotifier;
use crate::probe::{ProbeConfig, ProbeError, Prober};
use crate::store::{RunStore, StoreError, Summary};
use crate::threshold::{check_availability, check_sample};

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
    #[error("probe setup failed: {0}")]
    Probe(#[from] ProbeError),
}

/// One continuous monitoring run against a single target.
pub struct MonitorSession {
    target: Target,
    prober: Prober,
    store: RunStore,
    notifier: AlertNotifier,
    state: RunState,
    summary: Option<Summary>,
}

impl MonitorSession {
    /// Set up the prober and open the environment's files.
    pub fn start(config: &MonitorConfig, target: Target, notify: bool) -> Result<Self, MonitorError> {
        let start_time = Utc::now();
        let prober = Prober::new(ProbeConfig::new(&target.url, config.timeout))?;
        let store = RunStore::open(config, &target.environment, start_time)?;
        let notifier = AlertNotifier::new(&target.environment, notify);

        Ok(Self {
            target,
            prober,
            store,
            notifier,
            state: RunState::new(start_time),
            summary: None,
        })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Probe every `interval` until stopped, then finalize.
    ///
    /// The first probe fires immediately. The run ends when `duration`
    /// elapses or `stop_rx` turns true; an in-flight check always completes.
    pub async fn run(
        &mut self,
        interval: Duration,
        duration: Option<Duration>,
        mut stop_rx: watch::Receiver<bool>,
    ) -> Result<Summary, MonitorError> {
        // A deadline past what Instant can represent never fires
        let deadline = duration.and_then(|d| Instant::now().checked_add(d));

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = wait_for_stop(&mut stop_rx) => {
                    tracing::info!("Monitoring interrupted, generating final report");
                    break;
                }
                _ = wait_for_deadline(deadline) => {
                    tracing::info!("Monitoring duration elapsed");
                    break;
                }
                _ = ticker.tick() => {
                    self.check_once().await?;
                }
            }
        }

        self.finalize().cloned()
    }

    /// Run the full pipeline for one probe: record, persist, evaluate, alert.
    pub async fn check_once(&mut self) -> Result<(), MonitorError> {
        let sample = self.prober.probe().await;
        let thresholds = self.target.thresholds;

        match (sample.response_time_ms(), sample.error()) {
            (Some(ms), _) => tracing::info!("Health check passed - {:.2}ms", ms),
            (_, Some(e)) => tracing::error!("Health check failed - {}", e),
            _ => {}
        }

        self.store.persist_sample(&sample)?;

        let mut alerts = Vec::new();
        alerts.extend(check_sample(&sample, &thresholds));
        let timestamp = sample.timestamp;
        self.state.record(sample);
        alerts.extend(check_availability(
            self.state.successful_checks(),
            self.state.total_checks(),
            &thresholds,
            timestamp,
        ));

        for alert in alerts {
            self.notifier.raise(&alert);
            self.store.persist_alert(&alert)?;
            self.state.push_alert(alert);
        }

        Ok(())
    }

    /// Compute and persist the run summary exactly once.
    ///
    /// Later calls return the stored summary without writing again.
    pub fn finalize(&mut self) -> Result<&Summary, MonitorError> {
        let summary = match self.summary.take() {
            Some(summary) => summary,
            None => {
                let summary = Summary::from_state(&self.target, &self.state, Utc::now());
                self.store.persist_summary(&summary)?;
                tracing::info!(
                    "Run summary written: {} checks ({} samples kept), health {}",
                    summary.total_checks,
                    self.state.samples().len(),
                    summary.health
                );
                summary
            }
        };

        Ok(&*self.summary.insert(summary))
    }
}

/// Resolves once the stop flag is set. A dropped sender never stops the run.
async fn wait_for_stop(stop_rx: &mut watch::Receiver<bool>) {
    if stop_rx.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn wait_for_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}
