//! Mutable accumulator for one monitoring session.

use chrono::{DateTime, Utc};

use crate::probe::Sample;
use crate::stats::availability;
use crate::threshold::Alert;

/// Owned by the session task; only its tick handler mutates it.
#[derive(Debug, Clone)]
pub struct RunState {
    pub start_time: DateTime<Utc>,
    total_checks: u64,
    successful_checks: u64,
    cumulative_response_time_ms: f64,
    samples: Vec<Sample>,
    alerts: Vec<Alert>,
}

impl RunState {
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            total_checks: 0,
            successful_checks: 0,
            cumulative_response_time_ms: 0.0,
            samples: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Count a completed check and keep its sample.
    pub fn record(&mut self, sample: Sample) {
        self.total_checks += 1;
        if let Some(response_time) = sample.response_time_ms() {
            self.successful_checks += 1;
            self.cumulative_response_time_ms += response_time;
        }
        self.samples.push(sample);
    }

    pub fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    pub fn total_checks(&self) -> u64 {
        self.total_checks
    }

    pub fn successful_checks(&self) -> u64 {
        self.successful_checks
    }

    pub fn failed_checks(&self) -> u64 {
        self.total_checks - self.successful_checks
    }

    /// Running availability, `None` before the first check.
    pub fn availability(&self) -> Option<f64> {
        availability(self.successful_checks, self.total_checks)
    }

    /// Running mean over successful checks.
    pub fn avg_response_time_ms(&self) -> Option<f64> {
        if self.successful_checks == 0 {
            None
        } else {
            Some(self.cumulative_response_time_ms / self.successful_checks as f64)
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }
}
