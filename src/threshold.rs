//! Threshold evaluation: turns measurements into alerts.
//!
//! Alerts are never deduplicated. A condition that stays breached raises an
//! alert on every check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::probe::Sample;
use crate::report::format_size;
use crate::stats::{availability, SummaryStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Performance,
    Availability,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Performance => "performance",
            AlertKind::Availability => "availability",
        }
    }
}

/// A breached threshold. Immutable once raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
}

/// Per-sample rule: a successful response slower than the limit.
pub fn check_sample(sample: &Sample, thresholds: &Thresholds) -> Option<Alert> {
    let response_time = sample.response_time_ms()?;
    if response_time <= thresholds.max_response_time_ms {
        return None;
    }

    Some(Alert {
        timestamp: sample.timestamp,
        kind: AlertKind::Performance,
        message: format!(
            "Response time ({:.2}ms) exceeds threshold ({}ms)",
            response_time, thresholds.max_response_time_ms
        ),
    })
}

/// Running rule: availability over every check so far.
pub fn check_availability(
    successful: u64,
    total: u64,
    thresholds: &Thresholds,
    timestamp: DateTime<Utc>,
) -> Option<Alert> {
    let pct = availability(successful, total)?;
    if pct >= thresholds.min_availability_pct {
        return None;
    }

    Some(Alert {
        timestamp,
        kind: AlertKind::Availability,
        message: format!(
            "Availability ({:.2}%) below threshold ({}%)",
            pct, thresholds.min_availability_pct
        ),
    })
}

/// Outcome of the batch rule: one issue or one passed entry per dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchVerdict {
    pub issues: Vec<String>,
    pub passed: Vec<String>,
}

impl BatchVerdict {
    fn record(&mut self, outcome: Result<String, String>) {
        match outcome {
            Ok(passed) => self.passed.push(passed),
            Err(issue) => self.issues.push(issue),
        }
    }
}

/// Batch rule for bounded-count runs: mean latency, mean size, availability.
pub fn check_batch(stats: &SummaryStats, thresholds: &Thresholds) -> BatchVerdict {
    let mut verdict = BatchVerdict::default();

    verdict.record(match stats.mean_response_time_ms {
        None => Err("Response time check failed: no successful responses".to_string()),
        Some(avg) if avg > thresholds.max_response_time_ms => Err(format!(
            "Average response time ({:.2} ms) exceeds threshold ({} ms)",
            avg, thresholds.max_response_time_ms
        )),
        Some(avg) => Ok(format!("Response time check passed ({:.2} ms)", avg)),
    });

    let max_size = thresholds.max_payload_bytes as f64;
    verdict.record(match stats.mean_size_bytes {
        None => Err("Page size check failed: no successful responses".to_string()),
        Some(avg) if avg > max_size => Err(format!(
            "Average page size ({}) exceeds threshold ({})",
            format_size(avg),
            format_size(max_size)
        )),
        Some(avg) => Ok(format!("Page size check passed ({})", format_size(avg))),
    });

    verdict.record(if stats.availability_pct < thresholds.min_availability_pct {
        Err(format!(
            "Availability ({:.2}%) below threshold ({}%), {} of {} requests failed",
            stats.availability_pct,
            thresholds.min_availability_pct,
            stats.failed(),
            stats.total
        ))
    } else {
        Ok(format!("Availability check passed ({:.2}%)", stats.availability_pct))
    });

    verdict
}
