//! Persisted record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Target;
use crate::probe::Sample;
use crate::report::HealthVerdict;
use crate::scheduler::RunState;
use crate::stats::SummaryStats;

/// Format revision written into metrics headers.
pub const METRICS_VERSION: u32 = 1;

/// First line of a metrics file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunHeader {
    pub environment: String,
    pub start_time: DateTime<Utc>,
    pub host: String,
    pub metrics_version: u32,
}

/// One sample as stored in the metrics file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

impl From<&Sample> for MetricRecord {
    fn from(sample: &Sample) -> Self {
        Self {
            timestamp: sample.timestamp,
            response_time: sample.response_time_ms(),
            status_code: sample.status_code(),
            content_size: sample.size_bytes(),
            error: sample.error().map(|e| e.to_string()),
            success: sample.is_success(),
        }
    }
}

/// End-of-run snapshot of a monitoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub environment: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: f64,
    pub total_checks: u64,
    pub successful_checks: u64,
    pub failed_checks: u64,
    /// `None` when no check completed.
    pub availability: Option<f64>,
    /// `None` when no check succeeded.
    pub avg_response_time: Option<f64>,
    pub alert_count: usize,
    pub health: HealthVerdict,
}

impl Summary {
    pub fn from_state(target: &Target, state: &RunState, end_time: DateTime<Utc>) -> Self {
        let elapsed_ms = (end_time - state.start_time).num_milliseconds().max(0);
        let availability = state.availability();
        let avg_response_time = state.avg_response_time_ms();

        Self {
            environment: target.environment.clone(),
            start_time: state.start_time,
            end_time,
            duration_minutes: round2(elapsed_ms as f64 / 60_000.0),
            total_checks: state.total_checks(),
            successful_checks: state.successful_checks(),
            failed_checks: state.failed_checks(),
            availability: availability.map(round2),
            avg_response_time: avg_response_time.map(round2),
            alert_count: state.alerts().len(),
            health: HealthVerdict::classify(availability, avg_response_time, &target.thresholds),
        }
    }
}

/// Bounded-count report, overwritten on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfReport {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub summary: PerfSummary,
    pub details: Vec<RequestDetail>,
    pub issues: Vec<String>,
    pub passed_checks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerfSummary {
    pub average_response_time: Option<f64>,
    pub min_response_time: Option<f64>,
    pub max_response_time: Option<f64>,
    pub p50_response_time: Option<f64>,
    pub p95_response_time: Option<f64>,
    pub average_size: Option<String>,
    pub availability: f64,
    pub num_requests: u64,
    pub failed_requests: u64,
}

impl From<&SummaryStats> for PerfSummary {
    fn from(stats: &SummaryStats) -> Self {
        Self {
            average_response_time: stats.mean_response_time_ms.map(round2),
            min_response_time: stats.min_response_time_ms.map(round2),
            max_response_time: stats.max_response_time_ms.map(round2),
            p50_response_time: stats.p50_response_time_ms.map(round2),
            p95_response_time: stats.p95_response_time_ms.map(round2),
            average_size: stats.mean_size_bytes.map(crate::report::format_size),
            availability: round2(stats.availability_pct),
            num_requests: stats.total,
            failed_requests: stats.failed(),
        }
    }
}

/// Per-request entry, included with `--detailed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetail {
    pub request_number: usize,
    pub response_time: Option<f64>,
    pub size: Option<u64>,
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestDetail {
    pub fn new(request_number: usize, sample: &Sample) -> Self {
        Self {
            request_number,
            response_time: sample.response_time_ms().map(round2),
            size: sample.size_bytes(),
            status_code: sample.status_code(),
            error: sample.error().map(|e| e.to_string()),
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
