//! Aggregation of probe samples into summary statistics.

mod percentile;

pub use percentile::*;

use thiserror::Error;

use crate::probe::Sample;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("no samples to aggregate")]
    NoSamples,
}

/// Percentage of successful checks, undefined when nothing was checked.
pub fn availability(successful: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(successful.min(total) as f64 / total as f64 * 100.0)
}

/// Statistics over one batch of samples.
///
/// Latency and size figures cover successful samples only and are `None`
/// when there were none.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub total: u64,
    pub successful: u64,
    pub availability_pct: f64,
    pub mean_response_time_ms: Option<f64>,
    pub min_response_time_ms: Option<f64>,
    pub max_response_time_ms: Option<f64>,
    pub p50_response_time_ms: Option<f64>,
    pub p95_response_time_ms: Option<f64>,
    pub mean_size_bytes: Option<f64>,
}

impl SummaryStats {
    pub fn failed(&self) -> u64 {
        self.total - self.successful
    }
}

/// Reduce an ordered, non-empty sequence of samples.
pub fn aggregate(samples: &[Sample]) -> Result<SummaryStats, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::NoSamples);
    }

    let latencies: Vec<f64> = samples.iter().filter_map(Sample::response_time_ms).collect();
    let sizes: Vec<f64> = samples
        .iter()
        .filter_map(Sample::size_bytes)
        .map(|s| s as f64)
        .collect();

    let total = samples.len() as u64;
    let successful = latencies.len() as u64;
    let percentiles = LatencyPercentiles::from_values(&latencies);

    Ok(SummaryStats {
        total,
        successful,
        availability_pct: availability(successful, total).unwrap_or(0.0),
        mean_response_time_ms: mean(&latencies),
        min_response_time_ms: latencies.iter().copied().reduce(f64::min),
        max_response_time_ms: latencies.iter().copied().reduce(f64::max),
        p50_response_time_ms: percentiles.as_ref().map(|p| p.p50),
        p95_response_time_ms: percentiles.as_ref().map(|p| p.p95),
        mean_size_bytes: mean(&sizes),
    })
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
