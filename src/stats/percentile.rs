//! Latency percentiles backed by a t-digest.

use tdigests::TDigest;

/// Compression used for batch digests.
const DIGEST_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyPercentiles {
    pub p50: f64,
    pub p95: f64,
}

impl LatencyPercentiles {
    /// Estimate percentiles of the given latencies, `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut td = TDigest::from_values(values.to_vec());
        td.compress(DIGEST_SIZE);

        // Estimates can drift outside the observed range on tiny batches
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let clamp = |q: f64| td.estimate_quantile(q).clamp(min, max);

        Some(Self {
            p50: clamp(0.5),
            p95: clamp(0.95),
        })
    }
}
