//! Bounded-count sampling for ad-hoc performance checks.

use crate::probe::{Prober, Sample};

/// Probe `count` times, strictly one after another.
///
/// Each probe finishes (or times out) before the next starts. Samples come
/// back in issuance order, failures included.
pub async fn sample_n(prober: &Prober, count: usize) -> Vec<Sample> {
    let mut samples = Vec::new();

    for i in 0..count {
        let sample = prober.probe().await;
        match sample.error() {
            None => tracing::debug!("Request {}/{} completed", i + 1, count),
            Some(e) => tracing::warn!("Request {}/{} failed: {}", i + 1, count, e),
        }
        samples.push(sample);
    }

    samples
}
