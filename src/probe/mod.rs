//! Probe module for endpoint health checks.
//!
//! A probe is one timed request against a target. Every probe resolves to a
//! [`Sample`], whether the request succeeded or not.

mod http;

pub use http::*;

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Probe error types.
///
/// All variants except `Config` are per-sample failures and never stop a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("{0}")]
    Network(String),
    #[error("HTTP Error {status}: {reason}")]
    HttpStatus { status: u16, reason: String },
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// The recorded outcome of one probe.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Success {
        response_time_ms: f64,
        status_code: u16,
        size_bytes: u64,
    },
    Failure(ProbeError),
}

/// One probe result, immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub outcome: ProbeOutcome,
}

impl Sample {
    pub fn success(timestamp: DateTime<Utc>, response_time_ms: f64, status_code: u16, size_bytes: u64) -> Self {
        Self {
            timestamp,
            outcome: ProbeOutcome::Success {
                response_time_ms,
                status_code,
                size_bytes,
            },
        }
    }

    pub fn failure(timestamp: DateTime<Utc>, error: ProbeError) -> Self {
        Self {
            timestamp,
            outcome: ProbeOutcome::Failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Success { .. })
    }

    pub fn response_time_ms(&self) -> Option<f64> {
        match self.outcome {
            ProbeOutcome::Success { response_time_ms, .. } => Some(response_time_ms),
            ProbeOutcome::Failure(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.outcome {
            ProbeOutcome::Success { status_code, .. } => Some(status_code),
            ProbeOutcome::Failure(_) => None,
        }
    }

    pub fn size_bytes(&self) -> Option<u64> {
        match self.outcome {
            ProbeOutcome::Success { size_bytes, .. } => Some(size_bytes),
            ProbeOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match &self.outcome {
            ProbeOutcome::Success { .. } => None,
            ProbeOutcome::Failure(e) => Some(e),
        }
    }
}

/// Probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub url: String,
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(address: &str, timeout: Duration) -> Self {
        Self {
            url: normalize_url(address),
            timeout,
        }
    }
}

/// Issues timed GET requests against a single endpoint.
pub struct Prober {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl Prober {
    pub fn new(config: ProbeConfig) -> Result<Self, ProbeError> {
        if config.timeout.is_zero() {
            return Err(ProbeError::Config("timeout must be positive".to_string()));
        }
        let client = build_client(config.timeout)?;
        Ok(Self { client, config })
    }

    /// Run one probe. Always resolves within the timeout plus scheduling overhead.
    pub async fn probe(&self) -> Sample {
        let timestamp = Utc::now();
        let start = Instant::now();

        let result = tokio::time::timeout(
            self.config.timeout,
            run_http_probe(&self.client, &self.config.url, self.config.timeout),
        )
        .await
        .unwrap_or(Err(ProbeError::Timeout(self.config.timeout)));

        // Elapsed covers the full body transfer
        let response_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => Sample::success(
                timestamp,
                response_time_ms,
                response.status_code,
                response.size_bytes,
            ),
            Err(e) => Sample::failure(timestamp, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{spawn_test_server, Reply};

    #[test]
    fn test_sample_carries_exactly_one_payload() {
        let ok = Sample::success(Utc::now(), 12.5, 200, 1024);
        assert!(ok.is_success());
        assert_eq!(ok.response_time_ms(), Some(12.5));
        assert_eq!(ok.status_code(), Some(200));
        assert_eq!(ok.size_bytes(), Some(1024));
        assert!(ok.error().is_none());

        let failed = Sample::failure(Utc::now(), ProbeError::Network("connection refused".into()));
        assert!(!failed.is_success());
        assert!(failed.response_time_ms().is_none());
        assert!(failed.size_bytes().is_none());
        assert_eq!(failed.error().unwrap().to_string(), "connection refused");
    }

    #[test]
    fn test_error_messages() {
        let timeout = ProbeError::Timeout(Duration::from_millis(10_000));
        assert_eq!(timeout.to_string(), "Request timed out after 10000ms");

        let status = ProbeError::HttpStatus {
            status: 503,
            reason: "Service Unavailable".into(),
        };
        assert_eq!(status.to_string(), "HTTP Error 503: Service Unavailable");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = Prober::new(ProbeConfig::new("localhost", Duration::ZERO));
        assert!(matches!(result, Err(ProbeError::Config(_))));
    }

    #[tokio::test]
    async fn test_probe_success_measures_body() {
        let addr = spawn_test_server(vec![Reply::ok("hello world")]).await;
        let prober = Prober::new(ProbeConfig::new(&addr, Duration::from_secs(2))).unwrap();

        let sample = prober.probe().await;
        assert!(sample.is_success(), "unexpected failure: {:?}", sample.error());
        assert_eq!(sample.status_code(), Some(200));
        assert_eq!(sample.size_bytes(), Some(11));
        assert!(sample.response_time_ms().unwrap() >= 0.0);
    }

    #[tokio::test]
    async fn test_probe_non_2xx_is_failure() {
        let addr = spawn_test_server(vec![Reply::status(404, "Not Found")]).await;
        let prober = Prober::new(ProbeConfig::new(&addr, Duration::from_secs(2))).unwrap();

        let sample = prober.probe().await;
        assert_eq!(
            sample.error(),
            Some(&ProbeError::HttpStatus {
                status: 404,
                reason: "Not Found".into()
            })
        );
    }

    #[tokio::test]
    async fn test_probe_reports_standard_reason_phrase() {
        let addr = spawn_test_server(vec![Reply::status(503, "Down For Maintenance")]).await;
        let prober = Prober::new(ProbeConfig::new(&addr, Duration::from_secs(2))).unwrap();

        let sample = prober.probe().await;
        assert_eq!(
            sample.error().unwrap().to_string(),
            "HTTP Error 503: Service Unavailable"
        );
    }

    #[tokio::test]
    async fn test_probe_redirect_is_failure() {
        let addr = spawn_test_server(vec![Reply::status(301, "Moved Permanently")]).await;
        let prober = Prober::new(ProbeConfig::new(&addr, Duration::from_secs(2))).unwrap();

        let sample = prober.probe().await;
        assert!(matches!(
            sample.error(),
            Some(ProbeError::HttpStatus { status: 301, .. })
        ));
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        let addr = spawn_test_server(vec![Reply::Hang]).await;
        let timeout = Duration::from_millis(200);
        let prober = Prober::new(ProbeConfig::new(&addr, timeout)).unwrap();

        let start = Instant::now();
        let sample = prober.probe().await;
        assert_eq!(sample.error(), Some(&ProbeError::Timeout(timeout)));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let prober = Prober::new(ProbeConfig::new(&addr.to_string(), Duration::from_secs(2))).unwrap();
        let sample = prober.probe().await;
        assert!(matches!(sample.error(), Some(ProbeError::Network(_))));
    }
}
