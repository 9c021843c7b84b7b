//! Durable storage for PulseWatch runs.
//!
//! Every environment gets three append-only JSON-lines files: per-sample
//! metrics, raised alerts, and one summary per completed run.

mod files;
mod models;

pub use files::*;
pub use models::*;

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::MonitorConfig;
use crate::probe::Sample;
use crate::threshold::Alert;

/// Storage error types. Never masked: a write failure ends the run.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The files backing one environment's monitoring runs.
pub struct RunStore {
    metrics: JsonLinesFile,
    alerts: JsonLinesFile,
    summaries: JsonLinesFile,
}

impl RunStore {
    /// Open the environment's files, writing a metrics header for a fresh file.
    pub fn open(config: &MonitorConfig, environment: &str, start_time: DateTime<Utc>) -> Result<Self, StoreError> {
        let mut metrics = JsonLinesFile::open(config.metrics_path(environment))?;
        if metrics.is_empty()? {
            metrics.append(&RunHeader {
                environment: environment.to_string(),
                start_time,
                host: host_name(),
                metrics_version: METRICS_VERSION,
            })?;
        }

        let store = Self {
            metrics,
            alerts: JsonLinesFile::open(config.alert_log_path(environment))?,
            summaries: JsonLinesFile::open(config.summary_log_path(environment))?,
        };
        tracing::info!("Writing metrics to {}", store.metrics.path().display());
        Ok(store)
    }

    pub fn persist_sample(&mut self, sample: &Sample) -> Result<(), StoreError> {
        self.metrics.append(&MetricRecord::from(sample))
    }

    pub fn persist_alert(&mut self, alert: &Alert) -> Result<(), StoreError> {
        self.alerts.append(alert)
    }

    pub fn persist_summary(&mut self, summary: &Summary) -> Result<(), StoreError> {
        self.summaries.append(summary)
    }
}

/// Best-effort host name for metrics headers.
pub fn host_name() -> String {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> MonitorConfig {
        MonitorConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = TempDir::new().unwrap();
        let cfg = config(&dir);

        let mut store = RunStore::open(&cfg, "dev", Utc::now()).unwrap();
        store.persist_sample(&Sample::success(Utc::now(), 10.0, 200, 5)).unwrap();
        drop(store);

        let mut store = RunStore::open(&cfg, "dev", Utc::now()).unwrap();
        store.persist_sample(&Sample::success(Utc::now(), 20.0, 200, 5)).unwrap();

        let lines: Vec<Value> = read_json_lines(&cfg.metrics_path("dev"));
        assert_eq!(lines.len(), 3);
        let header: RunHeader = serde_json::from_value(lines[0].clone()).unwrap();
        assert_eq!(header.environment, "dev");
        assert_eq!(header.metrics_version, 1);
        assert_eq!(lines[1]["responseTime"], 10.0);
        assert_eq!(lines[2]["responseTime"], 20.0);
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let cfg = MonitorConfig {
            data_dir: blocker,
            ..Default::default()
        };
        let result = RunStore::open(&cfg, "dev", Utc::now());
        assert!(matches!(result, Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_host_name_is_never_empty() {
        assert!(!host_name().is_empty());
    }
}
