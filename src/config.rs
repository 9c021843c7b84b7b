//! Configuration module for PulseWatch.
//!
//! Loads runtime settings from environment variables with sensible defaults
//! and resolves named environments into monitoring targets.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Default probe timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Payload size limit shared by every built-in environment (500 KiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: u64 = 500 * 1024;

/// Startup configuration errors. Always fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown environment \"{0}\". Valid options: dev, prod, local")]
    UnknownEnvironment(String),
    #[error("invalid option {name}: {reason}")]
    InvalidOption { name: String, reason: String },
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Directory holding metrics, logs and reports (default: ".")
    pub data_dir: PathBuf,
    /// Per-probe timeout (default: 10s)
    pub timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PULSEWATCH_DATA_DIR`: output directory (default: ".")
    /// - `PULSEWATCH_TIMEOUT_MS`: probe timeout in milliseconds (default: 10000)
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(dir) = env::var("PULSEWATCH_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }

        if let Ok(timeout_str) = env::var("PULSEWATCH_TIMEOUT_MS") {
            match timeout_str.parse::<u64>() {
                Ok(ms) if ms > 0 => cfg.timeout = Duration::from_millis(ms),
                _ => tracing::warn!(
                    "Ignoring invalid PULSEWATCH_TIMEOUT_MS={:?}, using {}ms",
                    timeout_str,
                    DEFAULT_TIMEOUT_MS
                ),
            }
        }

        cfg
    }

    /// Append-only per-sample metrics file for an environment.
    pub fn metrics_path(&self, env_name: &str) -> PathBuf {
        self.data_dir.join(format!("metrics-{}.json", env_name))
    }

    /// Append-only run summary log for an environment.
    pub fn summary_log_path(&self, env_name: &str) -> PathBuf {
        self.data_dir.join(format!("monitor-{}.log", env_name))
    }

    /// Append-only alert log for an environment.
    pub fn alert_log_path(&self, env_name: &str) -> PathBuf {
        self.data_dir.join(format!("alerts-{}.log", env_name))
    }

    /// Default location of the bounded-count report.
    pub fn report_path(&self) -> PathBuf {
        self.data_dir.join("performance-report.json")
    }
}

/// Limits a measurement is checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub max_response_time_ms: f64,
    pub min_availability_pct: f64,
    pub max_payload_bytes: u64,
}

/// An endpoint to monitor along with its environment label and limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub environment: String,
    pub url: String,
    pub thresholds: Thresholds,
}

impl Target {
    /// Target used by ad-hoc performance checks against an arbitrary URL.
    pub fn perf_check(url: &str) -> Self {
        Self {
            environment: "perf-check".to_string(),
            url: url.to_string(),
            thresholds: Thresholds {
                max_response_time_ms: 1000.0,
                min_availability_pct: 100.0,
                max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            },
        }
    }
}

/// Named deployment environments with fixed endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
    Local,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Prod, Environment::Local];

    pub fn name(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
            Environment::Local => "local",
        }
    }

    /// Resolve the environment into its monitoring target.
    pub fn target(&self) -> Target {
        let (url, max_response_time_ms, min_availability_pct) = match self {
            Environment::Dev => ("https://todoappdevstatic.z13.web.core.windows.net/", 1500.0, 95.0),
            Environment::Prod => ("https://todoapprodstatic.z13.web.core.windows.net/", 800.0, 99.9),
            Environment::Local => ("http://localhost:8080", 300.0, 99.0),
        };

        Target {
            environment: self.name().to_string(),
            url: url.to_string(),
            thresholds: Thresholds {
                max_response_time_ms,
                min_availability_pct,
                max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            },
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.name() == s)
            .ok_or_else(|| ConfigError::UnknownEnvironment(s.to_string()))
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
