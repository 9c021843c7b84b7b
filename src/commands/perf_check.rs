//! `pulsewatch perf-check`: a bounded run of sequential probes and a report.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;

use super::CommandError;
use crate::config::{ConfigError, MonitorConfig, Target};
use crate::probe::{normalize_url, ProbeConfig, Prober};
use crate::report::render_perf_report;
use crate::scheduler::sample_n;
use crate::stats::aggregate;
use crate::store::{write_json_file, PerfReport, PerfSummary, RequestDetail};
use crate::threshold::check_batch;

/// Most requests a single `perf-check` run may issue.
pub const MAX_REQUESTS: u64 = 10_000;

/// Options of `pulsewatch perf-check`.
#[derive(Debug, Clone)]
pub struct PerfCheckArgs {
    pub url: String,
    pub detailed: bool,
    pub ci: bool,
    pub requests: u64,
    pub output: Option<PathBuf>,
}

impl PerfCheckArgs {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_REQUESTS).contains(&self.requests) {
            return Err(ConfigError::InvalidOption {
                name: "--requests".to_string(),
                reason: format!("must be between 1 and {}", MAX_REQUESTS),
            });
        }
        Ok(())
    }
}

pub async fn run(cfg: &MonitorConfig, args: PerfCheckArgs) -> Result<ExitCode, CommandError> {
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return Ok(ExitCode::FAILURE);
    }

    let target = Target::perf_check(&normalize_url(&args.url));
    tracing::info!("Starting performance check for {}", target.url);

    match check(cfg, &target, &args).await {
        Ok(report) => {
            println!("{}", render_perf_report(&report));
            if args.ci && !report.issues.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!("Error running performance test: {}", e);
            Ok(if args.ci { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
    }
}

/// Probe the target `args.requests` times and write the report file.
pub async fn check(cfg: &MonitorConfig, target: &Target, args: &PerfCheckArgs) -> Result<PerfReport, CommandError> {
    let timestamp = Utc::now();
    let prober = Prober::new(ProbeConfig::new(&target.url, cfg.timeout))?;

    let samples = sample_n(&prober, args.requests as usize).await;
    let stats = aggregate(&samples)?;
    let verdict = check_batch(&stats, &target.thresholds);

    let details = if args.detailed {
        samples
            .iter()
            .enumerate()
            .map(|(i, sample)| RequestDetail::new(i + 1, sample))
            .collect()
    } else {
        Vec::new()
    };

    let report = PerfReport {
        url: target.url.clone(),
        timestamp,
        summary: PerfSummary::from(&stats),
        details,
        issues: verdict.issues,
        passed_checks: verdict.passed,
    };

    let path = args.output.clone().unwrap_or_else(|| cfg.report_path());
    write_json_file(&path, &report)?;
    tracing::info!("Report saved to {}", path.display());

    Ok(report)
}
