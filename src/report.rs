//! Human-readable rendering of run results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::store::{PerfReport, Summary};
use crate::threshold::Alert;

/// How many of the latest alerts a report shows.
pub const RECENT_ALERTS: usize = 5;

/// Overall health of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthVerdict {
    Good,
    Degraded,
    Critical,
    /// No check completed.
    Unknown,
}

impl HealthVerdict {
    /// GOOD when both limits hold, DEGRADED within 90% of the availability
    /// limit, CRITICAL otherwise.
    pub fn classify(availability: Option<f64>, avg_response_time_ms: Option<f64>, thresholds: &Thresholds) -> Self {
        let Some(availability) = availability else {
            return HealthVerdict::Unknown;
        };

        let fast_enough = avg_response_time_ms.map_or(true, |avg| avg <= thresholds.max_response_time_ms);
        if availability >= thresholds.min_availability_pct && fast_enough {
            HealthVerdict::Good
        } else if availability >= thresholds.min_availability_pct * 0.9 {
            HealthVerdict::Degraded
        } else {
            HealthVerdict::Critical
        }
    }
}

impl fmt::Display for HealthVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HealthVerdict::Good => "GOOD",
            HealthVerdict::Degraded => "DEGRADED",
            HealthVerdict::Critical => "CRITICAL",
            HealthVerdict::Unknown => "UNKNOWN",
        })
    }
}

/// Format a byte count as B, KB or MB with two decimals.
pub fn format_size(bytes: f64) -> String {
    if bytes < 1024.0 {
        format!("{:.2} B", bytes)
    } else if bytes < 1024.0 * 1024.0 {
        format!("{:.2} KB", bytes / 1024.0)
    } else {
        format!("{:.2} MB", bytes / (1024.0 * 1024.0))
    }
}

fn or_na(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}{}", v, unit))
}

const RULE: &str = "-------------------------------------------";

/// Render a monitoring summary and its most recent alerts.
pub fn render_report(summary: &Summary, alerts: &[Alert]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Monitoring Summary ({})\n", summary.environment));
    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!("Duration: {:.2} minutes\n", summary.duration_minutes));
    out.push_str(&format!("Total checks: {}\n", summary.total_checks));
    out.push_str(&format!("Successful checks: {}\n", summary.successful_checks));
    out.push_str(&format!("Failed checks: {}\n", summary.failed_checks));
    out.push_str(&format!("Availability: {}\n", or_na(summary.availability, "%")));
    out.push_str(&format!("Average response time: {}\n", or_na(summary.avg_response_time, "ms")));
    out.push_str(&format!("Total alerts: {}\n", summary.alert_count));
    out.push_str(&format!("{RULE}\n"));

    if !alerts.is_empty() {
        out.push_str("Recent alerts:\n");
        let skip = alerts.len().saturating_sub(RECENT_ALERTS);
        for alert in &alerts[skip..] {
            out.push_str(&format!(
                "[{}] {}: {}\n",
                alert.timestamp.to_rfc3339(),
                alert.kind.as_str(),
                alert.message
            ));
        }
    }

    out.push_str(&format!("Overall system health: {}", summary.health));
    out
}

/// Render a bounded-count performance report.
pub fn render_perf_report(report: &PerfReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    out.push_str("Performance Report\n");
    out.push_str(&format!("{RULE}\n"));
    out.push_str(&format!("URL: {}\n", report.url));
    out.push_str(&format!("Average Response Time: {}\n", or_na(s.average_response_time, " ms")));
    out.push_str(&format!(
        "Min/Max Response Time: {} / {}\n",
        or_na(s.min_response_time, " ms"),
        or_na(s.max_response_time, " ms")
    ));
    out.push_str(&format!(
        "p50/p95 Response Time: {} / {}\n",
        or_na(s.p50_response_time, " ms"),
        or_na(s.p95_response_time, " ms")
    ));
    out.push_str(&format!("Average Page Size: {}\n", s.average_size.as_deref().unwrap_or("n/a")));
    out.push_str(&format!("Number of Requests: {} ({} failed)\n", s.num_requests, s.failed_requests));

    if !report.issues.is_empty() {
        out.push_str("\nIssues Detected:\n");
        for issue in &report.issues {
            out.push_str(&format!(" - {issue}\n"));
        }
    }

    if !report.passed_checks.is_empty() {
        out.push_str("\nPassed Checks:\n");
        for check in &report.passed_checks {
            out.push_str(&format!(" - {check}\n"));
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::AlertKind;
    use chrono::{TimeZone, Utc};

    fn thresholds(response_time: f64, availability: f64) -> Thresholds {
        Thresholds {
            max_response_time_ms: response_time,
            min_availability_pct: availability,
            max_payload_bytes: 500 * 1024,
        }
    }

    #[test]
    fn test_classify() {
        let prod = thresholds(800.0, 99.9);
        assert_eq!(HealthVerdict::classify(Some(100.0), Some(400.0), &prod), HealthVerdict::Good);
        assert_eq!(HealthVerdict::classify(Some(100.0), Some(900.0), &prod), HealthVerdict::Degraded);
        assert_eq!(HealthVerdict::classify(Some(95.0), Some(400.0), &prod), HealthVerdict::Degraded);
        assert_eq!(HealthVerdict::classify(Some(80.0), Some(400.0), &prod), HealthVerdict::Critical);
        assert_eq!(HealthVerdict::classify(Some(0.0), None, &prod), HealthVerdict::Critical);
        assert_eq!(HealthVerdict::classify(None, None, &prod), HealthVerdict::Unknown);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512.0), "512.00 B");
        assert_eq!(format_size(2048.0), "2.00 KB");
        assert_eq!(format_size(3.0 * 1024.0 * 1024.0), "3.00 MB");
    }

    fn summary(alert_count: usize) -> Summary {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Summary {
            environment: "prod".into(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(2),
            duration_minutes: 2.0,
            total_checks: 10,
            successful_checks: 8,
            failed_checks: 2,
            availability: Some(80.0),
            avg_response_time: Some(400.0),
            alert_count,
            health: HealthVerdict::Critical,
        }
    }

    #[test]
    fn test_render_report_shows_last_five_alerts() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let alerts: Vec<Alert> = (0..7)
            .map(|i| Alert {
                timestamp: start,
                kind: AlertKind::Availability,
                message: format!("alert #{}", i),
            })
            .collect();

        let text = render_report(&summary(alerts.len()), &alerts);
        assert!(text.contains("Availability: 80.00%"));
        assert!(text.contains("Average response time: 400.00ms"));
        assert!(text.contains("Total alerts: 7"));
        assert!(!text.contains("alert #0"));
        assert!(!text.contains("alert #1"));
        for i in 2..7 {
            assert!(text.contains(&format!("alert #{}", i)));
        }
        assert!(text.ends_with("Overall system health: CRITICAL"));

        // Deterministic
        assert_eq!(text, render_report(&summary(alerts.len()), &alerts));
    }

    #[test]
    fn test_render_report_without_checks() {
        let mut s = summary(0);
        s.total_checks = 0;
        s.successful_checks = 0;
        s.failed_checks = 0;
        s.availability = None;
        s.avg_response_time = None;
        s.health = HealthVerdict::Unknown;

        let text = render_report(&s, &[]);
        assert!(text.contains("Availability: n/a"));
        assert!(!text.contains("Recent alerts"));
        assert!(text.ends_with("UNKNOWN"));
    }

    #[test]
    fn test_render_perf_report_lists_issues_and_passes() {
        let report = PerfReport {
            url: "http://localhost:8080".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            summary: crate::store::PerfSummary {
                average_response_time: Some(120.0),
                min_response_time: Some(100.0),
                max_response_time: Some(140.0),
                p50_response_time: Some(120.0),
                p95_response_time: Some(138.0),
                average_size: Some("2.00 KB".into()),
                availability: 80.0,
                num_requests: 5,
                failed_requests: 1,
            },
            details: Vec::new(),
            issues: vec!["Availability (80.00%) below threshold (100%), 1 of 5 requests failed".into()],
            passed_checks: vec!["Response time check passed (120.00 ms)".into()],
        };

        let text = render_perf_report(&report);
        assert!(text.starts_with("Performance Report\n"));
        assert!(text.contains("Average Response Time: 120.00 ms\n"));
        assert!(text.contains("Min/Max Response Time: 100.00 ms / 140.00 ms\n"));
        assert!(text.contains("Number of Requests: 5 (1 failed)\n"));
        assert!(text.contains("\nIssues Detected:\n - Availability (80.00%)"));
        assert!(text.ends_with("Passed Checks:\n - Response time check passed (120.00 ms)"));
    }
}
