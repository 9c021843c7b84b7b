//! Subcommand entry points.

pub mod monitor;
pub mod perf_check;

/// Error type returned by command entry points.
pub type CommandError = Box<dyn std::error::Error + Send + Sync>;
