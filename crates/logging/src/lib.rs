//! MerkleDrop Logging
//!
//! Logging setup for programs embedding the distributor.
//!
//! ## Usage
//!
//! ```no_run
//! use merkledrop_logging::{init, LogLevel};
//!
//! // Initialize with info level
//! init(LogLevel::Info);
//!
//! // Or from a verbosity count (`-v`, `-vv`)
//! init(LogLevel::from_verbosity(2));
//! ```
//!
//! The level applies to the `merkledrop_*` crates; everything else stays at
//! `warn`. `RUST_LOG` overrides both when set.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Target prefix shared by every crate in the workspace
const CRATE_TARGET: &str = "merkledrop";

/// Log level for the distributor crates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Stage summaries, warnings and errors (default)
    #[default]
    Info,
    /// Per-stage details
    Debug,
    /// All messages including trace
    Trace,
}

impl LogLevel {
    /// Create a log level from a verbose flag
    ///
    /// - `false` → `Info`
    /// - `true` → `Debug`
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Self::Debug
        } else {
            Self::Info
        }
    }

    /// Create a log level from a verbosity count
    ///
    /// - `0` → `Info`
    /// - `1` → `Debug`
    /// - `2+` → `Trace`
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Info,
            1 => Self::Debug,
            _ => Self::Trace,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// `EnvFilter` directive for this level.
    pub fn directive(&self) -> String {
        format!("warn,{}={}", CRATE_TARGET, self.as_str())
    }
}

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()))
}

/// Initialize logging with the specified level
///
/// Call this once at the start of your application.
///
/// # Panics
///
/// Panics if a global subscriber is already set.
/// Use `try_init` if you need to handle this case.
pub fn init(level: LogLevel) {
    try_init(level).expect("Failed to initialize logging");
}

/// Try to initialize logging, returning an error if already initialized
pub fn try_init(level: LogLevel) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(false)
        .try_init()
        .map_err(|e| e.to_string())
}

/// Initialize logging, optionally printing each event's module path
pub fn init_with_target(level: LogLevel, show_target: bool) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(show_target)
        .try_init()
        .map_err(|e| e.to_string())
}

/// Initialize logging for tests (captured by the test harness)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(LogLevel::Debug.directive()))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_verbose() {
        assert_eq!(LogLevel::from_verbose(false), LogLevel::Info);
        assert_eq!(LogLevel::from_verbose(true), LogLevel::Debug);
    }

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(LogLevel::from_verbosity(0), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(1), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(2), LogLevel::Trace);
        assert_eq!(LogLevel::from_verbosity(10), LogLevel::Trace);
    }

    #[test]
    fn test_directive_scopes_workspace_crates() {
        assert_eq!(LogLevel::Info.directive(), "warn,merkledrop=info");
        assert_eq!(LogLevel::Trace.directive(), "warn,merkledrop=trace");
        assert!(EnvFilter::try_new(LogLevel::Debug.directive()).is_ok());
    }

    #[test]
    fn test_log_level_serde() {
        assert_eq!(serde_json::to_string(&LogLevel::Debug).unwrap(), "\"debug\"");
        let parsed: LogLevel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(parsed, LogLevel::Warn);
    }

    #[test]
    fn test_log_level_default() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn test_try_init_twice() {
        init_test();
        assert!(try_init(LogLevel::Info).is_err());
    }
}
