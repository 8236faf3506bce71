use crate::logging::LogFormat;

/// Account submissions run as when none is configured.
pub const DEFAULT_ACCOUNT: &str = "hacker";

/// Interpreter launched for each submission.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Per-run deadline in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
