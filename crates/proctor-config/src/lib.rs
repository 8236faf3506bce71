//! Shared configuration for the `proctor` agent.
//!
//! Settings are taken from command-line flags, then `PROCTOR_*` environment
//! variables, then the built-in defaults in [`defaults`]. There is no
//! configuration file.
//!
//! [`Config`] is a `clap` argument group so the binary can flatten it into its
//! own parser.

/// Built-in default values.
pub mod defaults;
/// Log output format selection.
pub mod logging;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;

pub use self::logging::LogFormat;

/// Environment variable naming the account scripts run as.
pub const ACCOUNT_ENV: &str = "PROCTOR_ACCOUNT";
/// Environment variable naming the interpreter.
pub const INTERPRETER_ENV: &str = "PROCTOR_INTERPRETER";
/// Environment variable holding the deadline in seconds.
pub const TIMEOUT_ENV: &str = "PROCTOR_TIMEOUT_SECS";
/// Environment variable holding the log filter.
pub const LOG_FILTER_ENV: &str = "PROCTOR_LOG_FILTER";
/// Environment variable holding the log format.
pub const LOG_FORMAT_ENV: &str = "PROCTOR_LOG_FORMAT";

/// Runtime settings for the agent.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct Config {
    /// Unprivileged account that submissions run as.
    #[arg(
        long,
        global = true,
        env = ACCOUNT_ENV,
        default_value = defaults::DEFAULT_ACCOUNT,
        value_name = "NAME"
    )]
    pub account: String,

    /// Interpreter launched as `<interpreter> <script>`.
    #[arg(
        long,
        global = true,
        env = INTERPRETER_ENV,
        default_value = defaults::DEFAULT_INTERPRETER,
        value_name = "PROG"
    )]
    pub interpreter: PathBuf,

    /// Seconds a script may run before it is killed; 0 disables the deadline.
    #[arg(
        long,
        global = true,
        env = TIMEOUT_ENV,
        default_value_t = defaults::DEFAULT_TIMEOUT_SECS,
        value_name = "N"
    )]
    pub timeout_secs: u64,

    /// Log filter expression, for example `info` or `proctor_runner=debug`.
    #[arg(
        long,
        global = true,
        env = LOG_FILTER_ENV,
        default_value = defaults::DEFAULT_LOG_FILTER,
        value_name = "EXPR"
    )]
    pub log_filter: String,

    /// Log output format.
    #[arg(
        long,
        global = true,
        env = LOG_FORMAT_ENV,
        default_value_t = defaults::default_log_format(),
        value_name = "json|compact"
    )]
    pub log_format: LogFormat,
}

impl Config {
    /// Returns the account scripts run as.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Returns the interpreter program.
    #[must_use]
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Returns the per-run deadline, or `None` when it is disabled.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            account: defaults::DEFAULT_ACCOUNT.to_owned(),
            interpreter: PathBuf::from(defaults::DEFAULT_INTERPRETER),
            timeout_secs: defaults::DEFAULT_TIMEOUT_SECS,
            log_filter: defaults::default_log_filter().to_owned(),
            log_format: defaults::default_log_format(),
        }
    }
}
