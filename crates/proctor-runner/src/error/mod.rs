//! Errors raised while demoting and running a submission.
//!
//! Every failure on the execution path is returned as a typed [`RunError`];
//! nothing is reduced to a log line and an empty result. I/O errors are
//! wrapped in `Arc` to satisfy the `result_large_err` Clippy lint.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use proctor_inspect::InvalidScriptPath;
use thiserror::Error;

/// Errors arising from running a script.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RunError {
    /// The path does not carry the recognised script extension.
    #[error(transparent)]
    InvalidInputKind(#[from] InvalidScriptPath),

    /// The configured account does not exist on this host.
    #[error("account '{account}' does not exist")]
    AccountNotFound {
        /// Account name that was looked up.
        account: String,
    },

    /// The account database could not be queried.
    #[error("failed to look up account '{account}': {message}")]
    AccountLookup {
        /// Account name that was looked up.
        account: String,
        /// Description of the lookup failure.
        message: String,
    },

    /// The account resolves to a superuser identity.
    #[error("account '{account}' is privileged (uid {uid}, gid {gid})")]
    PrivilegedAccount {
        /// Account name that was looked up.
        account: String,
        /// Resolved user id.
        uid: u32,
        /// Resolved group id.
        gid: u32,
    },

    /// The interpreter could not be started, or privilege demotion failed
    /// in the child before exec.
    #[error("failed to start '{}': {source}", interpreter.display())]
    SpawnFailed {
        /// Interpreter that was launched.
        interpreter: PathBuf,
        /// Underlying OS error.
        #[source]
        source: Arc<io::Error>,
    },

    /// Communication with the running child failed.
    #[error("I/O error on child {stream}: {source}")]
    Io {
        /// Stream or operation that failed.
        stream: &'static str,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The child did not exit before the deadline and was killed.
    #[error("script timed out after {timeout_secs}s")]
    Timeout {
        /// Configured deadline in whole seconds.
        timeout_secs: u64,
    },

    /// The runner itself failed, for example a pipe thread panicked.
    #[error("execution failed: {message}")]
    Orchestration {
        /// Description of the failure.
        message: String,
    },
}

impl RunError {
    /// Creates a spawn failure for `interpreter`.
    #[must_use]
    pub fn spawn_failed(interpreter: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SpawnFailed {
            interpreter: interpreter.into(),
            source: Arc::new(source),
        }
    }

    /// Creates an I/O error for the named stream.
    #[must_use]
    pub fn io(stream: &'static str, source: io::Error) -> Self {
        Self::Io {
            stream,
            source: Arc::new(source),
        }
    }

    /// Creates an orchestration failure.
    #[must_use]
    pub fn orchestration(message: impl Into<String>) -> Self {
        Self::Orchestration {
            message: message.into(),
        }
    }
}
