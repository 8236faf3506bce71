//! The execution agent used by the grading harness.
//!
//! [`ExecutionAgent`] ties the pieces together for one submission: it
//! validates the script path, resolves the configured account, prepares a
//! [`Demotion`] and hands an [`ExecutionRequest`] to a [`ScriptExecutor`].
//! Validation and resolution both happen before anything is spawned, so a
//! bad path or a missing account leaves no trace on the host.
//!
//! Failures are logged at `error` level and returned to the caller.

use std::path::{Path, PathBuf};
use std::time::Duration;

use proctor_inspect::ScriptPath;
use tracing::{debug, error, warn};

use crate::demotion::Demotion;
use crate::error::RunError;
use crate::identity::{AccountResolver, Identity, SystemAccounts};
use crate::process::ProcessRunner;
use crate::protocol::{ExecutionRequest, ExecutionResult};

/// Tracing target for agent orchestration.
const AGENT_TARGET: &str = "proctor_runner::agent";

/// Abstraction over launching a script, so tests can avoid real processes.
///
/// The production implementation is [`ProcessRunner`].
pub trait ScriptExecutor {
    /// Runs the request to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`RunError`] if the child cannot be started, its streams
    /// fail, or it outlives the request's deadline.
    fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, RunError>;
}

/// Settings shared by every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSettings {
    account: String,
    timeout: Option<Duration>,
}

impl AgentSettings {
    /// Creates settings for the given account and deadline.
    #[must_use]
    pub fn new(account: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            account: account.into(),
            timeout,
        }
    }

    /// Returns the account scripts run as.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Returns the per-run deadline.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Runs submissions under a demoted identity.
#[derive(Debug)]
pub struct ExecutionAgent<R, E> {
    settings: AgentSettings,
    resolver: R,
    executor: E,
}

impl ExecutionAgent<SystemAccounts, ProcessRunner> {
    /// Creates an agent backed by the host account database and a real
    /// interpreter.
    #[must_use]
    pub fn system(settings: AgentSettings, interpreter: impl Into<PathBuf>) -> Self {
        Self::new(settings, SystemAccounts, ProcessRunner::new(interpreter))
    }
}

impl<R, E> ExecutionAgent<R, E> {
    /// Creates an agent from its parts.
    #[must_use]
    pub const fn new(settings: AgentSettings, resolver: R, executor: E) -> Self {
        Self {
            settings,
            resolver,
            executor,
        }
    }

    /// Returns the agent's settings.
    #[must_use]
    pub const fn settings(&self) -> &AgentSettings {
        &self.settings
    }
}

impl<R: AccountResolver, E: ScriptExecutor> ExecutionAgent<R, E> {
    /// Runs the script at `script` with `input` on its stdin.
    ///
    /// A script that fails inside the interpreter still returns `Ok`; its
    /// traceback is in [`ExecutionResult::stderr`] and the exit code is
    /// non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::InvalidInputKind`] for a path without the `.py`
    /// extension, any error from the account resolver, or any error from the
    /// executor.
    pub fn run(&self, script: impl AsRef<Path>, input: &str) -> Result<ExecutionResult, RunError> {
        let path = script.as_ref();
        self.try_run(path, input).inspect_err(|err| {
            error!(
                target: AGENT_TARGET,
                script = %path.display(),
                account = self.settings.account(),
                error = %err,
                "script execution failed"
            );
        })
    }

    fn try_run(&self, path: &Path, input: &str) -> Result<ExecutionResult, RunError> {
        let script = ScriptPath::new(path)?;
        let identity = self.resolver.resolve(self.settings.account())?;
        if identity == Identity::current() {
            warn!(
                target: AGENT_TARGET,
                account = self.settings.account(),
                uid = identity.uid(),
                "agent already runs as the target account; demotion changes nothing"
            );
        }

        debug!(
            target: AGENT_TARGET,
            script = %script,
            uid = identity.uid(),
            gid = identity.gid(),
            timeout_secs = self.settings.timeout().map(|timeout| timeout.as_secs()),
            "running script"
        );
        let request = ExecutionRequest::new(script, input)
            .with_demotion(Demotion::new(identity))
            .with_timeout(self.settings.timeout());
        self.executor.execute(&request)
    }
}
