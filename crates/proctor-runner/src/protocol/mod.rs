//! Request and result types exchanged with a [`ScriptExecutor`].
//!
//! [`ScriptExecutor`]: crate::agent::ScriptExecutor

use std::time::Duration;

use proctor_inspect::ScriptPath;
use serde::Serialize;

use crate::demotion::Demotion;

/// One invocation of the interpreter on a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    script: ScriptPath,
    input: String,
    demotion: Option<Demotion>,
    timeout: Option<Duration>,
}

impl ExecutionRequest {
    /// Creates a request with no demotion and no deadline.
    #[must_use]
    pub fn new(script: ScriptPath, input: impl Into<String>) -> Self {
        Self {
            script,
            input: input.into(),
            demotion: None,
            timeout: None,
        }
    }

    /// Sets the identity change applied to the child.
    #[must_use]
    pub const fn with_demotion(mut self, demotion: Demotion) -> Self {
        self.demotion = Some(demotion);
        self
    }

    /// Sets the deadline, or removes it with `None`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the script to run.
    #[must_use]
    pub const fn script(&self) -> &ScriptPath {
        &self.script
    }

    /// Returns the text written to the child's stdin.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the demotion, if any.
    #[must_use]
    pub const fn demotion(&self) -> Option<Demotion> {
        self.demotion
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Captured outcome of a child that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    stdout: String,
    stderr: String,
    exit_code: Option<i32>,
}

impl ExecutionResult {
    /// Creates a result from captured streams and an exit code.
    #[must_use]
    pub fn new(
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Returns everything the child wrote to stdout.
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Returns everything the child wrote to stderr.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Returns the exit code, or `None` if a signal ended the child.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Returns whether the child exited with status zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}
