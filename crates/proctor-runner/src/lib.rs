//! Privilege-demoted execution of learner-submitted scripts.
//!
//! The grading harness hands the agent a script path and the text to feed the
//! script on stdin. The agent:
//!
//! 1. checks that the path names a `.py` file;
//! 2. resolves the configured low-privilege account to a numeric
//!    [`Identity`];
//! 3. spawns the interpreter with a [`Demotion`] installed as a pre-exec hook,
//!    so the child drops to that identity before the interpreter starts;
//! 4. feeds the input, drains stdout and stderr concurrently, and waits for
//!    exit under an optional deadline.
//!
//! The result is the complete captured output plus the exit code. Every
//! failure along the way is a typed [`RunError`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use proctor_runner::{AgentSettings, ExecutionAgent};
//!
//! let settings = AgentSettings::new("hacker", Some(Duration::from_secs(30)));
//! let agent = ExecutionAgent::system(settings, "python3");
//! let result = agent.run("/srv/submissions/solution.py", "hello\n")?;
//! println!("{}", result.stdout());
//! # Ok::<(), proctor_runner::RunError>(())
//! ```

pub mod agent;
pub mod demotion;
pub mod error;
pub mod identity;
pub mod process;
pub mod protocol;

#[cfg(test)]
mod tests;

pub use self::agent::{AgentSettings, ExecutionAgent, ScriptExecutor};
pub use self::demotion::Demotion;
pub use self::error::RunError;
pub use self::identity::{AccountResolver, Identity, SystemAccounts};
pub use self::process::ProcessRunner;
pub use self::protocol::{ExecutionRequest, ExecutionResult};
