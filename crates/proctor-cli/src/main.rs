//! CLI entrypoint for the `proctor` agent.
//!
//! The binary delegates to [`proctor_cli::run`].

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    proctor_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
