//! Command-line runtime for the `proctor` agent.
//!
//! The binary is a thin wrapper around [`run`], which parses arguments,
//! initialises telemetry, performs one operation and writes its result to
//! stdout as a single JSON document. Diagnostics go to stderr. The IO
//! streams are parameters so tests can substitute in-memory buffers.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use proctor_inspect::{inspect_script, scan_script};
use proctor_runner::{AgentSettings, ExecutionAgent};

mod cli;
mod errors;
pub mod telemetry;

use cli::{Cli, CliCommand, InputArgs};
use errors::AppError;

const CLI_TARGET: &str = "proctor_cli";

#[derive(Debug, Serialize)]
struct ScanReport {
    matched: bool,
}

/// Runs the CLI using the process's stdin for `run --stdin`.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut stdin = io::stdin().lock();
    run_with_stdin(args, &mut stdin, stdout, stderr)
}

/// Runs the CLI with every stream supplied by the caller.
#[must_use]
pub fn run_with_stdin<I, R, W, E>(
    args: I,
    stdin: &mut R,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    match execute(cli, stdin, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            drop(writeln!(stderr, "{error}"));
            ExitCode::FAILURE
        }
    }
}

/// Prints help and version requests to stdout and parse errors to stderr.
fn report_usage<W: Write, E: Write>(
    error: &clap::Error,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode {
    let rendered = error.render().to_string();
    let written = if error.use_stderr() {
        write!(stderr, "{rendered}")
    } else {
        write!(stdout, "{rendered}")
    };
    drop(written);
    u8::try_from(error.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn execute<R: Read, W: Write>(cli: Cli, stdin: &mut R, stdout: &mut W) -> Result<(), AppError> {
    telemetry::initialise(&cli.config)?;
    let config = cli.config;

    match cli.command {
        CliCommand::Inspect { script } => {
            let inventory = inspect_script(&script)?;
            emit(stdout, &inventory)
        }
        CliCommand::Scan { script, pattern } => {
            let matched = scan_script(&script, &pattern)?;
            emit(stdout, &ScanReport { matched })
        }
        CliCommand::Run { script, input } => {
            let input = read_input(input, stdin)?;
            let settings = AgentSettings::new(config.account(), config.timeout());
            let agent = ExecutionAgent::system(settings, config.interpreter());
            let result = agent.run(&script, &input)?;
            tracing::info!(
                target: CLI_TARGET,
                script = %script.display(),
                exit_code = result.exit_code(),
                "script finished"
            );
            emit(stdout, &result)
        }
    }
}

fn read_input<R: Read>(input: InputArgs, stdin: &mut R) -> Result<String, AppError> {
    if let Some(text) = input.input {
        return Ok(text);
    }
    if let Some(path) = input.input_file {
        return fs::read_to_string(&path).map_err(|source| AppError::ReadInputFile { path, source });
    }
    if input.stdin {
        let mut text = String::new();
        stdin.read_to_string(&mut text).map_err(AppError::ReadStdin)?;
        return Ok(text);
    }
    Ok(String::new())
}

fn emit<W: Write, T: Serialize>(stdout: &mut W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer(&mut *stdout, value).map_err(AppError::SerialiseResult)?;
    writeln!(stdout).map_err(AppError::WriteResult)?;
    stdout.flush().map_err(AppError::WriteResult)
}
