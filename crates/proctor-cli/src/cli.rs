//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use proctor_config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "proctor",
    version,
    about = "Inspect and run learner-submitted Python scripts under a demoted identity"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: Config,
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CliCommand {
    /// Report top-level variables and functions without running the script.
    Inspect {
        /// Script to inspect.
        script: PathBuf,
    },
    /// Report whether a regular expression occurs in the script's source.
    Scan {
        /// Script to scan.
        script: PathBuf,
        /// Regular expression searched for anywhere in the source.
        pattern: String,
    },
    /// Run the script as the configured account and capture its output.
    Run {
        /// Script to run.
        script: PathBuf,
        #[command(flatten)]
        input: InputArgs,
    },
}

/// Where the text fed to the script's stdin comes from.
#[derive(Debug, Default, Args)]
#[group(multiple = false)]
pub(crate) struct InputArgs {
    /// Literal input text.
    #[arg(long, value_name = "TEXT")]
    pub(crate) input: Option<String>,
    /// File whose contents are the input.
    #[arg(long, value_name = "PATH")]
    pub(crate) input_file: Option<PathBuf>,
    /// Forward this process's stdin as the input.
    #[arg(long)]
    pub(crate) stdin: bool,
}
