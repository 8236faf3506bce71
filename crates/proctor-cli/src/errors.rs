//! Error types for the CLI runtime.

use std::io;
use std::path::PathBuf;

use proctor_inspect::InspectError;
use proctor_runner::RunError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Inspect(#[from] InspectError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("failed to read input file {}: {source}", path.display())]
    ReadInputFile { path: PathBuf, source: io::Error },
    #[error("failed to read input from stdin: {0}")]
    ReadStdin(io::Error),
    #[error("failed to serialise result: {0}")]
    SerialiseResult(serde_json::Error),
    #[error("failed to write result: {0}")]
    WriteResult(io::Error),
}
