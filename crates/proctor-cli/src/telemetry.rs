//! Tracing setup for the `proctor` binary.
//!
//! Events are written to stderr. Stdout is reserved for the JSON document the
//! harness parses.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::{self, time::UtcTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

use proctor_config::{Config, LogFormat};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Failures while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter directive did not parse.
    #[error("invalid log filter '{directive}': {message}")]
    Filter {
        /// Directive as configured.
        directive: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Some other subscriber already owns the global slot.
    #[error("failed to install telemetry subscriber: {0}")]
    Install(#[source] TryInitError),
}

/// Installs the process-wide subscriber on first use.
///
/// Subsequent calls are no-ops, whatever configuration they pass.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for a malformed directive and
/// [`TelemetryError::Install`] when a subscriber was set elsewhere.
pub fn initialise(config: &Config) -> Result<(), TelemetryError> {
    INSTALLED
        .get_or_try_init(|| install(config.log_filter(), config.log_format()))
        .copied()
}

fn install(directive: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(directive).map_err(|err| TelemetryError::Filter {
        directive: directive.to_owned(),
        message: err.to_string(),
    })?;

    tracing_subscriber::registry()
        .with(output_layer(format))
        .with(filter)
        .try_init()
        .map_err(TelemetryError::Install)
}

fn output_layer(format: LogFormat) -> BoxedLayer {
    let base = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_target(true);
    match format {
        LogFormat::Json => base.json().flatten_event(true).boxed(),
        LogFormat::Compact => base
            .compact()
            .with_ansi(io::stderr().is_terminal())
            .boxed(),
    }
}
