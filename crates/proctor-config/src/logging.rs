use serde::Serialize;
use strum::{Display, EnumString};

/// Shape of the lines written to stderr.
///
/// Parsing ignores ASCII case, so `JSON` and `json` both select
/// [`LogFormat::Json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, collected by the harness.
    #[default]
    Json,
    /// Single-line text for people reading a terminal.
    Compact,
}
