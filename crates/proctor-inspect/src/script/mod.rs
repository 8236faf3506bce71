//! Validated script paths and source loading.
//!
//! Every operation on a submission starts by wrapping its path in a
//! [`ScriptPath`]. The extension check happens before any filesystem access
//! so that a non-script input is rejected without side effects. Source text
//! is re-read on every call; nothing is cached between operations.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::InspectError;

/// File extension every submitted script must carry.
pub const SCRIPT_EXTENSION: &str = "py";

/// Error raised when a path lacks the `.py` extension.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("script {} must end with '.py'", path.display())]
pub struct InvalidScriptPath {
    path: PathBuf,
}

impl InvalidScriptPath {
    /// Returns the rejected path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Path to a learner submission with a recognised script extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScriptPath(PathBuf);

impl ScriptPath {
    /// Validates the extension of `path`.
    ///
    /// The comparison is case-sensitive: `solution.PY` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidScriptPath`] when the path does not end in `.py`.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, InvalidScriptPath> {
        let path = path.into();
        if path.extension().and_then(OsStr::to_str) == Some(SCRIPT_EXTENSION) {
            Ok(Self(path))
        } else {
            Err(InvalidScriptPath { path })
        }
    }

    /// Returns the validated path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Reads the script source as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::Read`] if the file cannot be opened or is not
    /// valid UTF-8.
    pub fn read_source(&self) -> Result<String, InspectError> {
        fs::read_to_string(&self.0).map_err(|source| InspectError::read(&self.0, source))
    }
}

impl AsRef<Path> for ScriptPath {
    fn as_ref(&self) -> &Path {
        self.as_path()
    }
}

impl fmt::Display for ScriptPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
