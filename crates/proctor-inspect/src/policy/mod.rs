//! Regular expression gates over raw script text.
//!
//! A policy looks at the characters of the source, not its syntax tree, so a
//! script that fails to parse can still be scanned. Matching uses search
//! semantics: the pattern may match anywhere in the text.

use std::path::Path;

use regex::Regex;
use tracing::debug;

use crate::error::InspectError;
use crate::script::ScriptPath;

const POLICY_TARGET: &str = "proctor_inspect::policy";

/// A compiled content pattern.
#[derive(Debug, Clone)]
pub struct ContentPolicy {
    pattern: Regex,
}

impl ContentPolicy {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::InvalidPattern`] if the pattern is not a valid
    /// regular expression.
    pub fn new(pattern: &str) -> Result<Self, InspectError> {
        let compiled = Regex::new(pattern)
            .map_err(|err| InspectError::invalid_pattern(pattern, err.to_string()))?;
        Ok(Self { pattern: compiled })
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns whether the pattern occurs anywhere in `source`.
    #[must_use]
    pub fn matches(&self, source: &str) -> bool {
        self.pattern.is_match(source)
    }

    /// Reads the script at `script` and matches its full text.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::Read`] if the file cannot be read.
    pub fn matches_script(&self, script: &ScriptPath) -> Result<bool, InspectError> {
        let source = script.read_source()?;
        let matched = self.matches(&source);
        debug!(
            target: POLICY_TARGET,
            script = %script,
            pattern = self.as_str(),
            matched,
            "scanned script"
        );
        Ok(matched)
    }
}

/// Reports whether `pattern` matches anywhere in the script at `path`.
///
/// The extension is checked first, then the pattern is compiled, and only
/// then is the file read.
///
/// # Errors
///
/// Returns [`InspectError::InvalidInputKind`] for a path without the `.py`
/// extension, [`InspectError::InvalidPattern`] for a bad pattern, and
/// [`InspectError::Read`] if the file cannot be read.
pub fn scan_script(path: impl AsRef<Path>, pattern: &str) -> Result<bool, InspectError> {
    let script = ScriptPath::new(path.as_ref())?;
    let policy = ContentPolicy::new(pattern)?;
    policy.matches_script(&script)
}

#[cfg(test)]
mod tests;
