//! Error types for script inspection.
//!
//! Inspection failures are surfaced to the caller unchanged. A submission
//! that does not parse is diagnostic information for the grading harness, so
//! it is reported as [`InspectError::SyntaxError`] rather than swallowed.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::parser::SyntaxProblem;
use crate::script::InvalidScriptPath;

/// Errors from inspecting or scanning a script.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InspectError {
    /// The path does not carry the recognised script extension.
    #[error(transparent)]
    InvalidInputKind(#[from] InvalidScriptPath),

    /// The script could not be read from disk.
    #[error("failed to read script {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// The source text is not valid Python.
    #[error("syntax error at line {line}, column {column}: {message}")]
    SyntaxError {
        /// One-based line of the first problem.
        line: u32,
        /// One-based column of the first problem.
        column: u32,
        /// Description of the problem.
        message: String,
        /// Snippet of the offending source.
        context: String,
    },

    /// The Tree-sitter grammar could not be loaded.
    #[error("failed to initialise Python parser: {message}")]
    ParserInit {
        /// Description of the failure.
        message: String,
    },

    /// A content policy pattern is not a valid regular expression.
    #[error("invalid policy pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as supplied.
        pattern: String,
        /// Compiler diagnostic.
        message: String,
    },
}

impl InspectError {
    /// Creates a read error for the given path.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(message: impl Into<String>) -> Self {
        Self::ParserInit {
            message: message.into(),
        }
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Returns `true` when the error reports unparseable source.
    #[must_use]
    pub const fn is_syntax_error(&self) -> bool {
        matches!(self, Self::SyntaxError { .. })
    }
}

impl From<SyntaxProblem> for InspectError {
    fn from(info: SyntaxProblem) -> Self {
        Self::SyntaxError {
            line: info.line,
            column: info.column,
            message: info.message,
            context: info.context,
        }
    }
}
