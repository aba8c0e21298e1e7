#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `EngineError` enum used across the workspace.
//!
//! Every component surfaces a typed failure to its caller; processors
//! propagate the first failure encountered and abort remaining steps.

use derive_more::Display;
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate. One variant per failure class the
/// pipeline can produce, so callers get a single terminal error describing
/// the first point of failure.
#[derive(Debug, Display)]
pub enum EngineError {
    /// Malformed source text. Carries the position of the first offending
    /// token so the caller can diagnose without re-running in a debugger.
    #[display("syntax error in {}:{}:{}: {}", path.display(), line, column, message)]
    Parse {
        /// Description of the syntax problem.
        message: String,
        /// 1-based line of the error.
        line: usize,
        /// 1-based column of the error.
        column: usize,
        /// File (or pseudo-path for inline snippets) that failed to parse.
        path: PathBuf,
    },

    /// Structurally invalid class description (duplicate members, reserved
    /// words, malformed types).
    #[display("invalid class description: {_0}")]
    Builder(String),

    /// Merge failure: missing target or source class, or a disallowed
    /// conflict under strict mode.
    #[display("merge failed: {_0}")]
    Merge(String),

    /// The manifest declares zero or more than one recognized operation,
    /// or an operation payload is invalid.
    #[display("unsupported manifest: {_0}")]
    Manifest(String),

    /// A resolved operation kind with no registered processor. Unreachable
    /// in the shipped wiring; kept so hosts embedding the factory get a
    /// typed failure instead of a panic.
    #[display("configuration error: {_0}")]
    Configuration(String),

    /// Filesystem collaborator failure, with the path it happened on.
    #[display("I/O error on {}: {}", path.display(), source)]
    Io {
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for EngineError {}

/// Helper type alias for Result using EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_includes_position() {
        let err = EngineError::Parse {
            message: "expected `;`".into(),
            line: 3,
            column: 7,
            path: PathBuf::from("src/widget.rs"),
        };
        assert_eq!(
            format!("{}", err),
            "syntax error in src/widget.rs:3:7: expected `;`"
        );
    }

    #[test]
    fn test_io_error_display_includes_path() {
        let err = EngineError::Io {
            path: PathBuf::from("missing.rs"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let rendered = format!("{}", err);
        assert!(rendered.contains("missing.rs"));
        assert!(rendered.contains("gone"));
    }
}
