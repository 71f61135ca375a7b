// ============================================================
// Data Error Taxonomy
// ============================================================
// Every loader in `data/` and `infra/` returns this error type.
// The application and CLI layers wrap it in anyhow with extra
// context before it reaches the user.
//
//   MalformedInput     — wrong field count, unparsable number
//   Alignment          — parallel files differ in line count
//   DimensionMismatch  — embedding rows of different widths
//   MissingResource    — a required input file does not exist
//
// Reference: thiserror crate documentation
//            Rust Book §9 (Recoverable Errors with Result)

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// A line could not be split or parsed the way its format requires
    #[error("malformed input in {} line {line}: {reason}", path.display())]
    MalformedInput {
        path:   PathBuf,
        line:   usize,
        reason: String,
    },

    /// A parallel file ended early or ran past the reference file
    #[error("alignment error: {} has {found} lines, expected {expected}", path.display())]
    Alignment {
        path:     PathBuf,
        expected: usize,
        found:    usize,
    },

    /// An embedding row has a different width than the first row
    #[error(
        "dimension mismatch in {} line {line}: expected {expected} values, found {found}",
        path.display()
    )]
    DimensionMismatch {
        path:     PathBuf,
        line:     usize,
        expected: usize,
        found:    usize,
    },

    /// A required vector or data file is absent
    #[error("missing resource: {}", .0.display())]
    MissingResource(PathBuf),

    #[error("I/O error for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The external retrieval program failed or answered nonsense
    #[error("retrieval error: {0}")]
    Retrieval(String),
}

impl DataError {
    pub fn malformed(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            path:   path.into(),
            line,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Result alias used throughout the data and infra layers.
pub type Result<T> = std::result::Result<T, DataError>;
