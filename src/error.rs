//! Errors raised while loading the trip dataset.
//!
//! Loading is the only fallible step of the pipeline: filtering, aggregation
//! and summary metrics are total over any loaded [`Dataset`](crate::record::Dataset).

use std::path::PathBuf;

/// Coarse classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// The dataset path could not be opened.
    NotFound,
    /// The file is not a well-formed table.
    Parse,
    /// The table lacks required columns or holds values of the wrong type.
    Schema,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("dataset not found at {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("dataset missing expected columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("invalid value {value:?} in column '{column}' at line {line}")]
    InvalidValue {
        column: String,
        line: u64,
        value: String,
    },
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            LoadError::NotFound { .. } => LoadErrorKind::NotFound,
            LoadError::Parse { .. } => LoadErrorKind::Parse,
            LoadError::MissingColumns { .. } | LoadError::InvalidValue { .. } => {
                LoadErrorKind::Schema
            }
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        LoadError::Parse {
            line,
            message: err.to_string(),
        }
    }
}
