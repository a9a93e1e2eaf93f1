//! Error types for hidecode.
//!
//! Library crates use [`HideCodeError`] via `thiserror`. The host pipeline
//! decides how to report it.

use std::path::PathBuf;

/// Top-level error type for all hidecode operations.
#[derive(Debug, thiserror::Error)]
pub enum HideCodeError {
    /// Configuration loading error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Notebook JSON that does not match the data model.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid options (empty metadata key, unsupported nbformat, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A preprocessor step failed inside a pipeline.
    #[error("preprocessor `{step}` failed: {message}")]
    Preprocess { step: String, message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HideCodeError>;

impl HideCodeError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attribute a failure to a named pipeline step.
    pub fn preprocess(step: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Preprocess {
            step: step.into(),
            message: msg.into(),
        }
    }
}

impl From<serde_json::Error> for HideCodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}
