//! Error types for reportrow

use thiserror::Error;

/// Errors that can occur while building or rendering rows
#[derive(Error, Debug)]
pub enum ReportError {
    /// A raw value could not be turned into a reportable quantity
    #[error("cannot normalize value '{value}': {reason}")]
    Normalization { value: String, reason: String },

    /// No formatter is registered under this key
    #[error("unknown formatter '{key}'")]
    UnknownFormatter { key: String },

    /// The formatter exists but has no entry for the requested format
    #[error("formatter '{key}' does not support format '{format}'")]
    UnsupportedFormat { key: String, format: String },

    /// A formatter failed while producing output
    #[error("formatter '{key}' failed: {message}")]
    Formatter { key: String, message: String },

    /// Render specs could not be parsed
    #[error("invalid render specs: {0}")]
    InvalidSpecs(#[from] serde_json::Error),
}

impl ReportError {
    /// Shorthand for formatter implementations reporting a failure
    pub fn formatter(key: impl Into<String>, message: impl Into<String>) -> Self {
        ReportError::Formatter {
            key: key.into(),
            message: message.into(),
        }
    }
}
