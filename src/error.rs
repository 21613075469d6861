//! Error types
//!
//! Errors raised while preparing a run. Faults inside suites are never
//! surfaced through this type: they become fault records in the report.

use thiserror::Error;

/// Errors for configuration and output handling
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid test filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unsupported {what}: {value}")]
    Unsupported { what: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
