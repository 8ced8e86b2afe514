//! Error handling for the CT indication pipeline.
//!
//! Every failure here is fatal for a run. Data-quality anomalies such as
//! negative counts are reported as [`crate::models::DataQualityNotice`]
//! values instead.

pub mod util;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use std::io;
use std::path::{Path, PathBuf};

/// Specialized error type for the pipeline
#[derive(Debug, thiserror::Error)]
pub enum IndicationError {
    /// A dictionary or model artifact is missing, unreadable or invalid
    #[error("Configuration error{}: {message}", display_path(.path))]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// A record, column or feature needed downstream is absent
    #[error("Schema error: {0}")]
    Schema(String),

    /// A keyphrase pattern failed to compile
    #[error("Invalid keyphrase pattern in group '{group}': {source}")]
    Pattern {
        group: String,
        #[source]
        source: regex::Error,
    },

    /// Error opening or reading a file
    #[error("IO error{}: {source}", display_path(.path))]
    Io {
        #[source]
        source: io::Error,
        path: Option<PathBuf>,
    },

    /// Error decoding a JSON artifact
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" ({})", p.display()))
        .unwrap_or_default()
}

impl IndicationError {
    /// Create a configuration error without an associated path
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error for an artifact at `path`
    pub fn config_at(message: impl Into<String>, path: &Path) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.to_path_buf()),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Attach a path to an IO error
    pub fn io_at(source: io::Error, path: &Path) -> Self {
        Self::Io {
            source,
            path: Some(path.to_path_buf()),
        }
    }

    /// Whether this error stems from artifact configuration rather than data
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Pattern { .. })
    }
}

impl From<io::Error> for IndicationError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, IndicationError>;
