//! Error types for loading and configuring the pipeline

use thiserror::Error;

/// Fatal failures. Anything recoverable (bad dates, non-numeric counts,
/// missing key fields) is absorbed by the loader instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("invalid pipeline config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
