//! Error types shared across the pipeline.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = PrepError> = std::result::Result<T, E>;

/// Fatal pipeline failures.
#[derive(Debug, Error)]
pub enum PrepError {
    /// A parameter failed validation; raised before any input is processed.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The named input held no usable tokens or lines.
    #[error("{0} is empty after normalization")]
    EmptyInput(&'static str),
    /// A single record could not be decoded. Pipelines recover from this by
    /// skipping the line; it only surfaces as an error from per-line APIs.
    #[error(transparent)]
    MalformedLine(#[from] MalformedLine),
    #[error("io error while processing {path:?}: {source}")]
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// WordNet dictionary files could not be loaded.
    #[error("failed to load lemmatizer data: {0:#}")]
    Lexicon(anyhow::Error),
}

impl PrepError {
    /// Wrap an IO error with the path it concerns.
    pub fn io(source: std::io::Error, path: impl Into<Option<PathBuf>>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

/// A line skipped during processing, with the 1-based line number in the
/// source file.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[error("line {line}: {reason}")]
pub struct MalformedLine {
    pub line: usize,
    pub reason: String,
}
