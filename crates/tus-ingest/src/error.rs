use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures while locating or reading survey input files.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("input directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no CSV or Parquet files in {path}")]
    NoInputFiles { path: PathBuf },

    #[error("unsupported input format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
