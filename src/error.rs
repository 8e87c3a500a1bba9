//! Error handling for Athena++ output parsing.
//!
//! Every variant is fatal to the read that produced it; callers get either a
//! complete table or one of these, never a partial result.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AthenaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// No `# Athena++ history data` sentinel anywhere in the resource
    #[error("Could not find history header in: {path}")]
    HeaderNotFound { path: PathBuf },

    #[error("Could not parse header in: {path} - {reason}")]
    HeaderFormat { path: PathBuf, reason: String },

    #[error(
        "Cannot remove spurious data from {path}: time column could not be identified (first column is '{found}')"
    )]
    UnidentifiableTimeColumn { path: PathBuf, found: String },

    #[error("Malformed data row in: {path} at line {line} - {reason}")]
    RowFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("NaN encountered in column '{column}' of: {path}")]
    NumericValidation { path: PathBuf, column: String },

    /// Cell indices spread over more slots than there are data rows
    #[error("Cell index range {min}..={max} does not fit the {rows} data rows in: {path}")]
    IndexRange {
        path: PathBuf,
        min: i64,
        max: i64,
        rows: usize,
    },

    #[error("No data rows found in: {path}")]
    EmptyData { path: PathBuf },

    #[error("Unsupported output format for: {path} (expected .csv or .parquet)")]
    UnsupportedOutput { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, AthenaError>;
