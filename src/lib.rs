//! Athena++ Output Reader Library
//!
//! Reads the plain-text outputs written by the Athena++ simulation code into
//! in-memory numeric tables.
//!
//! This library provides tools for:
//! - Parsing snapshot (`.tab`) headers and reshaping rows by cell index
//! - Reading history (`.hst`) logs, tolerating repeated header blocks
//! - Pruning history records superseded by restarted runs
//! - Loading headerless numeric (`.dat`) tables
//! - Optional NaN validation of every produced array
//! - Exporting results as polars DataFrames, CSV or Parquet

pub mod cli;
pub mod config;
pub mod constants;
pub mod dat;
pub mod error;
pub mod frame;
pub mod header;
pub mod history;
pub mod models;
mod rows;
pub mod source;
pub mod tab;
pub mod validation;

// Re-export commonly used types
pub use config::{ExportConfig, OutputFormat, ReadConfig};
pub use dat::{DatOptions, load_dat, load_numeric_table};
pub use error::{AthenaError, Result};
pub use history::{consolidate, read_hst, read_hst_from};
pub use models::{
    ConsolidationReport, HistoryLog, NumericTable, ReadWarning, SnapshotStamp, SnapshotTable,
};
pub use source::{FileSource, LineSource, TextSource};
pub use tab::{read_tab, read_tab_from};
