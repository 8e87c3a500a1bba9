//! Configuration for reads and exports.
//!
//! Read options are passed explicitly to every parse call; nothing is held in
//! global state.

use crate::constants::{CSV_EXTENSION, PARQUET_EXTENSION};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options shared by the `.tab`, `.hst` and `.dat` readers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadConfig {
    /// Fail with a numeric validation error if any produced value is NaN
    pub validate_nan: bool,

    /// Return history records verbatim, skipping restart-branch pruning
    pub raw: bool,
}

impl ReadConfig {
    /// Enable NaN validation on every produced array
    pub fn with_nan_validation(mut self) -> Self {
        self.validate_nan = true;
        self
    }

    /// Keep stale history records from earlier runs
    pub fn with_raw(mut self) -> Self {
        self.raw = true;
        self
    }
}

/// Tabular output formats for exported results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Csv,
    Parquet,
}

impl OutputFormat {
    /// Infer the output format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            CSV_EXTENSION => Some(OutputFormat::Csv),
            PARQUET_EXTENSION => Some(OutputFormat::Parquet),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => CSV_EXTENSION,
            OutputFormat::Parquet => PARQUET_EXTENSION,
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }

    /// Parse the CLI spelling of a compression algorithm
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "snappy" => Some(CompressionAlgorithm::Snappy),
            "zstd" => Some(CompressionAlgorithm::Zstd),
            "lz4" => Some(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Some(CompressionAlgorithm::Uncompressed),
            _ => None,
        }
    }
}

/// Settings for writing results to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: OutputFormat,
    pub compression: CompressionAlgorithm,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Parquet,
            compression: CompressionAlgorithm::Snappy,
        }
    }
}

impl ExportConfig {
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }
}
