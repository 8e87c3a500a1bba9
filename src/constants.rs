//! Format constants for Athena++ text outputs
//!
//! Header sentinels, index-axis labels and file extensions shared by the
//! readers and the CLI.

// =============================================================================
// History (.hst) format
// =============================================================================

/// Exact comment line that opens every history header block
pub const HISTORY_SENTINEL: &str = "# Athena++ history data";

/// Column that orders history records and keys restart supersession
pub const TIME_COLUMN: &str = "time";

// =============================================================================
// Snapshot (.tab) format
// =============================================================================

/// Index-axis labels accepted as the first heading of a snapshot table.
/// Only one-dimensional tables are supported.
pub const INDEX_LABELS: &[&str] = &["i", "j", "k"];

/// Prefix marking comment lines in both formats
pub const COMMENT_PREFIX: char = '#';

// =============================================================================
// File extensions
// =============================================================================

pub const TAB_EXTENSION: &str = "tab";
pub const HST_EXTENSION: &str = "hst";

pub const CSV_EXTENSION: &str = "csv";
pub const PARQUET_EXTENSION: &str = "parquet";
