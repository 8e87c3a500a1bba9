//! NaN checks applied to reader output when `validate_nan` is enabled.

use crate::error::{AthenaError, Result};
use crate::models::{HistoryLog, NumericTable, SnapshotTable};
use std::path::Path;

/// Fail if any value in `values` is NaN
pub fn validate_no_nan(path: &Path, column: &str, values: &[f64]) -> Result<()> {
    if values.iter().any(|v| v.is_nan()) {
        return Err(AthenaError::NumericValidation {
            path: path.to_path_buf(),
            column: column.to_string(),
        });
    }
    Ok(())
}

pub fn validate_snapshot(path: &Path, table: &SnapshotTable) -> Result<()> {
    table
        .fields()
        .try_for_each(|(name, values)| validate_no_nan(path, name, values))
}

pub fn validate_history(path: &Path, log: &HistoryLog) -> Result<()> {
    log.iter()
        .try_for_each(|(name, values)| validate_no_nan(path, name, values))
}

/// Columns of a headerless table are reported by zero-based position
pub fn validate_numeric_table(path: &Path, table: &NumericTable) -> Result<()> {
    let (_, cols) = table.shape();
    if let Some(position) = table.values().iter().position(|v| v.is_nan()) {
        return Err(AthenaError::NumericValidation {
            path: path.to_path_buf(),
            column: (position % cols).to_string(),
        });
    }
    Ok(())
}
