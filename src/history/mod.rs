//! History (`.hst`) reader.
//!
//! Reads the data block after the most recent header, then, unless raw mode
//! is requested, prunes records left behind by earlier runs so that the time
//! column is strictly increasing.

pub mod pruning;

#[cfg(test)]
pub mod tests;

pub use self::pruning::prune_restart_branches;

use crate::config::ReadConfig;
use crate::constants::TIME_COLUMN;
use crate::error::{AthenaError, Result};
use crate::header::locate_history_header;
use crate::models::{HistoryLog, ReadWarning};
use crate::rows::{is_comment, parse_values, row_format};
use crate::source::{FileSource, LineSource};
use crate::validation::validate_history;
use std::path::Path;
use tracing::debug;

/// Read a `.hst` file from disk
pub fn read_hst(path: impl AsRef<Path>, config: &ReadConfig) -> Result<HistoryLog> {
    read_hst_from(&FileSource::new(path.as_ref()), config)
}

/// Read a history log from any line source
pub fn read_hst_from(source: &dyn LineSource, config: &ReadConfig) -> Result<HistoryLog> {
    let path = source.name();
    let lines = source.read_lines()?;
    let header = locate_history_header(path, &lines)?;

    let first_data_line = header.annotation_line + 1;
    let series = parse_records(path, header.columns.len(), &lines, first_data_line)?;
    debug!(
        "Read {} records from {}",
        series.first().map_or(0, Vec::len),
        path.display()
    );

    let log = HistoryLog::new(header.columns, series);
    let mut log = if config.raw {
        log
    } else {
        consolidate(path, log)?
    };

    if header.header_count > 1 {
        log.warnings.push(ReadWarning::MultipleHeaders {
            count: header.header_count,
        });
    }

    if config.validate_nan {
        validate_history(path, &log)?;
    }

    Ok(log)
}

/// Remove restart branches so `time` is strictly increasing.
///
/// The first column must be named `time`; it is the key that decides which
/// records a later run supersedes.
pub fn consolidate(path: &Path, log: HistoryLog) -> Result<HistoryLog> {
    let (columns, series, warnings) = log.into_parts();

    match columns.first() {
        Some(first) if first == TIME_COLUMN => {}
        first => {
            return Err(AthenaError::UnidentifiableTimeColumn {
                path: path.to_path_buf(),
                found: first.cloned().unwrap_or_default(),
            });
        }
    }

    let (series, report) = prune_restart_branches(series);

    let mut log = HistoryLog::new(columns, series);
    log.warnings = warnings;
    log.consolidation = Some(report);
    Ok(log)
}

/// Parse data rows starting at `first_line` into one vector per column
fn parse_records(
    path: &Path,
    column_count: usize,
    lines: &[String],
    first_line: usize,
) -> Result<Vec<Vec<f64>>> {
    let mut series = vec![Vec::new(); column_count];

    for (n, line) in lines.iter().enumerate().skip(first_line) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.first() {
            None => continue,
            Some(first) if is_comment(first) => continue,
            Some(_) => {}
        }

        if tokens.len() != column_count {
            return Err(row_format(
                path,
                n + 1,
                format!(
                    "expected {} values, found {}",
                    column_count,
                    tokens.len()
                ),
            ));
        }

        let values = parse_values(path, n + 1, &tokens)?;
        for (column, value) in series.iter_mut().zip(values) {
            column.push(value);
        }
    }

    Ok(series)
}
