//! Loader for headerless whitespace-delimited numeric files.
//!
//! Used for plain numeric outputs such as the error tables written by the
//! regression tests. The result is always two-dimensional, so a file with a
//! single row still has shape `(1, columns)`.

use crate::config::ReadConfig;
use crate::error::Result;
use crate::models::NumericTable;
use crate::rows::{parse_values, row_format};
use crate::source::{FileSource, LineSource};
use crate::validation::validate_numeric_table;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Options for [`load_numeric_table`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatOptions {
    /// Text from this character to the end of a line is ignored
    pub comment: Option<char>,
    /// Lines to skip at the start of the file, before comment handling
    pub skip_rows: usize,
}

impl Default for DatOptions {
    fn default() -> Self {
        Self {
            comment: Some('#'),
            skip_rows: 0,
        }
    }
}

/// Load a numeric table from disk
pub fn load_dat(
    path: impl AsRef<Path>,
    options: &DatOptions,
    config: &ReadConfig,
) -> Result<NumericTable> {
    load_numeric_table(&FileSource::new(path.as_ref()), options, config)
}

/// Load every non-empty, non-comment line as one row of floats
pub fn load_numeric_table(
    source: &dyn LineSource,
    options: &DatOptions,
    config: &ReadConfig,
) -> Result<NumericTable> {
    let path = source.name();
    let lines = source.read_lines()?;

    let mut values = Vec::new();
    let mut width: Option<usize> = None;
    let mut rows = 0;

    for (n, line) in lines.iter().enumerate().skip(options.skip_rows) {
        let content = match options.comment {
            Some(marker) => line.split(marker).next().unwrap_or_default(),
            None => line.as_str(),
        };
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        match width {
            None => width = Some(tokens.len()),
            Some(expected) if expected != tokens.len() => {
                return Err(row_format(
                    path,
                    n + 1,
                    format!("expected {} columns, found {}", expected, tokens.len()),
                ));
            }
            Some(_) => {}
        }

        values.extend(parse_values(path, n + 1, &tokens)?);
        rows += 1;
    }

    let cols = width.unwrap_or(0);
    if rows == 0 {
        warn!("{} contains no data", path.display());
    }
    debug!("Loaded {}x{} table from {}", rows, cols, path.display());

    let table = NumericTable::new(rows, cols, values);
    if config.validate_nan {
        validate_numeric_table(path, &table)?;
    }
    Ok(table)
}
