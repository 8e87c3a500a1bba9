//! Conversion of reader results into polars DataFrames and export to disk.

use crate::config::{ExportConfig, OutputFormat};
use crate::error::{AthenaError, Result};
use crate::models::{HistoryLog, NumericTable, SnapshotTable};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the cell-index column added to snapshot frames
pub const INDEX_COLUMN: &str = "index";

/// One row per cell: the cell index followed by every field.
///
/// A field already named [`INDEX_COLUMN`] is a `HeaderFormat` error.
/// `path` names the snapshot's source in that error.
pub fn snapshot_to_frame(path: &Path, table: &SnapshotTable) -> Result<DataFrame> {
    if table.columns().iter().any(|c| c == INDEX_COLUMN) {
        return Err(AthenaError::HeaderFormat {
            path: path.to_path_buf(),
            reason: format!("field '{}' collides with the cell-index column", INDEX_COLUMN),
        });
    }

    let (min, max) = table.index_range;
    let mut columns = Vec::with_capacity(table.columns().len() + 1);
    columns.push(Column::new(
        INDEX_COLUMN.into(),
        (min..=max).collect::<Vec<i64>>(),
    ));
    for (name, values) in table.fields() {
        columns.push(Column::new(name.into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

/// One row per history record, columns in annotation order
pub fn history_to_frame(log: &HistoryLog) -> Result<DataFrame> {
    let columns = log
        .iter()
        .map(|(name, values)| Column::new(name.into(), values))
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Columns of a headerless table are named `column_0`, `column_1`, ...
pub fn numeric_to_frame(table: &NumericTable) -> Result<DataFrame> {
    let (_, cols) = table.shape();
    let columns = (0..cols)
        .filter_map(|c| {
            table
                .column(c)
                .map(|values| Column::new(format!("column_{}", c).into(), values))
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Write a frame as CSV or Parquet according to `export`
pub fn write_frame(df: &mut DataFrame, path: &Path, export: &ExportConfig) -> Result<()> {
    let file = File::create(path)?;
    match export.format {
        OutputFormat::Csv => {
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
        OutputFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(export.compression.to_polars_compression())
                .finish(df)?;
        }
    }
    debug!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(())
}

/// Write to `path`, choosing the format from its extension
pub fn write_frame_to(df: &mut DataFrame, path: &Path, export: &ExportConfig) -> Result<()> {
    let format = OutputFormat::from_path(path).ok_or_else(|| AthenaError::UnsupportedOutput {
        path: path.to_path_buf(),
    })?;
    write_frame(df, path, &export.clone().with_format(format))
}

/// Mirror `input`'s location below `input_root` into `output_dir`, appending the
/// format extension: `runs/a/blast.hst` under `runs` becomes `out/a/blast.hst.csv`.
///
/// Inputs outside `input_root` keep only their file name.
pub fn export_path(
    input: &Path,
    input_root: &Path,
    output_dir: &Path,
    format: OutputFormat,
) -> PathBuf {
    let relative = match input.strip_prefix(input_root) {
        Ok(relative) if relative.file_name().is_some() => relative,
        _ => input.file_name().map_or(Path::new("output"), Path::new),
    };
    let mut file_name = relative.as_os_str().to_os_string();
    file_name.push(".");
    file_name.push(format.extension());
    output_dir.join(file_name)
}
