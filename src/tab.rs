//! Snapshot (`.tab`) reader.
//!
//! Rows carry a cell index in their first column. The table shape is not
//! stored anywhere in the file; it is recovered from the smallest and largest
//! index seen, and each row is placed at `index - min`.
//!
//! The rows are assumed to cover `min..=max` exactly once. Only the size of the
//! range is checked: it may not exceed the number of rows read. Within that
//! bound a missing index leaves NaN in its slot and a repeated index keeps the
//! last row read.

use crate::config::ReadConfig;
use crate::error::{AthenaError, Result};
use crate::header::parse_tab_header;
use crate::models::{SnapshotStamp, SnapshotTable};
use crate::rows::{is_comment, parse_values, row_format};
use crate::source::{FileSource, LineSource};
use crate::validation::validate_snapshot;
use std::path::Path;
use tracing::debug;

/// Read a `.tab` file from disk
pub fn read_tab(path: impl AsRef<Path>, config: &ReadConfig) -> Result<SnapshotTable> {
    read_tab_from(&FileSource::new(path.as_ref()), config)
}

/// Read a snapshot from any line source
pub fn read_tab_from(source: &dyn LineSource, config: &ReadConfig) -> Result<SnapshotTable> {
    let path = source.name();
    let lines = source.read_lines()?;
    let header = parse_tab_header(path, &lines)?;

    // Data starts after the two header lines; line numbers in errors are 1-based
    let rows = lines
        .iter()
        .enumerate()
        .skip(2)
        .map(|(n, line)| (n + 1, line.as_str()));

    let table = reshape_rows(path, header.stamp, header.columns, rows)?;

    if config.validate_nan {
        validate_snapshot(path, &table)?;
    }

    Ok(table)
}

/// Distribute whitespace-separated rows into one array per field, keyed by index.
///
/// `rows` yields `(line_number, text)`; blank lines and lines starting with `#`
/// are skipped.
pub fn reshape_rows<'a>(
    path: &Path,
    stamp: SnapshotStamp,
    columns: Vec<String>,
    rows: impl IntoIterator<Item = (usize, &'a str)>,
) -> Result<SnapshotTable> {
    let mut parsed: Vec<(i64, Vec<f64>)> = Vec::new();
    let mut index_range: Option<(i64, i64)> = None;

    for (line_num, line) in rows {
        let mut tokens = line.split_whitespace().peekable();
        match tokens.peek() {
            None => continue,
            Some(first) if is_comment(first) => continue,
            Some(_) => {}
        }

        let tokens: Vec<&str> = tokens.collect();
        if tokens.len() != columns.len() + 1 {
            return Err(row_format(
                path,
                line_num,
                format!(
                    "expected {} values after the index, found {}",
                    columns.len(),
                    tokens.len() - 1
                ),
            ));
        }

        let index = tokens[0].parse::<i64>().map_err(|_| {
            row_format(path, line_num, format!("invalid cell index '{}'", tokens[0]))
        })?;
        let values = parse_values(path, line_num, &tokens[1..])?;

        index_range = Some(match index_range {
            None => (index, index),
            Some((min, max)) => (min.min(index), max.max(index)),
        });
        parsed.push((index, values));
    }

    let (min, max) = index_range.ok_or_else(|| AthenaError::EmptyData {
        path: path.to_path_buf(),
    })?;
    let span = max
        .checked_sub(min)
        .and_then(|d| usize::try_from(d).ok())
        .and_then(|d| d.checked_add(1))
        .filter(|&span| span <= parsed.len())
        .ok_or_else(|| AthenaError::IndexRange {
            path: path.to_path_buf(),
            min,
            max,
            rows: parsed.len(),
        })?;

    if span != parsed.len() {
        debug!(
            "{}: {} rows for index range {}..={}; table has gaps or repeats",
            path.display(),
            parsed.len(),
            min,
            max
        );
    }

    let mut fields = vec![vec![f64::NAN; span]; columns.len()];
    for (index, values) in parsed {
        let slot = index.abs_diff(min) as usize;
        for (field, value) in fields.iter_mut().zip(values) {
            field[slot] = value;
        }
    }

    debug!(
        "Reshaped {} into {} fields of shape ({},)",
        path.display(),
        columns.len(),
        span
    );

    Ok(SnapshotTable::new(stamp, (min, max), columns, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TextSource;

    const STAMP: SnapshotStamp = SnapshotStamp {
        time: 0.0,
        cycle: 0,
    };

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_reshape_orders_rows_by_index() {
        let rows = ["5 0.5 50.0", "3 0.3 30.0", "# interior", "4 0.4 40.0"];
        let table = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["x1v", "rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap();

        assert_eq!(table.index_range, (3, 5));
        assert_eq!(table.shape(), (3,));
        assert_eq!(table.field("x1v"), Some(&[0.3, 0.4, 0.5][..]));
        assert_eq!(table.field("rho"), Some(&[30.0, 40.0, 50.0][..]));
    }

    #[test]
    fn test_reshape_negative_indices() {
        let rows = ["-2 1.0", "-1 2.0", "0 3.0"];
        let table = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap();

        assert_eq!(table.index_range, (-2, 0));
        assert_eq!(table.field("rho"), Some(&[1.0, 2.0, 3.0][..]));
    }

    #[test]
    fn test_reshape_gap_leaves_nan() {
        // Repeated index 2 keeps the row count equal to the span
        let rows = ["0 1.0", "2 3.0", "2 4.0"];
        let table = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap();

        let rho = table.field("rho").unwrap();
        assert_eq!(rho.len(), 3);
        assert_eq!(rho[0], 1.0);
        assert!(rho[1].is_nan());
        assert_eq!(rho[2], 4.0);
    }

    #[test]
    fn test_reshape_rejects_span_wider_than_rows() {
        let rows = ["0 1.0", "4000000000 2.0"];
        let err = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap_err();

        match err {
            AthenaError::IndexRange { min, max, rows, .. } => {
                assert_eq!((min, max, rows), (0, 4_000_000_000, 2));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let rows = ["0 1.0", "2 3.0"];
        let err = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap_err();
        assert!(matches!(err, AthenaError::IndexRange { .. }));
    }

    #[test]
    fn test_reshape_extreme_indices_do_not_overflow() {
        let rows = ["-1 1.0", "9223372036854775807 2.0"];
        let err = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap_err();
        assert!(matches!(err, AthenaError::IndexRange { rows: 2, .. }));

        let rows = ["-9223372036854775808 1.0", "-9223372036854775807 2.0"];
        let table = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap();
        assert_eq!(table.shape(), (2,));
        assert_eq!(table.field("rho"), Some(&[1.0, 2.0][..]));
    }

    #[test]
    fn test_reshape_row_width_mismatch() {
        let rows = ["0 1.0 2.0", "1 3.0"];
        let err = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["x1v", "rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap_err();

        match err {
            AthenaError::RowFormat { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reshape_unparsable_value() {
        let rows = ["0 abc"];
        let err = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid number 'abc'"));
    }

    #[test]
    fn test_reshape_without_rows() {
        let rows = ["# only comments", ""];
        let err = reshape_rows(
            Path::new("out.tab"),
            STAMP,
            names(&["rho"]),
            rows.iter().copied().enumerate(),
        )
        .unwrap_err();
        assert!(matches!(err, AthenaError::EmptyData { .. }));
    }

    #[test]
    fn test_read_tab_from_text() {
        let source = TextSource::new(
            "shock.out1.00010.tab",
            "# Athena++ data at time=1.000000e-01  cycle=10  variables=prim\n\
             #  i       x1v            rho\n\
             0 -0.5 1.0\n\
             1  0.5 0.125\n",
        );

        let table = read_tab_from(&source, &ReadConfig::default()).unwrap();

        assert_eq!(table.time, 0.1);
        assert_eq!(table.cycle, 10);
        assert_eq!(table.columns(), &["x1v".to_string(), "rho".to_string()]);
        assert_eq!(table.field("rho"), Some(&[1.0, 0.125][..]));
    }

    #[test]
    fn test_read_tab_nan_validation() {
        let text = "# time=0.0 cycle=0\n# i rho\n0 nan\n";

        let source = TextSource::new("nan.tab", text);
        let table = read_tab_from(&source, &ReadConfig::default()).unwrap();
        assert!(table.field("rho").unwrap()[0].is_nan());

        let config = ReadConfig::default().with_nan_validation();
        let err = read_tab_from(&source, &config).unwrap_err();
        assert!(matches!(err, AthenaError::NumericValidation { .. }));
    }
}
