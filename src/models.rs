//! Core data structures returned by the readers.
//!
//! Every result is a freestanding owned value. Column data is kept in header
//! order alongside the names so lookups by name and ordered iteration agree.

use serde::{Deserialize, Serialize};

/// Metadata decoded from the first line of a snapshot file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStamp {
    pub time: f64,
    pub cycle: i64,
}

/// One-dimensional field dump from a `.tab` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotTable {
    /// Simulation time of the snapshot
    pub time: f64,
    /// Simulation step counter
    pub cycle: i64,
    /// Smallest and largest cell index present in the data rows
    pub index_range: (i64, i64),
    columns: Vec<String>,
    fields: Vec<Vec<f64>>,
}

impl SnapshotTable {
    /// Assemble a table; every field must have `max - min + 1` entries
    pub(crate) fn new(
        stamp: SnapshotStamp,
        index_range: (i64, i64),
        columns: Vec<String>,
        fields: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(columns.len(), fields.len());
        Self {
            time: stamp.time,
            cycle: stamp.cycle,
            index_range,
            columns,
            fields,
        }
    }

    /// Field names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values of one field, indexed by `cell_index - index_range.0`
    pub fn field(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.fields[i].as_slice())
    }

    /// Iterate `(name, values)` pairs in header order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.fields.iter().map(Vec::as_slice))
    }

    /// Shape shared by every field array
    pub fn shape(&self) -> (usize,) {
        let (min, max) = self.index_range;
        (max.abs_diff(min) as usize + 1,)
    }
}

/// Non-fatal conditions noticed while reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadWarning {
    /// The history sentinel appeared `count` times; only the last block was read
    MultipleHeaders { count: usize },
}

impl std::fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadWarning::MultipleHeaders { count } => write!(
                f,
                "Multiple headers found ({}); using most recent data",
                count
            ),
        }
    }
}

/// Outcome of pruning restart branches from a history log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidationReport {
    /// Number of regressions repaired
    pub branches_removed: usize,
    /// Records discarded because a later run superseded them
    pub records_dropped: usize,
}

/// Scalar time series from a `.hst` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    columns: Vec<String>,
    series: Vec<Vec<f64>>,
    pub(crate) warnings: Vec<ReadWarning>,
    pub(crate) consolidation: Option<ConsolidationReport>,
}

impl HistoryLog {
    pub(crate) fn new(columns: Vec<String>, series: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(columns.len(), series.len());
        Self {
            columns,
            series,
            warnings: Vec::new(),
            consolidation: None,
        }
    }

    /// Column names in annotation order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Non-fatal conditions noticed while reading
    pub fn warnings(&self) -> &[ReadWarning] {
        &self.warnings
    }

    /// `None` when the log was read in raw mode
    pub fn consolidation(&self) -> Option<ConsolidationReport> {
        self.consolidation
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<f64>>, Vec<ReadWarning>) {
        (self.columns, self.series, self.warnings)
    }

    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.series[i].as_slice())
    }

    /// Iterate `(name, values)` pairs in annotation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.series.iter().map(Vec::as_slice))
    }

    /// Number of records (rows)
    pub fn len(&self) -> usize {
        self.series.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Headerless two-dimensional numeric table, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl NumericTable {
    pub(crate) fn new(rows: usize, cols: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(rows * cols, values.len());
        Self { rows, cols, values }
    }

    /// `(rows, columns)`; always two-dimensional, even for a single row
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.values[row * self.cols..(row + 1) * self.cols])
    }

    /// Copy out one column
    pub fn column(&self, col: usize) -> Option<Vec<f64>> {
        (col < self.cols).then(|| {
            self.values
                .iter()
                .skip(col)
                .step_by(self.cols)
                .copied()
                .collect()
        })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
