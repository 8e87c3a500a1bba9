//! Header parsing for Athena++ text outputs.
//!
//! Snapshot files carry their metadata in the first two lines. History files
//! may contain several header blocks, one per (re)start of the simulation; the
//! last block describes the data that follows it.

use crate::constants::{HISTORY_SENTINEL, INDEX_LABELS};
use crate::error::{AthenaError, Result};
use crate::models::SnapshotStamp;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};

static STAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"time=(\S+)\s+cycle=(\S+)").expect("static regex must compile")
});

static ANNOTATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]=(\S+)").expect("static regex must compile"));

/// Metadata from the two header lines of a `.tab` file
#[derive(Debug, Clone, PartialEq)]
pub struct TabHeader {
    pub stamp: SnapshotStamp,
    /// Index-axis label that heads the first column (`i`, `j` or `k`)
    pub index_label: String,
    /// Field names following the index column
    pub columns: Vec<String>,
}

/// Location and contents of the winning header block of a `.hst` file
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryHeader {
    /// Zero-based position of the annotation line; data starts on the next line
    pub annotation_line: usize,
    pub columns: Vec<String>,
    /// How many sentinel lines the resource contained
    pub header_count: usize,
}

/// Parse the `time=` / `cycle=` line and the column-heading line of a snapshot
pub fn parse_tab_header(path: &Path, lines: &[String]) -> Result<TabHeader> {
    let (stamp_line, heading_line) = match lines {
        [first, second, ..] => (first, second),
        _ => {
            return Err(header_format(
                path,
                "expected a time/cycle line and a heading line",
            ));
        }
    };

    let stamp = parse_stamp(path, stamp_line)?;

    // First token is the comment marker
    let mut headings = heading_line.split_whitespace().skip(1);
    let index_label = headings
        .next()
        .ok_or_else(|| header_format(path, "heading line has no columns"))?;

    if !INDEX_LABELS.contains(&index_label) {
        return Err(header_format(
            path,
            format!(
                "unsupported index label '{}' (only 1-D tables with i, j or k are supported)",
                index_label
            ),
        ));
    }

    let columns: Vec<String> = headings.map(str::to_string).collect();
    ensure_unique(path, &columns)?;

    debug!(
        "Parsed tab header for {}: time={}, cycle={}, {} fields",
        path.display(),
        stamp.time,
        stamp.cycle,
        columns.len()
    );

    Ok(TabHeader {
        stamp,
        index_label: index_label.to_string(),
        columns,
    })
}

fn parse_stamp(path: &Path, line: &str) -> Result<SnapshotStamp> {
    let captures = STAMP_PATTERN
        .captures(line)
        .ok_or_else(|| header_format(path, "missing time=<number> cycle=<integer>"))?;

    let time = captures[1]
        .parse::<f64>()
        .map_err(|_| header_format(path, format!("invalid time value '{}'", &captures[1])))?;
    let cycle = captures[2]
        .parse::<i64>()
        .map_err(|_| header_format(path, format!("invalid cycle value '{}'", &captures[2])))?;

    Ok(SnapshotStamp { time, cycle })
}

/// Find the last history sentinel and decode the annotation line after it
pub fn locate_history_header(path: &Path, lines: &[String]) -> Result<HistoryHeader> {
    let sentinels: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.as_str() == HISTORY_SENTINEL)
        .map(|(n, _)| n)
        .collect();

    let last = *sentinels.last().ok_or_else(|| AthenaError::HeaderNotFound {
        path: path.to_path_buf(),
    })?;

    if sentinels.len() > 1 {
        warn!(
            "Multiple headers found in {} ({}); using most recent data",
            path.display(),
            sentinels.len()
        );
    }

    let annotation_line = last + 1;
    let annotations = lines
        .get(annotation_line)
        .ok_or_else(|| header_format(path, "no column annotation line after header"))?;
    let columns = parse_history_columns(path, annotations)?;

    debug!(
        "History header for {} at line {}: {:?}",
        path.display(),
        annotation_line + 1,
        columns
    );

    Ok(HistoryHeader {
        annotation_line,
        columns,
        header_count: sentinels.len(),
    })
}

/// Extract the `[n]=name` annotations from a history column line, in order
pub fn parse_history_columns(path: &Path, line: &str) -> Result<Vec<String>> {
    let columns: Vec<String> = ANNOTATION_PATTERN
        .captures_iter(line)
        .map(|c| c[1].to_string())
        .collect();

    if columns.is_empty() {
        return Err(header_format(path, "no [n]=name column annotations"));
    }
    ensure_unique(path, &columns)?;

    Ok(columns)
}

fn ensure_unique(path: &Path, columns: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in columns {
        if !seen.insert(name.as_str()) {
            return Err(header_format(path, format!("duplicate column '{}'", name)));
        }
    }
    Ok(())
}

fn header_format(path: &Path, reason: impl Into<String>) -> AthenaError {
    AthenaError::HeaderFormat {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_parse_tab_header() {
        let input = lines(
            "# Athena++ data at time=2.500000e-01  cycle=125  variables=prim\n\
             #  i       x1v            rho           press\n",
        );

        let header = parse_tab_header(Path::new("out.tab"), &input).unwrap();

        assert_eq!(header.stamp.time, 0.25);
        assert_eq!(header.stamp.cycle, 125);
        assert_eq!(header.index_label, "i");
        assert_eq!(header.columns, vec!["x1v", "rho", "press"]);
    }

    #[test]
    fn test_tab_header_rejects_two_dimensional_label() {
        let input = lines("# time=0.0 cycle=0\n# x1v rho\n");
        let err = parse_tab_header(Path::new("out.tab"), &input).unwrap_err();
        assert!(matches!(err, AthenaError::HeaderFormat { .. }));
    }

    #[test]
    fn test_tab_header_missing_stamp() {
        let input = lines("# Athena++ data\n# i rho\n");
        let err = parse_tab_header(Path::new("out.tab"), &input).unwrap_err();
        assert!(matches!(err, AthenaError::HeaderFormat { .. }));

        let input = lines("# time=0.5 cycle=ten\n# i rho\n");
        let err = parse_tab_header(Path::new("out.tab"), &input).unwrap_err();
        assert!(err.to_string().contains("invalid cycle value 'ten'"));
    }

    #[test]
    fn test_tab_header_too_short() {
        let input = lines("# time=0.0 cycle=0\n");
        assert!(parse_tab_header(Path::new("out.tab"), &input).is_err());
        assert!(parse_tab_header(Path::new("out.tab"), &[]).is_err());
    }

    #[test]
    fn test_locate_last_history_header() {
        let input = lines(
            "# Athena++ history data\n\
             # [1]=time [2]=dt\n\
             0.0 0.1\n\
             # Athena++ history data\n\
             # [1]=time [2]=dt [3]=mass\n\
             0.5 0.1 1.0\n",
        );

        let header = locate_history_header(Path::new("run.hst"), &input).unwrap();

        assert_eq!(header.annotation_line, 4);
        assert_eq!(header.header_count, 2);
        assert_eq!(header.columns, vec!["time", "dt", "mass"]);
    }

    #[test]
    fn test_history_sentinel_must_match_exactly() {
        let input = lines("#  Athena++ history data\n# [1]=time\n0.0\n");
        let err = locate_history_header(Path::new("run.hst"), &input).unwrap_err();
        assert!(matches!(err, AthenaError::HeaderNotFound { .. }));
    }

    #[test]
    fn test_history_header_without_annotation_line() {
        let input = lines("# Athena++ history data\n");
        let err = locate_history_header(Path::new("run.hst"), &input).unwrap_err();
        assert!(matches!(err, AthenaError::HeaderFormat { .. }));
    }

    #[test]
    fn test_parse_history_columns() {
        let columns = parse_history_columns(
            Path::new("run.hst"),
            "#  [1]=time     [2]=dt       [3]=mass     [4]=1-mom",
        )
        .unwrap();
        assert_eq!(columns, vec!["time", "dt", "mass", "1-mom"]);

        let err = parse_history_columns(Path::new("run.hst"), "# time dt").unwrap_err();
        assert!(matches!(err, AthenaError::HeaderFormat { .. }));

        let err =
            parse_history_columns(Path::new("run.hst"), "# [1]=time [2]=time").unwrap_err();
        assert!(err.to_string().contains("duplicate column 'time'"));
    }
}
