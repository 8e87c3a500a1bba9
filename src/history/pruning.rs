//! Restart-branch pruning for history logs.
//!
//! A simulation restarted from an earlier checkpoint appends records whose
//! times repeat values already in the log. Wherever the time column stops
//! strictly increasing at index `n`, the records of the older run from the
//! first time `>= time[n]` up to `n` are dropped, so the newer run supersedes
//! them. This repeats until the time column is strictly increasing.

use crate::models::ConsolidationReport;
use tracing::{debug, warn};

/// Prune every restart branch. `series[0]` is the time column; all columns
/// must have the same length.
pub fn prune_restart_branches(
    mut series: Vec<Vec<f64>>,
) -> (Vec<Vec<f64>>, ConsolidationReport) {
    let mut report = ConsolidationReport::default();
    if series.is_empty() {
        return (series, report);
    }
    let original_len = series[0].len();

    // Everything before `resume` is already strictly increasing
    let mut resume = 1;
    while let Some(n) = find_regression(&series[0], resume) {
        let branch = branch_start(&series[0], n);
        debug!(
            "Regression at record {} (time {}); dropping records {}..{}",
            n, series[0][n], branch, n
        );

        series = series
            .iter()
            .map(|column| splice_out(column, branch, n))
            .collect();

        report.branches_removed += 1;
        resume = branch.max(1);
    }

    report.records_dropped = original_len - series[0].len();
    if report.branches_removed > 0 {
        warn!(
            "Removed {} restart branch(es), {} superseded record(s)",
            report.branches_removed, report.records_dropped
        );
    }

    (series, report)
}

/// First index `n >= from` with `time[n] <= time[n - 1]`
pub fn find_regression(time: &[f64], from: usize) -> Option<usize> {
    (from.max(1)..time.len()).find(|&n| time[n] <= time[n - 1])
}

/// Earliest index in `[0, n)` whose time is superseded by `time[n]`.
///
/// A regression at `n` means `time[n - 1] >= time[n]`, so the result is at most
/// `n - 1` and each splice removes at least one record.
pub fn branch_start(time: &[f64], n: usize) -> usize {
    time[..n]
        .iter()
        .position(|&t| t >= time[n])
        .unwrap_or(n - 1)
}

/// `column[..start]` followed by `column[end..]`
fn splice_out(column: &[f64], start: usize, end: usize) -> Vec<f64> {
    let mut pruned = Vec::with_capacity(column.len() - (end - start));
    pruned.extend_from_slice(&column[..start]);
    pruned.extend_from_slice(&column[end..]);
    pruned
}
