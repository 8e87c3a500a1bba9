//! Tests for restart-branch pruning

use super::super::pruning::{branch_start, find_regression, prune_restart_branches};
use proptest::prelude::*;

/// Time column plus a sibling column holding each record's original position
fn with_positions(time: &[f64]) -> Vec<Vec<f64>> {
    let positions = (0..time.len()).map(|i| i as f64).collect();
    vec![time.to_vec(), positions]
}

#[test]
fn test_newer_run_supersedes_overlap() {
    let time = [0.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 4.0];
    let mass = vec![10.0, 11.0, 12.0, 13.0, 21.0, 22.0, 23.0, 24.0];

    let (series, report) = prune_restart_branches(vec![time.to_vec(), mass]);

    assert_eq!(series[0], vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    // Times 1-3 come from the second run
    assert_eq!(series[1], vec![10.0, 21.0, 22.0, 23.0, 24.0]);
    assert_eq!(report.branches_removed, 1);
    assert_eq!(report.records_dropped, 3);
}

#[test]
fn test_consistent_log_is_unchanged() {
    let time = [0.0, 0.1, 0.25, 0.5, 1.0];
    let input = with_positions(&time);

    let (series, report) = prune_restart_branches(input.clone());

    assert_eq!(series, input);
    assert_eq!(report.branches_removed, 0);
    assert_eq!(report.records_dropped, 0);
}

#[test]
fn test_nested_restarts() {
    // Second run restarts at t=2, third run restarts at t=1
    let time = [0.0, 1.0, 2.0, 3.0, 2.0, 3.0, 1.0, 2.0, 5.0];

    let (series, report) = prune_restart_branches(with_positions(&time));

    assert_eq!(series[0], vec![0.0, 1.0, 2.0, 5.0]);
    assert_eq!(series[1], vec![0.0, 6.0, 7.0, 8.0]);
    assert_eq!(report.branches_removed, 2);
    assert_eq!(report.records_dropped, 5);
}

#[test]
fn test_repeated_time_keeps_later_record() {
    let time = [0.0, 1.0, 1.0, 2.0];

    let (series, _) = prune_restart_branches(with_positions(&time));

    assert_eq!(series[0], vec![0.0, 1.0, 2.0]);
    assert_eq!(series[1], vec![0.0, 2.0, 3.0]);
}

#[test]
fn test_restart_before_first_record() {
    let time = [5.0, 6.0, 0.0, 1.0];

    let (series, report) = prune_restart_branches(with_positions(&time));

    assert_eq!(series[0], vec![0.0, 1.0]);
    assert_eq!(series[1], vec![2.0, 3.0]);
    assert_eq!(report.records_dropped, 2);
}

#[test]
fn test_restart_at_final_record() {
    let time = [0.0, 1.0, 2.0, 3.0, 1.5];

    let (series, _) = prune_restart_branches(with_positions(&time));

    assert_eq!(series[0], vec![0.0, 1.0, 1.5]);
    assert_eq!(series[1], vec![0.0, 1.0, 4.0]);
}

#[test]
fn test_empty_inputs() {
    let (series, report) = prune_restart_branches(Vec::new());
    assert!(series.is_empty());
    assert_eq!(report.branches_removed, 0);

    let (series, report) = prune_restart_branches(vec![Vec::new(), Vec::new()]);
    assert_eq!(series, vec![Vec::<f64>::new(), Vec::new()]);
    assert_eq!(report.records_dropped, 0);

    let (series, _) = prune_restart_branches(vec![vec![3.0]]);
    assert_eq!(series, vec![vec![3.0]]);
}

/// Time values of a log whose run rewinds by `rewind` steps wherever the flag is set
fn restart_history_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((any::<bool>(), 0usize..10), 1..60).prop_map(|steps| {
        let mut t = 0usize;
        steps
            .into_iter()
            .map(|(restart, rewind)| {
                if restart {
                    t = t.saturating_sub(rewind);
                }
                let value = t as f64;
                t += 1;
                value
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn test_generated_restart_histories_become_monotonic(time in restart_history_strategy()) {
        let (series, report) = prune_restart_branches(with_positions(&time));

        for pair in series[0].windows(2) {
            prop_assert!(pair[1] > pair[0], "time not increasing: {:?}", series[0]);
        }
        prop_assert_eq!(series[0].len(), series[1].len());
        prop_assert_eq!(report.records_dropped, time.len() - series[0].len());

        // The last record written is never superseded
        prop_assert_eq!(series[1].last().copied(), Some((time.len() - 1) as f64));

        // Every survivor still carries its own time value
        for (t, position) in series[0].iter().zip(&series[1]) {
            prop_assert_eq!(*t, time[*position as usize]);
        }
    }
}

#[test]
fn test_find_regression() {
    let time = [0.0, 1.0, 2.0, 1.0, 3.0, 3.0];
    assert_eq!(find_regression(&time, 1), Some(3));
    assert_eq!(find_regression(&time, 4), Some(5));
    assert_eq!(find_regression(&time, 0), Some(3));
    assert_eq!(find_regression(&[0.0, 1.0], 1), None);
    assert_eq!(find_regression(&[], 1), None);
}

#[test]
fn test_branch_start() {
    let time = [0.0, 1.0, 2.0, 3.0, 1.5];
    assert_eq!(branch_start(&time, 4), 2);

    let time = [0.0, 1.0, 1.0];
    assert_eq!(branch_start(&time, 2), 1);
}
