use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

/// Exactly `days` consecutive UTC dates ending at `today`, oldest first.
pub fn activity_window(today: NaiveDate, days: usize) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .map(|i| today - Duration::days(i as i64))
        .collect()
}

/// Commit counts bucketed onto the window; dates with no commits are zero.
pub fn bucket_daily(series: &HashMap<NaiveDate, u64>, window: &[NaiveDate]) -> Vec<u64> {
    window
        .iter()
        .map(|date| series.get(date).copied().unwrap_or(0))
        .collect()
}

/// Summed additions/deletions for one repository. Deletions keep the raw
/// non-positive sign the API reports; display code takes the absolute value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoDelta {
    pub additions: i64,
    pub deletions: i64,
}

impl RepoDelta {
    pub fn deletions_abs(&self) -> i64 {
        self.deletions.abs()
    }

    /// Total lines touched, used for ranking.
    pub fn total(&self) -> i64 {
        self.additions + self.deletions.abs()
    }

    /// An all-zero series carries no signal and the repository stays
    /// eligible for another collection round.
    pub fn is_nontrivial(&self) -> bool {
        self.additions > 0 || self.deletions < 0
    }
}

/// Column sums over `[week, additions, deletions]` rows.
pub fn sum_week_deltas(rows: &[[i64; 3]]) -> RepoDelta {
    RepoDelta {
        additions: rows.iter().map(|row| row[1]).sum(),
        deletions: rows.iter().map(|row| row[2]).sum(),
    }
}

/// Per-repository line totals, in the order they were collected.
#[derive(Debug, Default)]
pub struct LinesReport {
    entries: Vec<(String, RepoDelta)>,
}

impl LinesReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, delta: RepoDelta) {
        self.entries.push((name, delta));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_additions(&self) -> i64 {
        self.entries.iter().map(|(_, d)| d.additions).sum()
    }

    pub fn total_deletions_abs(&self) -> i64 {
        self.entries.iter().map(|(_, d)| d.deletions.abs()).sum()
    }

    /// Top `n` repositories by total lines touched. The sort is stable, so
    /// equal totals keep their collection order and reruns stay identical.
    pub fn ranked(&self, n: usize) -> Vec<(&str, RepoDelta)> {
        let mut ranked: Vec<_> = self
            .entries
            .iter()
            .map(|(name, delta)| (name.as_str(), *delta))
            .collect();
        ranked.sort_by_key(|(_, delta)| std::cmp::Reverse(delta.total()));
        ranked.truncate(n);
        ranked
    }
}

/// Compact display form: thousands get a `k` suffix, millions an `M`.
pub fn format_number(n: i64) -> String {
    if n.abs() >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n.abs() >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Box counts for a leaderboard row, `deletions` already absolute. Each side
/// gets its rounded share of five boxes, floored at one while the side is
/// non-zero and capped at five. The sides are computed independently and may
/// sum past five; that matches the dashboard convention this mimics.
pub fn diff_boxes(additions: i64, deletions: i64, max_total: i64) -> (u32, u32) {
    if max_total == 0 {
        return (0, 0);
    }

    let total = additions + deletions;
    let add_ratio = if total > 0 {
        additions as f64 / total as f64
    } else {
        0.0
    };
    let del_ratio = if total > 0 {
        deletions as f64 / total as f64
    } else {
        0.0
    };

    let add_boxes = if additions > 0 {
        ((add_ratio * 5.0).round() as u32).clamp(1, 5)
    } else {
        0
    };
    let del_boxes = if deletions > 0 {
        ((del_ratio * 5.0).round() as u32).clamp(1, 5)
    } else {
        0
    };

    (add_boxes, del_boxes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn window_is_exactly_n_consecutive_dates_ending_today() {
        let today = date("2024-03-15");
        let window = activity_window(today, 90);

        assert_eq!(window.len(), 90);
        assert_eq!(*window.last().unwrap(), today);
        assert_eq!(window[0], date("2023-12-17"));
        for pair in window.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
    }

    #[test]
    fn bucketing_preserves_totals_and_zero_fills() {
        let mut series = HashMap::new();
        series.insert(date("2024-01-01"), 3);
        series.insert(date("2024-01-03"), 7);

        let window = activity_window(date("2024-01-05"), 5);
        let values = bucket_daily(&series, &window);

        assert_eq!(values, vec![3, 0, 7, 0, 0]);
        assert_eq!(values.iter().sum::<u64>(), 10);
    }

    #[test]
    fn merging_two_repos_sums_identical_dates() {
        // Repo A has 3 commits, repo B has 2 on the same day.
        let mut merged: HashMap<NaiveDate, u64> = HashMap::new();
        for per_repo in [3u64, 2] {
            *merged.entry(date("2024-01-01")).or_insert(0) += per_repo;
        }

        let window = activity_window(date("2024-01-01"), 1);
        assert_eq!(bucket_daily(&merged, &window), vec![5]);
    }

    #[test]
    fn week_delta_sums_keep_raw_signs() {
        let rows = [[1_700_000_000, 120, -30], [1_700_604_800, 80, -20]];
        let delta = sum_week_deltas(&rows);

        assert_eq!(delta.additions, 200);
        assert_eq!(delta.deletions, -50);
        assert_eq!(delta.deletions_abs(), 50);
        assert_eq!(delta.total(), 250);
        assert!(delta.is_nontrivial());
    }

    #[test]
    fn zero_delta_is_trivial() {
        assert!(!RepoDelta::default().is_nontrivial());
        assert!(
            RepoDelta {
                additions: 0,
                deletions: -1
            }
            .is_nontrivial()
        );
    }

    #[test]
    fn format_number_thresholds() {
        assert_eq!(format_number(950), "950");
        assert_eq!(format_number(1_500), "1.5k");
        assert_eq!(format_number(2_300_000), "2.3M");
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(1_000_000), "1.0M");
        assert_eq!(format_number(-950), "-950");
        assert_eq!(format_number(-1_500), "-1.5k");
        assert_eq!(format_number(-2_300_000), "-2.3M");
    }

    #[test]
    fn diff_boxes_rounded_share_with_floor() {
        assert_eq!(diff_boxes(90, 10, 100), (5, 1));
    }

    #[test]
    fn diff_boxes_zero_max_total_yields_nothing() {
        assert_eq!(diff_boxes(0, 0, 0), (0, 0));
    }

    #[test]
    fn diff_boxes_zero_side_gets_no_boxes() {
        assert_eq!(diff_boxes(100, 0, 100), (5, 0));
        assert_eq!(diff_boxes(0, 100, 100), (0, 5));
    }

    #[test]
    fn diff_boxes_tiny_nonzero_side_floors_at_one() {
        // 1 deleted line out of 1000: share rounds to zero but the side
        // is non-zero, so it still shows one box.
        assert_eq!(diff_boxes(999, 1, 1000), (5, 1));
    }

    #[test]
    fn ranking_is_descending_and_capped() {
        let mut report = LinesReport::new();
        for i in 0..12 {
            report.insert(
                format!("repo-{i}"),
                RepoDelta {
                    additions: 100 * (i as i64 + 1),
                    deletions: -10,
                },
            );
        }

        let top = report.ranked(10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].0, "repo-11");
        assert!(
            top.windows(2)
                .all(|pair| pair[0].1.total() >= pair[1].1.total())
        );
    }

    #[test]
    fn ranking_ties_keep_collection_order() {
        let mut report = LinesReport::new();
        let delta = RepoDelta {
            additions: 50,
            deletions: -50,
        };
        report.insert("first".into(), delta);
        report.insert("second".into(), delta);
        report.insert("third".into(), delta);

        let names: Vec<_> = report.ranked(10).iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn report_totals_cover_all_entries_not_just_top() {
        let mut report = LinesReport::new();
        report.insert(
            "big".into(),
            RepoDelta {
                additions: 1_000,
                deletions: -200,
            },
        );
        report.insert(
            "small".into(),
            RepoDelta {
                additions: 5,
                deletions: -1,
            },
        );

        assert_eq!(report.total_additions(), 1_005);
        assert_eq!(report.total_deletions_abs(), 201);
        assert_eq!(report.len(), 2);
    }
}
