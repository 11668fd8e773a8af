use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};

use orgpulse::chart::render_activity_chart;
use orgpulse::leaderboard::render_lines_leaderboard;
use orgpulse::stats::{
    LinesReport, RepoDelta, activity_window, bucket_daily, sum_week_deltas,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn merge(per_repo: &[HashMap<NaiveDate, u64>]) -> HashMap<NaiveDate, u64> {
    let mut merged = HashMap::new();
    for series in per_repo {
        for (day, count) in series {
            *merged.entry(*day).or_insert(0) += count;
        }
    }
    merged
}

#[test]
fn two_repo_activity_flows_through_to_the_chart() {
    let repo_a = HashMap::from([(date("2024-01-01"), 3u64)]);
    let repo_b = HashMap::from([(date("2024-01-01"), 2u64)]);
    let merged = merge(&[repo_a, repo_b]);

    let window = activity_window(date("2024-01-05"), 90);
    assert_eq!(window.len(), 90);

    let values = bucket_daily(&merged, &window);
    assert_eq!(values.iter().sum::<u64>(), 5);
    // 2024-01-01 is four days before the window's end.
    assert_eq!(values[85], 5);

    let svg = render_activity_chart(&values);
    assert!(svg.contains("5 commits"));
    assert!(svg.contains("avg 0.1/day"));
}

#[test]
fn merge_order_does_not_change_buckets() {
    let repo_a = HashMap::from([(date("2024-01-01"), 3u64), (date("2024-01-02"), 1)]);
    let repo_b = HashMap::from([(date("2024-01-01"), 2u64)]);

    let window = activity_window(date("2024-01-05"), 90);
    let forward = bucket_daily(&merge(&[repo_a.clone(), repo_b.clone()]), &window);
    let backward = bucket_daily(&merge(&[repo_b, repo_a]), &window);

    assert_eq!(forward, backward);
}

#[test]
fn aggregation_twice_yields_byte_identical_output() {
    let series = HashMap::from([(date("2024-02-10"), 4u64), (date("2024-02-11"), 9)]);
    let window = activity_window(date("2024-03-01"), 90);

    let first = render_activity_chart(&bucket_daily(&series, &window));
    let second = render_activity_chart(&bucket_daily(&series, &window));
    assert_eq!(first, second);

    let mut report = LinesReport::new();
    report.insert(
        "api".into(),
        RepoDelta {
            additions: 120,
            deletions: -30,
        },
    );
    let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    assert_eq!(
        render_lines_leaderboard(&report, "acme", stamp),
        render_lines_leaderboard(&report, "acme", stamp)
    );
}

#[test]
fn timed_out_repository_is_invisible_in_the_leaderboard() {
    // The collection loop only inserts repositories whose poll finished
    // with data; one that timed out never reaches the report.
    let mut report = LinesReport::new();
    let weekly = [[1_700_000_000i64, 500, -100], [1_700_604_800, 250, -50]];
    report.insert("collected".into(), sum_week_deltas(&weekly));

    let stamp = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let svg = render_lines_leaderboard(&report, "acme", stamp);

    assert!(svg.contains("acme/collected"));
    assert!(!svg.contains("timed-out-repo"));
    assert!(svg.contains("1 repositories"));
    assert!(svg.contains("Total: +750 / -150"));
}
