//! Commit cadence, contributor count and recent-tag metrics.

use std::collections::BTreeSet;

use crate::git::TagRecord;

/// Seconds in one week.
const WEEK_SECONDS: f64 = 7.0 * 24.0 * 3600.0;

/// Seconds in 365 days.
const YEAR_SECONDS: i64 = 365 * 24 * 3600;

/// Average commits per week over the sampled window.
///
/// Returns `None` for an empty sample. A single commit reports 1.0: the rate
/// is undefined with one sample, so the count itself is returned. Otherwise
/// the divisor is floored at one day's worth of a week so that a sample
/// landing entirely on one day does not blow up the rate.
pub fn commits_per_week(timestamps: &[i64]) -> Option<f64> {
    if timestamps.is_empty() {
        return None;
    }
    if timestamps.len() == 1 {
        return Some(1.0);
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();
    let span_seconds = (sorted[sorted.len() - 1] - sorted[0]) as f64;
    let weeks = (span_seconds / WEEK_SECONDS).max(1.0 / 7.0);

    Some(round2(timestamps.len() as f64 / weeks))
}

/// Number of unique commit authors, `None` when no authors were seen.
pub fn active_contributors(authors: &BTreeSet<String>) -> Option<usize> {
    if authors.is_empty() {
        None
    } else {
        Some(authors.len())
    }
}

/// Counts tags created within 365 days of the most recent commit.
///
/// Anchored to repository activity rather than wall-clock time so results
/// are reproducible for historical snapshots. Zero when either tags or
/// commit timestamps are absent.
pub fn recent_tags_count(tags: &[TagRecord], timestamps: &[i64]) -> usize {
    let Some(latest_commit) = timestamps.iter().max() else {
        return 0;
    };
    let one_year_ago = latest_commit - YEAR_SECONDS;

    tags.iter()
        .filter(|tag| tag.timestamp >= one_year_ago)
        .count()
}

/// Rounds to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 24 * 3600;

    fn tag(name: &str, timestamp: i64) -> TagRecord {
        TagRecord {
            name: name.to_string(),
            timestamp,
        }
    }

    // ── commits_per_week ─────────────────────────────────────────────

    #[test]
    fn empty_sample_has_no_cadence() {
        assert_eq!(commits_per_week(&[]), None);
    }

    #[test]
    fn single_commit_reports_count() {
        assert_eq!(commits_per_week(&[1_700_000_000]), Some(1.0));
    }

    #[test]
    fn ten_commits_over_one_week_is_ten() {
        // Evenly spread with a span of exactly seven days.
        let start = 1_700_000_000;
        let timestamps: Vec<i64> = (0..10).map(|i| start + i * (7 * DAY) / 9).collect();
        let cadence = commits_per_week(&timestamps).unwrap_or(0.0);
        assert!((cadence - 10.0).abs() < 0.01);
    }

    #[test]
    fn same_day_burst_divisor_floors_at_one_day() {
        // 14 commits within one hour: weeks floors at 1/7, so rate = 14 * 7.
        let start = 1_700_000_000;
        let timestamps: Vec<i64> = (0..14).map(|i| start + i * 60).collect();
        assert_eq!(commits_per_week(&timestamps), Some(98.0));
    }

    #[test]
    fn cadence_ignores_input_order() {
        let timestamps = [1_700_000_000 + 14 * DAY, 1_700_000_000, 1_700_000_000 + 7 * DAY];
        assert_eq!(commits_per_week(&timestamps), Some(1.5));
    }

    // ── active_contributors ──────────────────────────────────────────

    #[test]
    fn no_authors_is_null() {
        assert_eq!(active_contributors(&BTreeSet::new()), None);
    }

    #[test]
    fn counts_unique_authors() {
        let authors: BTreeSet<String> = ["A <a@x>", "B <b@x>"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(active_contributors(&authors), Some(2));
    }

    // ── recent_tags_count ────────────────────────────────────────────

    #[test]
    fn counts_tags_within_a_year_of_last_commit() {
        let latest = 1_700_000_000;
        let tags = vec![
            tag("v1.0.0", latest - 400 * DAY),
            tag("v1.1.0", latest - 100 * DAY),
            tag("v1.2.0", latest - DAY),
        ];
        assert_eq!(recent_tags_count(&tags, &[latest - 500 * DAY, latest]), 2);
    }

    #[test]
    fn no_commits_means_zero_recent_tags() {
        let tags = vec![tag("v1.0.0", 1_700_000_000)];
        assert_eq!(recent_tags_count(&tags, &[]), 0);
    }

    #[test]
    fn no_tags_means_zero() {
        assert_eq!(recent_tags_count(&[], &[1_700_000_000]), 0);
    }
}
