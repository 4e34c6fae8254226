//! Release-signal classification.
//!
//! Tags are the primary source: their spacing says how often the project
//! actually releases. When no usable tag signal exists, commit spacing gives
//! a weaker activity label instead.

use crate::git::TagRecord;
use crate::history::ReleaseSignal;

/// Seconds in one day.
const DAY_SECONDS: f64 = 24.0 * 3600.0;

/// Minimum number of commit timestamps for the commit-cadence fallback.
const MIN_COMMITS_FOR_SIGNAL: usize = 5;

/// Derives a release signal from tag spacing.
///
/// Requires both tags and commit timestamps to be present. A single tag
/// yields [`ReleaseSignal::Tagged`]; two or more yield a label from the mean
/// day-delta between consecutive tags.
pub fn from_tags(tags: &[TagRecord], timestamps: &[i64]) -> Option<ReleaseSignal> {
    if tags.is_empty() || timestamps.is_empty() {
        return None;
    }
    if tags.len() < 2 {
        return Some(ReleaseSignal::Tagged);
    }

    let mut tag_times: Vec<i64> = tags.iter().map(|tag| tag.timestamp).collect();
    tag_times.sort_unstable();

    let avg_delta = mean_day_delta(&tag_times);
    let signal = if avg_delta < 7.0 {
        ReleaseSignal::FrequentReleases
    } else if avg_delta < 30.0 {
        ReleaseSignal::MonthlyReleases
    } else if avg_delta < 90.0 {
        ReleaseSignal::QuarterlyReleases
    } else {
        ReleaseSignal::InfrequentReleases
    };

    Some(signal)
}

/// Fallback: derives an activity signal from commit spacing (less accurate).
pub fn from_commits(timestamps: &[i64]) -> Option<ReleaseSignal> {
    if timestamps.len() < MIN_COMMITS_FOR_SIGNAL {
        return None;
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let avg_delta = mean_day_delta(&sorted);
    let signal = if avg_delta < 3.0 {
        ReleaseSignal::FastIteration
    } else if avg_delta < 14.0 {
        ReleaseSignal::WeeklyActivity
    } else if avg_delta < 45.0 {
        ReleaseSignal::MonthlyActivity
    } else {
        ReleaseSignal::InfrequentActivity
    };

    Some(signal)
}

/// Mean delta between consecutive sorted timestamps, in days.
fn mean_day_delta(sorted: &[i64]) -> f64 {
    let deltas: Vec<f64> = sorted
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 / DAY_SECONDS)
        .collect();
    deltas.iter().sum::<f64>() / deltas.len() as f64
}
