//! Convention inference from git history.
//!
//! Turns a raw [`GitSnapshot`] into a [`HistoryMetrics`] record: commit
//! cadence, contributor count, release signal, branch strategy and the three
//! convention fields. Classification is rule-based; when a refiner is
//! configured its non-null answers override the rule-based convention fields
//! one by one.

pub mod branches;
pub mod cadence;
pub mod conventions;
pub mod release;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::git::{GitSnapshot, DEFAULT_MAX_COMMITS};
use crate::llm::ConventionRefiner;

pub use conventions::{merge_conventions, ConventionSet};

/// Qualitative label for how frequently a repository releases.
///
/// The `*-releases` variants come from tag spacing; the `*-activity` and
/// `fast-iteration` variants are the weaker commit-cadence fallback.
/// `tagged` means a single tag exists and no spacing can be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseSignal {
    /// Exactly one tag exists; no inter-tag spacing is computable.
    Tagged,
    /// Mean inter-tag spacing under a week.
    FrequentReleases,
    /// Mean inter-tag spacing under a month.
    MonthlyReleases,
    /// Mean inter-tag spacing under a quarter.
    QuarterlyReleases,
    /// Mean inter-tag spacing of a quarter or more.
    InfrequentReleases,
    /// Commit fallback: commits land less than three days apart on average.
    FastIteration,
    /// Commit fallback: commits land less than two weeks apart on average.
    WeeklyActivity,
    /// Commit fallback: commits land less than 45 days apart on average.
    MonthlyActivity,
    /// Commit fallback: commits land 45 or more days apart on average.
    InfrequentActivity,
}

/// Detected branching workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BranchStrategy {
    /// Persistent develop branch plus feature/release/hotfix branches.
    GitFlow,
    /// Main plus a develop branch, without the full git-flow branch set.
    GithubFlowWithDevelop,
    /// Main plus short-lived feature or hotfix branches.
    FeatureBranch,
    /// A single long-lived integration branch.
    TrunkBased,
}

/// Development-process facts inferred from git history.
///
/// Every field is nullable (or empty): absent history simply produces fewer
/// facts. A repository that cannot be opened at all yields the
/// [`Default`] record with every field null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryMetrics {
    /// Sampled commit count divided by the sampled time span in weeks.
    pub average_commits_per_week: Option<f64>,
    /// Number of unique commit authors over the sample window.
    pub active_contributors: Option<usize>,
    /// Release cadence label, tag-based with a commit-cadence fallback.
    pub release_signal: Option<ReleaseSignal>,
    /// Detected branching workflow.
    pub branch_strategy: Option<BranchStrategy>,
    /// Sorted branch-type prefixes in use (e.g. `feature`, `fix`, `hotfix`).
    pub branch_types: Vec<String>,
    /// Commit-message convention label.
    pub commit_convention: Option<String>,
    /// Combined branch naming pattern (e.g. `feature/{name}, fix/{name}`).
    pub branch_naming_pattern: Option<String>,
    /// Tag naming convention label.
    pub tag_naming_convention: Option<String>,
    /// Tags created within a year of the most recent commit.
    pub recent_tags_count: Option<usize>,
}

/// Options controlling a history analysis run.
pub struct HistoryOptions {
    /// Maximum number of commits to sample.
    pub max_commits: usize,
    /// Optional convention refiner; `None` means rule-based results only.
    pub refiner: Option<ConventionRefiner>,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            max_commits: DEFAULT_MAX_COMMITS,
            refiner: None,
        }
    }
}

/// Analyzes the repository at `path` and returns its inferred history
/// metrics.
///
/// Never fails: a path that is not a git repository produces the all-null
/// record. Any refinement failure leaves the rule-based results in place.
pub async fn analyze_history(path: &Path, options: &HistoryOptions) -> HistoryMetrics {
    let snapshot = match GitSnapshot::collect(path, options.max_commits) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            debug!(
                path = %path.display(),
                error = %err,
                "Git history unavailable; reporting empty metrics"
            );
            return HistoryMetrics::default();
        }
    };

    metrics_from_snapshot(&snapshot, options).await
}

/// Computes the full metrics record from a collected snapshot.
async fn metrics_from_snapshot(snapshot: &GitSnapshot, options: &HistoryOptions) -> HistoryMetrics {
    let rule_based = ConventionSet {
        commit_convention: conventions::detect_commit_convention(&snapshot.subjects)
            .map(str::to_string),
        branch_naming_pattern: conventions::detect_branch_naming_pattern(&snapshot.branches),
        tag_naming_convention: conventions::detect_tag_naming_convention(&snapshot.tags)
            .map(str::to_string),
    };

    let convention_set = match &options.refiner {
        Some(refiner) => {
            let refined = refiner
                .refine(&snapshot.subjects, &snapshot.branches, &snapshot.tags)
                .await;
            merge_conventions(rule_based, refined)
        }
        None => rule_based,
    };

    let release_signal = release::from_tags(&snapshot.tags, &snapshot.timestamps)
        .or_else(|| release::from_commits(&snapshot.timestamps));

    HistoryMetrics {
        average_commits_per_week: cadence::commits_per_week(&snapshot.timestamps),
        active_contributors: cadence::active_contributors(&snapshot.authors),
        release_signal,
        branch_strategy: branches::detect_strategy(&snapshot.branches),
        branch_types: branches::detect_types(&snapshot.branches),
        commit_convention: convention_set.commit_convention,
        branch_naming_pattern: convention_set.branch_naming_pattern,
        tag_naming_convention: convention_set.tag_naming_convention,
        recent_tags_count: Some(cadence::recent_tags_count(
            &snapshot.tags,
            &snapshot.timestamps,
        )),
    }
}
