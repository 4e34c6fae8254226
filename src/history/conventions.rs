//! Convention pattern matchers for commit subjects, branch names and tags.
//!
//! Each matcher is an independent rule-based classifier: it counts matches
//! of anchored patterns over its sample and accepts a label only when a
//! fixed threshold clears. There are no soft confidence scores — a label is
//! either accepted or the matcher reports null.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::git::TagRecord;
use crate::history::branches::{is_base_branch, logical_branch_name};

/// Number of most-recent subjects inspected for merge-commit noise.
const RECENT_SUBJECT_WINDOW: usize = 10;

/// Prefixes for branch naming patterns, most specific first so that
/// `feature` wins over `feat` and `bugfix` over `bug`.
const NAMING_PREFIX_ORDER: [&str; 13] = [
    "feature", "bugfix", "hotfix", "release", "refactor", "feat", "fix", "bug", "chore", "docs",
    "test", "perf", "style",
];

// Subject-line pattern families, evaluated top-down; the first family to
// clear the majority threshold wins ties.
#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CONVENTIONAL_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(feat|fix|docs|style|refactor|test|chore|perf|ci|build|revert)(\(.+\))?:")
        .unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static ANGULAR_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(feat!|fix!|feat|fix|docs|style|refactor|test|chore|perf|ci|build|revert)(\(.+\))?:",
    )
    .unwrap()
});

// Tag-name families, evaluated top-down; near-exclusive, but an earlier
// family wins when a name matches several.
#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SEMVER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+\.\d+\.\d+(-[a-zA-Z0-9.-]+)?$").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static CALVER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}[.-]\d{1,2}([.-]\d{1,2})?$").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SIMPLE_VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(v|version|release|r)\d+(\.\d+)?$").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static DATE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{8}|\d{4}-\d{2}-\d{2})$").unwrap());

/// Ordered subject-line families: (label, pattern).
fn subject_families() -> [(&'static str, &'static Regex); 2] {
    [
        ("conventional-commits", &CONVENTIONAL_SUBJECT),
        ("angular-style", &ANGULAR_SUBJECT),
    ]
}

/// Ordered tag-name families: (label, pattern).
fn tag_families() -> [(&'static str, &'static Regex); 4] {
    [
        ("semantic-versioning", &SEMVER_TAG),
        ("calendar-versioning", &CALVER_TAG),
        ("simple-versioning", &SIMPLE_VERSION_TAG),
        ("date-based", &DATE_TAG),
    ]
}

/// The three convention fields produced by the matchers and the refiner.
///
/// Doubles as the refiner's wire format, so unknown or missing fields
/// deserialize as null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionSet {
    /// Commit-message convention label.
    #[serde(default)]
    pub commit_convention: Option<String>,
    /// Branch naming pattern string.
    #[serde(default)]
    pub branch_naming_pattern: Option<String>,
    /// Tag naming convention label.
    #[serde(default)]
    pub tag_naming_convention: Option<String>,
}

impl ConventionSet {
    /// True when no field carries an opinion.
    pub fn is_empty(&self) -> bool {
        self.commit_convention.is_none()
            && self.branch_naming_pattern.is_none()
            && self.tag_naming_convention.is_none()
    }
}

/// Merges a refined convention set over a rule-based one.
///
/// Field-by-field: a non-null refined value overrides the rule-based one, a
/// null refined value keeps it. Pure over its two inputs — never a
/// wholesale replacement.
pub fn merge_conventions(rule_based: ConventionSet, refined: ConventionSet) -> ConventionSet {
    ConventionSet {
        commit_convention: refined.commit_convention.or(rule_based.commit_convention),
        branch_naming_pattern: refined
            .branch_naming_pattern
            .or(rule_based.branch_naming_pattern),
        tag_naming_convention: refined
            .tag_naming_convention
            .or(rule_based.tag_naming_convention),
    }
}

/// Classifies the commit-message convention over the sampled subjects.
///
/// A family label is accepted when at least half the subjects match it;
/// conventional-commits is checked first and wins ties with angular-style.
pub fn detect_commit_convention(subjects: &[String]) -> Option<&'static str> {
    if subjects.is_empty() {
        return None;
    }

    let threshold = subjects.len() as f64 * 0.5;
    for (label, pattern) in subject_families() {
        let count = subjects.iter().filter(|s| pattern.is_match(s)).count();
        if count as f64 >= threshold {
            return Some(label);
        }
    }

    // A merge-dominated recent window is noise, not a convention.
    if subjects
        .iter()
        .take(RECENT_SUBJECT_WINDOW)
        .any(|s| s.starts_with("Merge") || s.starts_with("merge"))
    {
        return None;
    }

    None
}

/// Detects the branch naming pattern as a combined, sorted, comma-joined
/// string (e.g. `feature/{name}, fix-{name}`).
///
/// Each prefix in [`NAMING_PREFIX_ORDER`] is counted in dash and slash
/// form over the non-base branches; the acceptance threshold is
/// `max(1, 10%)` of those branches, deliberately low so a single branch
/// registers. Slash form is preferred when both clear. When no per-type
/// pattern clears, a generic separator check may still produce
/// `{type}-{name}` or `{type}/{name}`.
pub fn detect_branch_naming_pattern(branches: &[String]) -> Option<String> {
    if branches.is_empty() {
        return None;
    }

    let logical: Vec<String> = branches
        .iter()
        .filter(|branch| !branch.starts_with("HEAD") && !branch.trim().is_empty())
        .map(|branch| logical_branch_name(branch).to_string())
        .filter(|name| !is_base_branch(name))
        .collect();
    if logical.is_empty() {
        return None;
    }

    let threshold = ((logical.len() as f64 * 0.1) as usize).max(1);

    let mut patterns: BTreeMap<&'static str, String> = BTreeMap::new();
    for &prefix in &NAMING_PREFIX_ORDER {
        let slash_count = count_prefixed(&logical, prefix, '/');
        let dash_count = count_prefixed(&logical, prefix, '-');

        // Slash form is preferred when both clear the threshold.
        let separator = if slash_count >= threshold {
            '/'
        } else if dash_count >= threshold {
            '-'
        } else {
            continue;
        };
        let pattern = format!("{prefix}{separator}{{name}}");

        match prefix {
            // feat and feature are one semantic family; feature supersedes.
            "feat" if patterns.contains_key("feature") => {}
            "feature" => {
                patterns.remove("feat");
                patterns.insert("feature", pattern);
            }
            _ => {
                patterns.insert(prefix, pattern);
            }
        }
    }

    if patterns.is_empty() {
        return generic_separator_pattern(&logical);
    }

    let mut fragments: Vec<String> = patterns.into_values().collect();
    fragments.sort();
    Some(fragments.join(", "))
}

/// Counts branches starting with `prefix` followed by `separator`.
fn count_prefixed(branches: &[String], prefix: &str, separator: char) -> usize {
    let needle = format!("{prefix}{separator}");
    branches
        .iter()
        .filter(|branch| branch.to_lowercase().starts_with(&needle))
        .count()
}

/// Fallback when no per-type pattern cleared: report a bare separator
/// convention if at least 30% of branches use one internally.
fn generic_separator_pattern(branches: &[String]) -> Option<String> {
    let threshold = ((branches.len() as f64 * 0.3) as usize).max(1);

    let dash_separated = branches
        .iter()
        .filter(|branch| branch.contains('-') && !branch.starts_with('-'))
        .count();
    if dash_separated >= threshold {
        return Some("{type}-{name}".to_string());
    }

    let slash_separated = branches
        .iter()
        .filter(|branch| branch.contains('/') && !branch.starts_with('/'))
        .count();
    if slash_separated >= threshold {
        return Some("{type}/{name}".to_string());
    }

    None
}

/// Classifies the tag naming convention.
///
/// The four families are evaluated in order until one clears a 50%
/// majority of all tag names.
pub fn detect_tag_naming_convention(tags: &[TagRecord]) -> Option<&'static str> {
    if tags.is_empty() {
        return None;
    }

    let threshold = tags.len() as f64 * 0.5;
    for (label, pattern) in tag_families() {
        let count = tags.iter().filter(|tag| pattern.is_match(&tag.name)).count();
        if count as f64 >= threshold {
            return Some(label);
        }
    }

    None
}
