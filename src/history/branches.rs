//! Branch-strategy classification and branch-type enumeration.

use std::collections::BTreeSet;

use crate::history::BranchStrategy;

/// Canonical long-lived branches excluded from type/pattern analysis.
const BASE_BRANCH_NAMES: [&str; 9] = [
    "main",
    "master",
    "develop",
    "dev",
    "trunk",
    "production",
    "prod",
    "staging",
    "stage",
];

/// Branch-type prefixes, evaluated top-down; first match wins.
const BRANCH_TYPE_CATALOGUE: [&str; 13] = [
    "feature", "feat", "fix", "bugfix", "bug", "hotfix", "release", "chore", "docs", "refactor",
    "test", "perf", "style",
];

/// True for canonical base branch names (case-insensitive).
pub(crate) fn is_base_branch(name: &str) -> bool {
    let lower = name.to_lowercase();
    BASE_BRANCH_NAMES.contains(&lower.as_str())
}

/// Recovers a branch's logical name by stripping a leading remote-origin
/// path segment. The branch's own `type/name` shape is preserved.
pub(crate) fn logical_branch_name(branch: &str) -> &str {
    branch
        .strip_prefix("remotes/origin/")
        .or_else(|| branch.strip_prefix("origin/"))
        .unwrap_or(branch)
}

/// Classifies the branching workflow from the set of branch names.
///
/// Decision order, first match wins: develop plus any of
/// feature/release/hotfix means git-flow; main plus develop means
/// github-flow-with-develop; main plus feature or hotfix means
/// feature-branch; a bare main means trunk-based.
pub fn detect_strategy(branches: &[String]) -> Option<BranchStrategy> {
    let lower: Vec<String> = branches.iter().map(|b| b.to_lowercase()).collect();

    let has_main = lower.iter().any(|b| b == "main" || b == "master");
    let has_develop = lower.iter().any(|b| b == "develop" || b == "dev");
    let has_release = lower.iter().any(|b| b.contains("release"));
    let has_feature = lower
        .iter()
        .any(|b| b.contains("feature") || b.contains("feat"));
    let has_hotfix = lower.iter().any(|b| b.contains("hotfix"));

    if has_develop && (has_feature || has_release || has_hotfix) {
        return Some(BranchStrategy::GitFlow);
    }
    if has_main {
        if has_develop {
            return Some(BranchStrategy::GithubFlowWithDevelop);
        }
        if has_feature || has_hotfix {
            return Some(BranchStrategy::FeatureBranch);
        }
        return Some(BranchStrategy::TrunkBased);
    }
    None
}

/// Enumerates the branch-type prefixes in use.
///
/// Base branches and HEAD pointers are excluded. A prefix counts when
/// followed by `-` or `/`; `hotfix` and `bugfix` additionally count as a
/// bare leading token. The result is the sorted set of distinct matched
/// prefixes.
pub fn detect_types(branches: &[String]) -> Vec<String> {
    let feature_branches: Vec<&str> = branches
        .iter()
        .map(String::as_str)
        .filter(|branch| !branch.starts_with("HEAD"))
        .filter(|branch| !is_base_branch(logical_branch_name(branch)))
        .collect();

    let mut found: BTreeSet<&'static str> = BTreeSet::new();

    for branch in &feature_branches {
        let logical = logical_branch_name(branch).to_lowercase();
        for &prefix in &BRANCH_TYPE_CATALOGUE {
            if logical.starts_with(&format!("{prefix}-"))
                || logical.starts_with(&format!("{prefix}/"))
            {
                found.insert(prefix);
                break;
            }
        }
    }

    // hotfix/bugfix register even without a trailing separator.
    for branch in &feature_branches {
        let logical = logical_branch_name(branch).to_lowercase();
        for prefix in ["hotfix", "bugfix"] {
            if logical.starts_with(prefix) {
                found.insert(prefix);
            }
        }
    }

    found.into_iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branches(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    // ── detect_strategy ──────────────────────────────────────────────

    #[test]
    fn develop_with_feature_branches_is_git_flow() {
        let strategy = detect_strategy(&branches(&[
            "main",
            "develop",
            "feature/login",
            "release/1.2",
        ]));
        assert_eq!(strategy, Some(BranchStrategy::GitFlow));
    }

    #[test]
    fn main_with_bare_develop_is_github_flow_with_develop() {
        let strategy = detect_strategy(&branches(&["main", "develop"]));
        assert_eq!(strategy, Some(BranchStrategy::GithubFlowWithDevelop));
    }

    #[test]
    fn main_with_feature_branches_is_feature_branch() {
        let strategy = detect_strategy(&branches(&[
            "main",
            "feature/login",
            "feature/logout",
            "fix/crash",
        ]));
        assert_eq!(strategy, Some(BranchStrategy::FeatureBranch));
    }

    #[test]
    fn bare_main_is_trunk_based() {
        assert_eq!(
            detect_strategy(&branches(&["master"])),
            Some(BranchStrategy::TrunkBased)
        );
    }

    #[test]
    fn no_recognizable_branches_is_none() {
        assert_eq!(detect_strategy(&branches(&["wip", "scratch"])), None);
        assert_eq!(detect_strategy(&[]), None);
    }

    #[test]
    fn hotfix_alongside_develop_is_git_flow() {
        let strategy = detect_strategy(&branches(&["dev", "hotfix/urgent"]));
        assert_eq!(strategy, Some(BranchStrategy::GitFlow));
    }

    // ── detect_types ─────────────────────────────────────────────────

    #[test]
    fn finds_slash_separated_types() {
        let types = detect_types(&branches(&[
            "main",
            "feature/login",
            "feature/logout",
            "fix/crash",
        ]));
        assert_eq!(types, vec!["feature".to_string(), "fix".to_string()]);
    }

    #[test]
    fn finds_dash_separated_types() {
        let types = detect_types(&branches(&["main", "feat-login", "docs-api"]));
        assert_eq!(types, vec!["docs".to_string(), "feat".to_string()]);
    }

    #[test]
    fn hotfix_counts_without_separator() {
        let types = detect_types(&branches(&["main", "hotfix2"]));
        assert_eq!(types, vec!["hotfix".to_string()]);
    }

    #[test]
    fn remote_prefix_is_stripped() {
        let types = detect_types(&branches(&["origin/feature/login", "remotes/origin/fix-crash"]));
        assert_eq!(types, vec!["feature".to_string(), "fix".to_string()]);
    }

    #[test]
    fn base_branches_and_head_are_excluded() {
        let types = detect_types(&branches(&["main", "develop", "HEAD -> origin/main"]));
        assert!(types.is_empty());
    }

    #[test]
    fn prefix_without_separator_does_not_count() {
        // "feature" must be followed by - or / to register.
        let types = detect_types(&branches(&["featurework"]));
        assert!(types.is_empty());
    }

    #[test]
    fn no_branches_no_types() {
        assert!(detect_types(&[]).is_empty());
    }
}
