//! Spec document assembly and serialization.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::detect::LanguageUsage;
use crate::history::{BranchStrategy, HistoryMetrics, ReleaseSignal};

/// Version of the emitted document schema.
pub const SPEC_VERSION: &str = "0.1.0";

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document schema version.
    pub spec_version: String,
    /// UTC generation timestamp, RFC 3339.
    pub generated_at: String,
    /// Analyzed repository path.
    pub repository: String,
}

/// Detected tooling facts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolingSection {
    /// Package managers with manifests at the repository root.
    pub package_managers: Vec<String>,
    /// CI systems with configuration in the repository.
    pub ci_systems: Vec<String>,
}

/// Inferred workflow facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSection {
    /// Average commits per week over the sample window.
    pub commit_cadence_per_week: Option<f64>,
    /// Unique commit authors over the sample window.
    pub active_contributors: Option<usize>,
    /// Release cadence label.
    pub release_signal: Option<ReleaseSignal>,
    /// Detected branching workflow.
    pub branch_strategy: Option<BranchStrategy>,
    /// Branch-type prefixes in use.
    pub branch_types: Vec<String>,
    /// Commit-message convention label.
    pub commit_convention: Option<String>,
    /// Branch naming pattern.
    pub branch_naming_pattern: Option<String>,
    /// Tag naming convention label.
    pub tag_naming_convention: Option<String>,
    /// Tags created within a year of the most recent commit.
    pub recent_tags_count: Option<usize>,
}

impl From<HistoryMetrics> for WorkflowSection {
    fn from(metrics: HistoryMetrics) -> Self {
        Self {
            commit_cadence_per_week: metrics.average_commits_per_week,
            active_contributors: metrics.active_contributors,
            release_signal: metrics.release_signal,
            branch_strategy: metrics.branch_strategy,
            branch_types: metrics.branch_types,
            commit_convention: metrics.commit_convention,
            branch_naming_pattern: metrics.branch_naming_pattern,
            tag_naming_convention: metrics.tag_naming_convention,
            recent_tags_count: metrics.recent_tags_count,
        }
    }
}

/// The assembled repository spec document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecDocument {
    /// Document metadata.
    pub metadata: Metadata,
    /// Language mix by file extension.
    pub language_stack: Vec<LanguageUsage>,
    /// Tooling facts.
    pub tooling: ToolingSection,
    /// Workflow facts inferred from git history.
    pub workflow: WorkflowSection,
    /// Bounded per-section confidence scores.
    pub confidence: BTreeMap<String, f64>,
}

impl SpecDocument {
    /// Assembles a document from the detector outputs, registering a
    /// confidence score per section.
    pub fn assemble(
        repository: &Path,
        language_stack: Vec<LanguageUsage>,
        tooling: ToolingSection,
        history: HistoryMetrics,
    ) -> Self {
        let history_present = history.average_commits_per_week.is_some()
            || history.branch_strategy.is_some()
            || history.commit_convention.is_some()
            || history.branch_naming_pattern.is_some();

        let mut document = Self {
            metadata: Metadata {
                spec_version: SPEC_VERSION.to_string(),
                generated_at: Utc::now().to_rfc3339(),
                repository: repository.display().to_string(),
            },
            confidence: BTreeMap::new(),
            workflow: WorkflowSection::from(history),
            language_stack,
            tooling,
        };

        document.register_confidence(
            "language_stack",
            0.2 + 0.6 * presence(!document.language_stack.is_empty()),
        );
        document.register_confidence(
            "tooling.package_managers",
            0.3 + 0.5 * presence(!document.tooling.package_managers.is_empty()),
        );
        document.register_confidence(
            "tooling.ci_systems",
            0.2 + 0.6 * presence(!document.tooling.ci_systems.is_empty()),
        );
        document.register_confidence("workflow.history", 0.2 + 0.6 * presence(history_present));

        document
    }

    /// Stores a confidence score clamped to `[0, 1]`.
    pub fn register_confidence(&mut self, key: &str, value: f64) {
        self.confidence
            .insert(key.to_string(), value.clamp(0.0, 1.0));
    }
}

/// 1.0 when present, 0.0 otherwise.
fn presence(present: bool) -> f64 {
    if present {
        1.0
    } else {
        0.0
    }
}

/// Serializes to a YAML document.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    serde_yaml::to_string(data).context("Failed to serialize to YAML")
}

/// Serializes to pretty-printed JSON.
pub fn to_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Failed to serialize to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_metrics() -> HistoryMetrics {
        HistoryMetrics {
            average_commits_per_week: Some(4.5),
            active_contributors: Some(3),
            release_signal: Some(ReleaseSignal::MonthlyReleases),
            branch_strategy: Some(BranchStrategy::FeatureBranch),
            branch_types: vec!["feature".to_string(), "fix".to_string()],
            commit_convention: Some("conventional-commits".to_string()),
            branch_naming_pattern: Some("feature/{name}".to_string()),
            tag_naming_convention: Some("semantic-versioning".to_string()),
            recent_tags_count: Some(4),
        }
    }

    #[test]
    fn assemble_registers_section_confidence() {
        let document = SpecDocument::assemble(
            &PathBuf::from("/tmp/repo"),
            Vec::new(),
            ToolingSection {
                package_managers: vec!["cargo".to_string()],
                ci_systems: Vec::new(),
            },
            sample_metrics(),
        );

        assert_eq!(document.confidence.get("language_stack"), Some(&0.2));
        assert_eq!(document.confidence.get("tooling.package_managers"), Some(&0.8));
        assert_eq!(document.confidence.get("tooling.ci_systems"), Some(&0.2));
        assert_eq!(document.confidence.get("workflow.history"), Some(&0.8));
    }

    #[test]
    fn workflow_section_maps_all_metric_fields() {
        let section = WorkflowSection::from(sample_metrics());
        assert_eq!(section.commit_cadence_per_week, Some(4.5));
        assert_eq!(section.active_contributors, Some(3));
        assert_eq!(section.release_signal, Some(ReleaseSignal::MonthlyReleases));
        assert_eq!(section.branch_strategy, Some(BranchStrategy::FeatureBranch));
        assert_eq!(section.branch_types.len(), 2);
        assert_eq!(section.recent_tags_count, Some(4));
    }

    #[test]
    fn confidence_is_clamped() {
        let mut document = SpecDocument::assemble(
            &PathBuf::from("."),
            Vec::new(),
            ToolingSection::default(),
            HistoryMetrics::default(),
        );
        document.register_confidence("custom", 1.7);
        assert_eq!(document.confidence.get("custom"), Some(&1.0));
        document.register_confidence("custom", -0.2);
        assert_eq!(document.confidence.get("custom"), Some(&0.0));
    }

    #[test]
    fn document_round_trips_through_yaml() {
        let document = SpecDocument::assemble(
            &PathBuf::from("/tmp/repo"),
            Vec::new(),
            ToolingSection::default(),
            sample_metrics(),
        );

        let yaml = to_yaml(&document).unwrap();
        assert!(yaml.contains("release_signal: monthly-releases"));
        assert!(yaml.contains("branch_strategy: feature-branch"));

        let parsed: SpecDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.workflow, document.workflow);
    }
}
