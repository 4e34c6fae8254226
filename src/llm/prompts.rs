//! Prompt templates for convention refinement.

/// System prompt for the refinement request.
pub const SYSTEM_PROMPT: &str =
    "You are a git workflow analyzer. Analyze git history patterns and return JSON only.";

/// Maximum commit subjects embedded in one prompt.
pub const MAX_SUBJECT_SAMPLES: usize = 100;

/// Maximum branch names embedded in one prompt.
pub const MAX_BRANCH_SAMPLES: usize = 50;

/// Maximum tag names embedded in one prompt.
pub const MAX_TAG_SAMPLES: usize = 50;

/// Builds the user prompt embedding bounded samples of subjects, branch
/// names and tag names.
pub fn build_user_prompt(subjects: &[String], branches: &[String], tags: &[String]) -> String {
    let subjects: Vec<&str> = subjects
        .iter()
        .take(MAX_SUBJECT_SAMPLES)
        .map(String::as_str)
        .collect();
    let branches: Vec<&str> = branches
        .iter()
        .take(MAX_BRANCH_SAMPLES)
        .map(String::as_str)
        .collect();
    let tags: Vec<&str> = tags
        .iter()
        .take(MAX_TAG_SAMPLES)
        .map(String::as_str)
        .collect();

    format!(
        r#"Analyze the following git history data and infer the project's development conventions.

Commit subjects ({subject_count} most recent):
{subject_list}

Branch names ({branch_count}):
{branch_list}

Tag names ({tag_count}):
{tag_list}

Return a JSON object with exactly these fields:
{{
  "commit_convention": "commit message convention and format, e.g. 'conventional-commits with scope: feat(scope): description', or null if none is evident",
  "branch_naming_pattern": "branch naming pattern, e.g. 'feature/{{name}}' or 'feat-{{ticket-id}}', or null if none is evident",
  "tag_naming_convention": "tag naming convention, e.g. 'semantic-versioning (v1.0.0)' or 'date-based (2024-01-15)', or null if none is evident"
}}

Return only JSON, no other text."#,
        subject_count = subjects.len(),
        subject_list = bullet_list(&subjects),
        branch_count = branches.len(),
        branch_list = bullet_list(&branches),
        tag_count = tags.len(),
        tag_list = bullet_list(&tags),
    )
}

/// Renders items as a markdown bullet list, or a placeholder when empty.
fn bullet_list(items: &[&str]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
