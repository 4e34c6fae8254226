//! File-pattern detectors for languages, package managers and CI systems.
//!
//! Deliberately dumb: these look at file names only, never file contents or
//! code semantics.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Directories never descended into during the file walk.
const SKIP_DIRS: [&str; 8] = [
    ".git",
    "node_modules",
    "target",
    "vendor",
    "dist",
    "build",
    ".venv",
    "__pycache__",
];

/// Maximum directory depth for the file walk.
const MAX_WALK_DEPTH: usize = 12;

/// File extension to language label.
const LANGUAGE_MAP: [(&str, &str); 24] = [
    ("rs", "rust"),
    ("py", "python"),
    ("ipynb", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("go", "go"),
    ("java", "java"),
    ("kt", "kotlin"),
    ("cs", "csharp"),
    ("rb", "ruby"),
    ("php", "php"),
    ("swift", "swift"),
    ("c", "c"),
    ("h", "c"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("vue", "vue"),
    ("scala", "scala"),
    ("sh", "shell"),
    ("sql", "sql"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
];

/// Root manifest file to package-manager label.
const PACKAGE_MANIFESTS: [(&str, &str); 11] = [
    ("package.json", "npm"),
    ("pnpm-lock.yaml", "pnpm"),
    ("yarn.lock", "yarn"),
    ("poetry.lock", "poetry"),
    ("pyproject.toml", "python-pyproject"),
    ("Pipfile", "pipenv"),
    ("requirements.txt", "pip"),
    ("go.mod", "go-mod"),
    ("Cargo.toml", "cargo"),
    ("Gemfile", "bundler"),
    ("composer.json", "composer"),
];

/// Well-known CI configuration path to CI-system label.
const CI_MARKERS: [(&str, &str); 5] = [
    (".github/workflows", "github-actions"),
    (".gitlab-ci.yml", "gitlab-ci"),
    ("Jenkinsfile", "jenkins"),
    (".circleci", "circleci"),
    ("azure-pipelines.yml", "azure-pipelines"),
];

/// Share of a repository's recognized files written in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageUsage {
    /// Language label.
    pub language: String,
    /// Share of recognized files, rounded to three places.
    pub ratio: f64,
    /// Number of files with this language's extensions.
    pub files: usize,
}

/// Detects the language mix from file extensions, ordered by file count.
pub fn detect_languages(root: &Path) -> Vec<LanguageUsage> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    count_extensions(root, 0, &mut counts);

    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut usages: Vec<LanguageUsage> = counts
        .into_iter()
        .map(|(language, files)| LanguageUsage {
            language: language.to_string(),
            ratio: round3(files as f64 / total as f64),
            files,
        })
        .collect();
    usages.sort_by(|a, b| b.files.cmp(&a.files).then(a.language.cmp(&b.language)));
    usages
}

/// Recursively counts recognized file extensions under `dir`.
fn count_extensions(dir: &Path, depth: usize, counts: &mut BTreeMap<&'static str, usize>) {
    if depth > MAX_WALK_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            if !SKIP_DIRS.contains(&name.as_ref()) {
                count_extensions(&path, depth + 1, counts);
            }
            continue;
        }

        let Some(extension) = path.extension().map(|e| e.to_string_lossy().to_lowercase())
        else {
            continue;
        };
        if let Some(&(_, language)) = LANGUAGE_MAP.iter().find(|(ext, _)| *ext == extension) {
            *counts.entry(language).or_insert(0) += 1;
        }
    }
}

/// Detects package managers from manifest files at the repository root.
pub fn detect_package_managers(root: &Path) -> Vec<String> {
    let mut managers: Vec<String> = PACKAGE_MANIFESTS
        .iter()
        .filter(|(manifest, _)| root.join(manifest).exists())
        .map(|(_, label)| (*label).to_string())
        .collect();
    managers.sort();
    managers.dedup();
    managers
}

/// Detects CI systems from well-known configuration paths.
pub fn detect_ci_systems(root: &Path) -> Vec<String> {
    let mut systems: Vec<String> = CI_MARKERS
        .iter()
        .filter(|(marker, _)| root.join(marker).exists())
        .map(|(_, label)| (*label).to_string())
        .collect();
    systems.sort();
    systems
}

/// Rounds to three decimal places.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
