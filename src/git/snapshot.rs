//! Git history snapshot collection.
//!
//! A [`GitSnapshot`] is the raw material for history analysis: commit
//! timestamps, author identities and subject lines over a bounded sample
//! window, plus every branch short name and tag. Collection is strictly
//! read-only and scoped to the opened repository — nothing here touches a
//! process-global working directory.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use git2::{BranchType, Repository};

/// A tag name together with its creation time.
///
/// The timestamp is the tagger date for annotated tags and the target
/// commit's time for lightweight tags, matching git's `creatordate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRecord {
    /// Short tag name (without the `refs/tags/` prefix).
    pub name: String,
    /// Creation time as unix seconds.
    pub timestamp: i64,
}

/// Raw git history data for one repository.
#[derive(Debug, Clone, Default)]
pub struct GitSnapshot {
    /// Commit times as unix seconds, newest first, up to the sample limit.
    pub timestamps: Vec<i64>,
    /// Unique `Name <email>` author identities over the sample window.
    pub authors: BTreeSet<String>,
    /// Commit subject lines, newest first, up to the sample limit.
    pub subjects: Vec<String>,
    /// Unique local and remote branch short names, remote prefix stripped.
    pub branches: Vec<String>,
    /// All tags with creation timestamps.
    pub tags: Vec<TagRecord>,
}

impl GitSnapshot {
    /// Collects a snapshot from the repository at `path`, sampling at most
    /// `max_commits` commits.
    ///
    /// Failing to open the repository is the "not a repository" signal and
    /// surfaces as an error; the orchestrator converts it into an all-null
    /// metrics record. A repository with an unborn HEAD yields empty commit
    /// data instead of an error.
    pub fn collect(path: &Path, max_commits: usize) -> Result<Self> {
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;

        let (timestamps, authors, subjects) = collect_commits(&repo, max_commits)?;
        let branches = collect_branches(&repo)?;
        let tags = collect_tags(&repo)?;

        Ok(Self {
            timestamps,
            authors,
            subjects,
            branches,
            tags,
        })
    }
}

/// Walks history from HEAD collecting timestamps, authors and subjects.
fn collect_commits(
    repo: &Repository,
    max_commits: usize,
) -> Result<(Vec<i64>, BTreeSet<String>, Vec<String>)> {
    let mut timestamps = Vec::new();
    let mut authors = BTreeSet::new();
    let mut subjects = Vec::new();

    let mut revwalk = repo.revwalk().context("Failed to create revision walk")?;
    if revwalk.push_head().is_err() {
        // Unborn HEAD (fresh repository with no commits): empty history.
        return Ok((timestamps, authors, subjects));
    }

    for oid in revwalk.take(max_commits) {
        let oid = oid.context("Failed to read commit from revision walk")?;
        let commit = repo
            .find_commit(oid)
            .with_context(|| format!("Failed to look up commit {oid}"))?;

        timestamps.push(commit.time().seconds());

        let author = commit.author();
        authors.insert(format!(
            "{} <{}>",
            author.name().unwrap_or(""),
            author.email().unwrap_or("")
        ));

        if let Some(subject) = commit.summary() {
            let subject = subject.trim();
            if !subject.is_empty() {
                subjects.push(subject.to_string());
            }
        }
    }

    Ok((timestamps, authors, subjects))
}

/// Collects unique local and remote branch short names.
///
/// Remote names lose their leading remote segment (`origin/feature/x`
/// becomes `feature/x`); symbolic `HEAD` pointers are skipped.
fn collect_branches(repo: &Repository) -> Result<Vec<String>> {
    let mut names = BTreeSet::new();

    for entry in repo.branches(None).context("Failed to list branches")? {
        let (branch, branch_type) = entry.context("Failed to read branch entry")?;
        let Some(name) = branch.name().context("Failed to read branch name")? else {
            continue;
        };

        match branch_type {
            BranchType::Local => {
                names.insert(name.to_string());
            }
            BranchType::Remote => {
                let short = name.split_once('/').map_or(name, |(_, rest)| rest);
                if short != "HEAD" && !short.is_empty() {
                    names.insert(short.to_string());
                }
            }
        }
    }

    Ok(names.into_iter().collect())
}

/// Collects all tags with their creation timestamps.
fn collect_tags(repo: &Repository) -> Result<Vec<TagRecord>> {
    let mut tags = Vec::new();

    let references = repo
        .references_glob("refs/tags/*")
        .context("Failed to list tags")?;

    for entry in references {
        let reference = entry.context("Failed to read tag reference")?;
        let Some(name) = reference.shorthand() else {
            continue;
        };
        let name = name.to_string();

        // Annotated tags carry their own creation time; lightweight tags
        // fall back to the target commit's time.
        let timestamp = match reference.peel_to_tag() {
            Ok(tag) => tag.tagger().map(|sig| sig.when().seconds()),
            Err(_) => None,
        }
        .or_else(|| {
            reference
                .peel_to_commit()
                .ok()
                .map(|commit| commit.time().seconds())
        });

        if let Some(timestamp) = timestamp {
            tags.push(TagRecord { name, timestamp });
        }
    }

    Ok(tags)
}
