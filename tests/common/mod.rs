//! Shared test-repository builder.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use git2::{Repository, Signature, Time};
use tempfile::TempDir;

/// Seconds in one day.
pub const DAY: i64 = 24 * 3600;

/// Base timestamp for deterministic history construction.
pub const BASE_TIME: i64 = 1_700_000_000;

/// Temporary git repository with controllable commit and tag times.
pub struct TestRepo {
    _temp_dir: TempDir,
    pub repo_path: PathBuf,
    repo: Repository,
    commits: Vec<git2::Oid>,
}

impl TestRepo {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let repo_path = temp_dir.path().to_path_buf();
        let repo = Repository::init(&repo_path)?;

        {
            let mut config = repo.config()?;
            config.set_str("user.name", "Test User")?;
            config.set_str("user.email", "test@example.com")?;
        }

        Ok(TestRepo {
            _temp_dir: temp_dir,
            repo_path,
            repo,
            commits: Vec::new(),
        })
    }

    /// Adds a commit authored by `author` at `timestamp`.
    pub fn add_commit(&mut self, message: &str, timestamp: i64, author: &str) -> Result<git2::Oid> {
        let file_path = self.repo_path.join("notes.txt");
        fs::write(&file_path, format!("{message}\n{timestamp}"))?;

        let mut index = self.repo.index()?;
        index.add_path(std::path::Path::new("notes.txt"))?;
        index.write()?;

        let email = format!("{}@example.com", author.replace(' ', ".").to_lowercase());
        let signature = Signature::new(author, &email, &Time::new(timestamp, 0))?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent_commit = if let Some(last) = self.commits.last() {
            Some(self.repo.find_commit(*last)?)
        } else {
            None
        };
        let parents: Vec<&git2::Commit> = parent_commit.iter().collect();

        let commit_id = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        self.commits.push(commit_id);
        Ok(commit_id)
    }

    /// Creates a branch pointing at the current head commit.
    pub fn add_branch(&self, name: &str) -> Result<()> {
        let head = self.head_commit()?;
        self.repo.branch(name, &head, true)?;
        Ok(())
    }

    /// Creates an annotated tag at the current head with its own creation
    /// time.
    pub fn add_tag(&self, name: &str, timestamp: i64) -> Result<()> {
        let head = self.head_commit()?;
        let tagger = Signature::new("Test User", "test@example.com", &Time::new(timestamp, 0))?;
        self.repo.tag(name, head.as_object(), &tagger, name, false)?;
        Ok(())
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let oid = self
            .commits
            .last()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("repository has no commits"))?;
        Ok(self.repo.find_commit(oid)?)
    }
}
