//! Persisted crawl records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit on the default branch that is not part of the latest release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitRecord {
    /// Commit hash
    pub sha: String,

    /// Resolved author display name
    pub author: String,

    /// Full commit message
    pub message: String,

    /// Authored instant
    pub timestamp: DateTime<Utc>,

    /// Web URL of the commit
    pub url: String,
}

impl CommitRecord {
    /// First line of the commit message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Abbreviated hash as shown by git.
    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(7)
            .map_or(self.sha.len(), |(i, _)| i);
        &self.sha[..end]
    }
}

/// Crawl result for one repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositorySnapshot {
    /// Organization the repository belongs to
    pub owner: String,

    /// Repository name, also the snapshot's storage key
    pub name: String,

    pub default_branch: String,

    pub latest_release_tag: String,

    pub latest_release_time: DateTime<Utc>,

    /// Unreleased commits, newest first
    pub unreleased_commits: Vec<CommitRecord>,

    pub repository_url: String,
}

impl RepositorySnapshot {
    /// Number of unreleased commits.
    pub fn commit_count(&self) -> usize {
        self.unreleased_commits.len()
    }

    /// The most recent unreleased commit, if any.
    pub fn newest_commit(&self) -> Option<&CommitRecord> {
        self.unreleased_commits.first()
    }

    /// Web URL comparing the release tag with the default branch.
    pub fn compare_url(&self) -> String {
        format!(
            "{}/compare/{}...{}",
            self.repository_url.trim_end_matches('/'),
            self.latest_release_tag,
            self.default_branch
        )
    }
}

/// When the last full crawl completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawlTimestamp {
    pub last_crawled: DateTime<Utc>,
}

impl CrawlTimestamp {
    pub fn now() -> Self {
        Self {
            last_crawled: Utc::now(),
        }
    }
}
