// src/pipeline/normalize.rs

//! Mapping of collected commits into a repository snapshot.

use crate::models::{CommitRecord, RawCommit, ReleaseRef, RepositorySnapshot};

/// Repository identity carried into a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RepositoryKey<'a> {
    pub owner: &'a str,
    pub name: &'a str,
}

/// Build the snapshot for one repository.
///
/// `raw_commits` arrive oldest first; the snapshot lists them newest first so
/// index 0 is always the most recent unreleased commit.
pub fn normalize(
    repository: RepositoryKey<'_>,
    default_branch: &str,
    release: &ReleaseRef,
    raw_commits: Vec<RawCommit>,
    repository_url: &str,
) -> RepositorySnapshot {
    let unreleased_commits = raw_commits
        .into_iter()
        .rev()
        .map(CommitRecord::from)
        .collect();

    RepositorySnapshot {
        owner: repository.owner.to_string(),
        name: repository.name.to_string(),
        default_branch: default_branch.to_string(),
        latest_release_tag: release.tag_name.clone(),
        latest_release_time: release.published_at,
        unreleased_commits,
        repository_url: repository_url.to_string(),
    }
}

impl From<RawCommit> for CommitRecord {
    fn from(raw: RawCommit) -> Self {
        Self {
            sha: raw.sha,
            author: raw.author,
            message: raw.message,
            timestamp: raw.authored_at,
            url: raw.url,
        }
    }
}
