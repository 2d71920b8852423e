//! Records returned by the remote source API.
//!
//! Field names follow the GitHub REST payloads so they deserialize directly;
//! unknown fields are ignored.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One page of a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page number to request next, `None` on the last page
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page: Option<u32>) -> Self {
        Self { items, next_page }
    }
}

/// Repository entry from an organization listing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RepositoryRef {
    pub name: String,
    #[serde(default)]
    pub private: bool,
}

/// Repository detail lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryDetail {
    pub default_branch: String,
    pub html_url: String,
}

/// Latest release as reported by the remote.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRelease {
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A release eligible for commit comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRef {
    pub tag_name: String,
    pub published_at: DateTime<Utc>,
}

/// Commit entry from a range comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCommit {
    pub sha: String,
    #[serde(default)]
    pub html_url: String,
    /// Platform account linked to the commit author
    #[serde(default)]
    pub author: Option<ApiUser>,
    pub commit: GitCommit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    #[serde(default)]
    pub login: Option<String>,
}

/// Raw git metadata of a commit.
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author: Option<GitSignature>,
    #[serde(default)]
    pub committer: Option<GitSignature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitSignature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Body of a range comparison response.
#[derive(Debug, Clone, Deserialize)]
pub struct Comparison {
    #[serde(default)]
    pub commits: Vec<ApiCommit>,
}

/// A collected commit with its author already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommit {
    pub sha: String,
    pub author: String,
    pub message: String,
    pub authored_at: DateTime<Utc>,
    pub url: String,
}
