//! Page-level operations of the remote source.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ApiCommit, ApiRelease, Page, RepositoryDetail, RepositoryRef};

/// Remote repository host.
///
/// Each method performs exactly one request. Pagination, eligibility rules
/// and author resolution live in the services built on top of it.
#[async_trait]
pub trait SourceApi: Send + Sync {
    /// One page of the organization's public repositories.
    async fn list_repositories(
        &self,
        organization: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<RepositoryRef>>;

    /// The latest published release, `None` when the remote has none.
    async fn latest_release(&self, organization: &str, repository: &str)
    -> Result<Option<ApiRelease>>;

    /// Repository detail (default branch and web URL).
    async fn repository(&self, organization: &str, repository: &str) -> Result<RepositoryDetail>;

    /// One page of the commits in `base...head`, oldest first.
    async fn compare_commits(
        &self,
        organization: &str,
        repository: &str,
        base: &str,
        head: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<ApiCommit>>;
}
