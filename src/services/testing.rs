//! In-memory [`SourceApi`] used by the service and pipeline tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::error::{AppError, Result};
use crate::models::{
    ApiCommit, ApiRelease, ApiUser, GitCommit, GitSignature, Page, RepositoryDetail,
    RepositoryRef,
};
use crate::services::SourceApi;

pub(crate) enum FakeRelease {
    Published(ApiRelease),
    Error,
}

/// Serves fixed data, paginated exactly like the real API.
#[derive(Default)]
pub(crate) struct FakeSource {
    repos: Vec<RepositoryRef>,
    releases: HashMap<String, FakeRelease>,
    details: HashMap<String, RepositoryDetail>,
    commits: HashMap<String, Vec<ApiCommit>>,
    failing_compare: HashMap<String, u32>,
    failing_list_page: Option<u32>,
    /// Report a next page even after the last one.
    pub always_next: bool,
    pub requested_compare_pages: Mutex<Vec<u32>>,
    pub requested_list_pages: Mutex<Vec<u32>>,
}

pub(crate) fn ts(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

pub(crate) fn api_commit(
    sha: &str,
    login: Option<&str>,
    name: Option<&str>,
    date: DateTime<Utc>,
) -> ApiCommit {
    ApiCommit {
        sha: sha.to_string(),
        html_url: format!("https://github.com/acme/repo/commit/{sha}"),
        author: Some(ApiUser {
            login: login.map(str::to_string),
        }),
        commit: GitCommit {
            message: format!("commit {sha}"),
            author: Some(GitSignature {
                name: name.map(str::to_string),
                date: Some(date),
            }),
            committer: None,
        },
    }
}

fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32, always_next: bool) -> Page<T> {
    let per_page = per_page as usize;
    let start = (page.saturating_sub(1) as usize) * per_page;
    let end = (start + per_page).min(items.len());
    let slice = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };
    let next_page = (always_next || end < items.len()).then_some(page + 1);
    Page::new(slice, next_page)
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repo(mut self, name: &str) -> Self {
        self.repos.push(RepositoryRef {
            name: name.to_string(),
            private: false,
        });
        self.details.insert(
            name.to_string(),
            RepositoryDetail {
                default_branch: "main".to_string(),
                html_url: format!("https://github.com/acme/{name}"),
            },
        );
        self
    }

    pub fn private_repo(mut self, name: &str) -> Self {
        self.repos.push(RepositoryRef {
            name: name.to_string(),
            private: true,
        });
        self
    }

    pub fn release(mut self, repo: &str, tag: &str, published: DateTime<Utc>) -> Self {
        self.releases.insert(
            repo.to_string(),
            FakeRelease::Published(ApiRelease {
                tag_name: tag.to_string(),
                published_at: Some(published),
                created_at: None,
            }),
        );
        self
    }

    pub fn raw_release(mut self, repo: &str, release: ApiRelease) -> Self {
        self.releases
            .insert(repo.to_string(), FakeRelease::Published(release));
        self
    }

    pub fn failing_release(mut self, repo: &str) -> Self {
        self.releases.insert(repo.to_string(), FakeRelease::Error);
        self
    }

    pub fn without_detail(mut self, repo: &str) -> Self {
        self.details.remove(repo);
        self
    }

    pub fn commits(mut self, repo: &str, commits: Vec<ApiCommit>) -> Self {
        self.commits.insert(repo.to_string(), commits);
        self
    }

    /// Fail comparison requests for `repo` from the given page on.
    pub fn failing_compare(mut self, repo: &str, from_page: u32) -> Self {
        self.failing_compare.insert(repo.to_string(), from_page);
        self
    }

    pub fn failing_list_page(mut self, page: u32) -> Self {
        self.failing_list_page = Some(page);
        self
    }
}

#[async_trait]
impl SourceApi for FakeSource {
    async fn list_repositories(
        &self,
        organization: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<RepositoryRef>> {
        self.requested_list_pages.lock().unwrap().push(page);
        if self.failing_list_page == Some(page) {
            return Err(AppError::remote_status(
                format!("{organization} repository list (page {page})"),
                500,
                "Internal Server Error",
            ));
        }
        Ok(paginate(&self.repos, page, per_page, self.always_next))
    }

    async fn latest_release(
        &self,
        organization: &str,
        repository: &str,
    ) -> Result<Option<ApiRelease>> {
        match self.releases.get(repository) {
            None => Ok(None),
            Some(FakeRelease::Published(release)) => Ok(Some(release.clone())),
            Some(FakeRelease::Error) => Err(AppError::remote_status(
                format!("{organization}/{repository} latest release"),
                500,
                "Internal Server Error",
            )),
        }
    }

    async fn repository(&self, organization: &str, repository: &str) -> Result<RepositoryDetail> {
        self.details.get(repository).cloned().ok_or_else(|| {
            AppError::remote_status(format!("{organization}/{repository} detail"), 404, "Not Found")
        })
    }

    async fn compare_commits(
        &self,
        organization: &str,
        repository: &str,
        base: &str,
        head: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<ApiCommit>> {
        self.requested_compare_pages.lock().unwrap().push(page);
        if self
            .failing_compare
            .get(repository)
            .is_some_and(|&from| page >= from)
        {
            return Err(AppError::remote_status(
                format!("{organization}/{repository} compare {base}...{head}"),
                404,
                "No common ancestor",
            ));
        }
        let commits = self.commits.get(repository).cloned().unwrap_or_default();
        Ok(paginate(&commits, page, per_page, self.always_next))
    }
}
