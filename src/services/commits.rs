// src/services/commits.rs

//! Unreleased commit collection over a paginated range comparison.

use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::{ApiCommit, RawCommit};
use crate::services::SourceApi;

/// Author shown when neither the platform account nor git metadata has a name.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Resolve the display author: platform login, then git author name, then "unknown".
pub fn resolve_author(login: Option<&str>, name: Option<&str>) -> String {
    [login, name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}

impl TryFrom<ApiCommit> for RawCommit {
    type Error = AppError;

    fn try_from(commit: ApiCommit) -> Result<Self> {
        let login = commit.author.as_ref().and_then(|a| a.login.as_deref());
        let git_author = commit.commit.author.as_ref();
        let author = resolve_author(login, git_author.and_then(|a| a.name.as_deref()));

        let authored_at = git_author
            .and_then(|a| a.date)
            .or_else(|| commit.commit.committer.as_ref().and_then(|c| c.date))
            .ok_or_else(|| {
                AppError::remote(
                    format!("commit {}", commit.sha),
                    "commit has no author or committer date",
                )
            })?;

        Ok(RawCommit {
            sha: commit.sha,
            author,
            message: commit.commit.message,
            authored_at,
            url: commit.html_url,
        })
    }
}

/// Collect the commits reachable from `head` but not from `base`.
///
/// Pages are requested until one comes back short or the source reports no
/// next page. The result keeps the remote's oldest-first order. Any failure
/// discards everything fetched so far.
pub async fn collect_unreleased_commits(
    source: &dyn SourceApi,
    organization: &str,
    repository: &str,
    base: &str,
    head: &str,
    per_page: u32,
) -> Result<Vec<RawCommit>> {
    let mut commits = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1;

    loop {
        let result = source
            .compare_commits(organization, repository, base, head, page, per_page)
            .await?;
        let fetched = result.items.len();

        for commit in result.items {
            if seen.contains(&commit.sha) {
                log::debug!("{}: duplicate commit {} skipped", repository, commit.sha);
                continue;
            }
            seen.insert(commit.sha.clone());
            commits.push(RawCommit::try_from(commit)?);
        }

        match result.next_page {
            Some(next) if fetched >= per_page as usize => page = next,
            _ => break,
        }
    }

    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiUser, GitCommit, GitSignature};
    use crate::services::testing::{FakeSource, api_commit, ts};

    fn shas(commits: &[RawCommit]) -> Vec<&str> {
        commits.iter().map(|c| c.sha.as_str()).collect()
    }

    fn history(count: u32) -> Vec<ApiCommit> {
        (1..=count)
            .map(|i| api_commit(&format!("c{i:02}"), Some("dev"), None, ts(i)))
            .collect()
    }

    #[test]
    fn test_author_precedence() {
        assert_eq!(resolve_author(Some("alice"), Some("Alice Smith")), "alice");
        assert_eq!(resolve_author(None, Some("Bob")), "Bob");
        assert_eq!(resolve_author(Some(""), Some("Bob")), "Bob");
        assert_eq!(resolve_author(None, None), "unknown");
        assert_eq!(resolve_author(Some(""), Some("")), "unknown");
    }

    #[tokio::test]
    async fn test_collects_all_pages_in_order() {
        let source = FakeSource::new().repo("widgets").commits("widgets", history(5));
        let commits = collect_unreleased_commits(&source, "acme", "widgets", "v1", "main", 2)
            .await
            .unwrap();

        assert_eq!(shas(&commits), vec!["c01", "c02", "c03", "c04", "c05"]);
        assert_eq!(*source.requested_compare_pages.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_exactly_full_last_page_terminates() {
        let source = FakeSource::new().repo("widgets").commits("widgets", history(4));
        let commits = collect_unreleased_commits(&source, "acme", "widgets", "v1", "main", 2)
            .await
            .unwrap();

        assert_eq!(commits.len(), 4);
        assert_eq!(*source.requested_compare_pages.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_short_page_stops_even_with_next_link() {
        let mut source = FakeSource::new().repo("widgets").commits("widgets", history(3));
        source.always_next = true;
        let commits = collect_unreleased_commits(&source, "acme", "widgets", "v1", "main", 2)
            .await
            .unwrap();

        assert_eq!(commits.len(), 3);
        assert_eq!(*source.requested_compare_pages.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_no_commits() {
        let source = FakeSource::new().repo("widgets");
        let commits = collect_unreleased_commits(&source, "acme", "widgets", "v1", "main", 100)
            .await
            .unwrap();
        assert!(commits.is_empty());
    }

    #[tokio::test]
    async fn test_resolves_authors_per_commit() {
        let source = FakeSource::new().repo("widgets").commits(
            "widgets",
            vec![
                api_commit("a", Some("alice"), Some("Alice Smith"), ts(1)),
                api_commit("b", None, Some("Bob"), ts(2)),
                api_commit("c", None, None, ts(3)),
            ],
        );
        let commits = collect_unreleased_commits(&source, "acme", "widgets", "v1", "main", 100)
            .await
            .unwrap();

        let authors: Vec<&str> = commits.iter().map(|c| c.author.as_str()).collect();
        assert_eq!(authors, vec!["alice", "Bob", "unknown"]);
    }

    #[tokio::test]
    async fn test_failure_discards_partial_result() {
        let source = FakeSource::new()
            .repo("widgets")
            .commits("widgets", history(5))
            .failing_compare("widgets", 2);
        let result = collect_unreleased_commits(&source, "acme", "widgets", "v1", "main", 2).await;

        assert!(result.is_err());
        assert_eq!(*source.requested_compare_pages.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_committer_date_fallback() {
        let commit = ApiCommit {
            sha: "abc".to_string(),
            html_url: String::new(),
            author: Some(ApiUser { login: None }),
            commit: GitCommit {
                message: "msg".to_string(),
                author: None,
                committer: Some(GitSignature {
                    name: Some("GitHub".to_string()),
                    date: Some(ts(9)),
                }),
            },
        };
        let raw = RawCommit::try_from(commit).unwrap();
        assert_eq!(raw.authored_at, ts(9));
        assert_eq!(raw.author, "unknown");
    }

    #[test]
    fn test_missing_dates_is_error() {
        let mut commit = api_commit("abc", None, Some("Bob"), ts(1));
        commit.commit.author = None;
        assert!(RawCommit::try_from(commit).is_err());
    }
}
