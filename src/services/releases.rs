// src/services/releases.rs

//! Latest-release eligibility.

use crate::error::Result;
use crate::models::ReleaseRef;
use crate::services::SourceApi;

/// Resolve the latest published release of a repository.
///
/// Returns `Ok(None)` when the repository is not eligible for comparison:
/// the remote reports no release, the tag name is blank, or the release
/// carries no timestamp at all. Other remote failures are returned as errors.
pub async fn resolve_latest_release(
    source: &dyn SourceApi,
    organization: &str,
    repository: &str,
) -> Result<Option<ReleaseRef>> {
    let Some(release) = source.latest_release(organization, repository).await? else {
        return Ok(None);
    };

    if release.tag_name.trim().is_empty() {
        log::debug!("{}: latest release has an empty tag name", repository);
        return Ok(None);
    }

    let Some(published_at) = release.published_at.or(release.created_at) else {
        log::debug!("{}: release {} has no timestamp", repository, release.tag_name);
        return Ok(None);
    };

    Ok(Some(ReleaseRef {
        tag_name: release.tag_name,
        published_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiRelease;
    use crate::services::testing::{FakeSource, ts};

    #[tokio::test]
    async fn test_published_release() {
        let source = FakeSource::new().repo("widgets").release("widgets", "v1.2.0", ts(1));
        let release = resolve_latest_release(&source, "acme", "widgets")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(release.tag_name, "v1.2.0");
        assert_eq!(release.published_at, ts(1));
    }

    #[tokio::test]
    async fn test_no_release_is_none() {
        let source = FakeSource::new().repo("widgets");
        let release = resolve_latest_release(&source, "acme", "widgets").await.unwrap();
        assert!(release.is_none());
    }

    #[tokio::test]
    async fn test_empty_tag_is_none() {
        let source = FakeSource::new().repo("widgets").release("widgets", "  ", ts(1));
        let release = resolve_latest_release(&source, "acme", "widgets").await.unwrap();
        assert!(release.is_none());
    }

    #[tokio::test]
    async fn test_tag_name_is_kept_verbatim() {
        let source = FakeSource::new().repo("widgets").release("widgets", " v1.2.0 ", ts(1));
        let release = resolve_latest_release(&source, "acme", "widgets")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(release.tag_name, " v1.2.0 ");
    }

    #[tokio::test]
    async fn test_falls_back_to_created_at() {
        let source = FakeSource::new().repo("widgets").raw_release(
            "widgets",
            ApiRelease {
                tag_name: "v2".to_string(),
                published_at: None,
                created_at: Some(ts(4)),
            },
        );
        let release = resolve_latest_release(&source, "acme", "widgets")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(release.published_at, ts(4));
    }

    #[tokio::test]
    async fn test_remote_failure_is_error() {
        let source = FakeSource::new().repo("widgets").failing_release("widgets");
        assert!(resolve_latest_release(&source, "acme", "widgets").await.is_err());
    }
}
