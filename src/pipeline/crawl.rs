// src/pipeline/crawl.rs

//! Crawl orchestration: enumerate, then resolve, collect, normalize and
//! persist each repository independently.

use std::fmt;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{Config, CrawlTimestamp, RepositoryRef, SourceConfig};
use crate::pipeline::normalize::{RepositoryKey, normalize};
use crate::services::{
    GitHubClient, SourceApi, collect_unreleased_commits, list_public_repositories,
    resolve_latest_release,
};
use crate::storage::{SnapshotStorage, WriteMetadata};

/// Step of the per-repository flow that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStage {
    ReleaseLookup,
    RepositoryDetail,
    CommitComparison,
    Persist,
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            Self::ReleaseLookup => "looking up latest release",
            Self::RepositoryDetail => "getting repository details",
            Self::CommitComparison => "comparing commits",
            Self::Persist => "writing snapshot",
        };
        f.write_str(action)
    }
}

/// Terminal state of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    Persisted {
        repository: String,
        commit_count: usize,
        location: String,
    },
    /// No eligible release; nothing recorded.
    Skipped { repository: String },
    Failed {
        repository: String,
        stage: CrawlStage,
        reason: String,
    },
}

impl RepoOutcome {
    pub fn repository(&self) -> &str {
        match self {
            Self::Persisted { repository, .. }
            | Self::Skipped { repository }
            | Self::Failed { repository, .. } => repository,
        }
    }
}

/// Result of a whole crawl pass.
#[derive(Debug, Clone, Default)]
pub struct CrawlSummary {
    pub enumerated: usize,
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Per-repository outcomes in enumeration order
    pub outcomes: Vec<RepoOutcome>,
    /// Recorded completion time, `None` if it could not be written
    pub crawl_timestamp: Option<DateTime<Utc>>,
}

impl CrawlSummary {
    fn from_outcomes(outcomes: Vec<RepoOutcome>) -> Self {
        let mut summary = Self {
            enumerated: outcomes.len(),
            ..Self::default()
        };
        for outcome in &outcomes {
            match outcome {
                RepoOutcome::Persisted { .. } => summary.processed += 1,
                RepoOutcome::Skipped { .. } => summary.skipped += 1,
                RepoOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary.outcomes = outcomes;
        summary
    }
}

/// Drives one crawl pass over an organization.
pub struct Crawler<'a> {
    source: &'a dyn SourceApi,
    storage: &'a dyn SnapshotStorage,
    per_page: u32,
    max_concurrent: usize,
}

impl<'a> Crawler<'a> {
    pub fn new(
        source: &'a dyn SourceApi,
        storage: &'a dyn SnapshotStorage,
        config: &SourceConfig,
    ) -> Self {
        Self {
            source,
            storage,
            per_page: config.per_page,
            max_concurrent: config.max_concurrent.max(1),
        }
    }

    /// Crawl every public repository of `organization` (at most `limit`, 0 = all).
    ///
    /// Only a failure to enumerate repositories is returned as an error;
    /// per-repository failures are recorded in the summary.
    pub async fn run(&self, organization: &str, limit: usize) -> Result<CrawlSummary> {
        log::info!("Fetching repositories for organization: {}", organization);
        let repos = list_public_repositories(self.source, organization, limit, self.per_page)
            .await
            .inspect_err(|e| log::error!("Failed to list repositories: {}", e))?;
        log::info!("Found {} public repositories", repos.len());

        let total = repos.len();
        let outcomes: Vec<RepoOutcome> = stream::iter(repos.iter().enumerate())
            .map(|(i, repo)| self.process(organization, repo, i + 1, total))
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut summary = CrawlSummary::from_outcomes(outcomes);

        let stamp = CrawlTimestamp::now();
        match self.storage.write_crawl_timestamp(&stamp).await {
            Ok(()) => {
                log::info!(
                    "Recorded crawl timestamp: {}",
                    stamp.last_crawled.to_rfc3339()
                );
                summary.crawl_timestamp = Some(stamp.last_crawled);
            }
            Err(e) => log::warn!("Failed to write crawl timestamp: {}", e),
        }

        log::info!(
            "Crawl complete! Processed {} repositories with releases ({} skipped, {} failed).",
            summary.processed,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    async fn process(
        &self,
        organization: &str,
        repo: &RepositoryRef,
        index: usize,
        total: usize,
    ) -> RepoOutcome {
        let repository = repo.name.clone();
        log::info!("[{}/{}] Processing {}...", index, total, repository);

        match self.process_inner(organization, &repository).await {
            Ok(Some(meta)) => {
                log::info!(
                    "  Saved {} unreleased commits to {}",
                    meta.commit_count,
                    meta.location
                );
                RepoOutcome::Persisted {
                    repository,
                    commit_count: meta.commit_count,
                    location: meta.location,
                }
            }
            Ok(None) => {
                log::info!("  Skipping {} (no releases)", repository);
                RepoOutcome::Skipped { repository }
            }
            Err((stage, e)) => {
                log::error!("  {}: error {}: {}", repository, stage, e);
                RepoOutcome::Failed {
                    repository,
                    stage,
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn process_inner(
        &self,
        organization: &str,
        repository: &str,
    ) -> std::result::Result<Option<WriteMetadata>, (CrawlStage, AppError)> {
        let release = resolve_latest_release(self.source, organization, repository)
            .await
            .map_err(|e| (CrawlStage::ReleaseLookup, e))?;
        let Some(release) = release else {
            return Ok(None);
        };

        let detail = self
            .source
            .repository(organization, repository)
            .await
            .map_err(|e| (CrawlStage::RepositoryDetail, e))?;

        log::info!(
            "  Latest release: {} ({})",
            release.tag_name,
            release.published_at.format("%Y-%m-%d")
        );

        let raw_commits = collect_unreleased_commits(
            self.source,
            organization,
            repository,
            &release.tag_name,
            &detail.default_branch,
            self.per_page,
        )
        .await
        .map_err(|e| (CrawlStage::CommitComparison, e))?;

        let key = RepositoryKey {
            owner: organization,
            name: repository,
        };
        let snapshot = normalize(
            key,
            &detail.default_branch,
            &release,
            raw_commits,
            &detail.html_url,
        );

        let meta = self
            .storage
            .write_snapshot(&snapshot)
            .await
            .map_err(|e| (CrawlStage::Persist, e))?;
        Ok(Some(meta))
    }
}

/// Run a crawl against the configured GitHub API.
///
/// The token is checked before any request is made.
pub async fn run_crawler(
    config: &Config,
    storage: &dyn SnapshotStorage,
    organization: &str,
    limit: usize,
) -> Result<CrawlSummary> {
    if organization.trim().is_empty() {
        return Err(AppError::config("organization name is required"));
    }
    let token = config.token()?;
    let client = GitHubClient::new(&config.source, &token)?;

    Crawler::new(&client, storage, &config.source)
        .run(organization, limit)
        .await
}
