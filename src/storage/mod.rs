//! Storage abstractions for crawl results.
//!
//! One JSON file per repository snapshot, plus a single crawl timestamp:
//!
//! ```text
//! {storage_dir}/
//! ├── config.toml           # Optional configuration
//! ├── timestamp.json        # When the last crawl completed
//! └── repos/
//!     ├── widgets.json      # One snapshot per processed repository
//!     └── gadgets.json
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CrawlTimestamp, RepositorySnapshot};

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about a snapshot write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Where the snapshot was written
    pub location: String,
    /// Number of commits in the snapshot
    pub commit_count: usize,
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Write (or wholly replace) the snapshot keyed by its repository name.
    async fn write_snapshot(&self, snapshot: &RepositorySnapshot) -> Result<WriteMetadata>;

    /// Load every persisted snapshot, ordered by repository name.
    async fn load_snapshots(&self) -> Result<Vec<RepositorySnapshot>>;

    /// Record when the crawl completed.
    async fn write_crawl_timestamp(&self, timestamp: &CrawlTimestamp) -> Result<()>;

    /// Load the crawl timestamp; `None` when no crawl was recorded.
    async fn load_crawl_timestamp(&self) -> Result<Option<CrawlTimestamp>>;
}
