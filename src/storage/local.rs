//! Local filesystem storage implementation.
//!
//! Every write goes to a temporary file first and is renamed into place, so
//! a failed write never leaves a truncated snapshot behind and earlier
//! snapshots stay readable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{CrawlTimestamp, RepositorySnapshot};
use crate::storage::{SnapshotStorage, WriteMetadata};
use crate::utils::is_safe_file_stem;

const SNAPSHOT_DIR: &str = "repos";
const TIMESTAMP_FILE: &str = "timestamp.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Root directory of this storage.
    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Storage key of a repository's snapshot.
    fn snapshot_key(name: &str) -> Result<String> {
        if !is_safe_file_stem(name) {
            return Err(AppError::validation(format!(
                "repository name '{name}' cannot be used as a file name"
            )));
        }
        Ok(format!("{SNAPSHOT_DIR}/{name}.json"))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data, pretty-printed with a trailing newline.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(value)?;
        bytes.push(b'\n');
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data, reporting schema mismatches with the file path.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| AppError::schema(&self.path(key), e)),
            None => Ok(None),
        }
    }

    /// File names of all persisted snapshots, sorted.
    async fn snapshot_files(&self) -> Result<Vec<String>> {
        let dir = self.path(SNAPSHOT_DIR);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") && entry.file_type().await?.is_file() {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl SnapshotStorage for LocalStorage {
    async fn write_snapshot(&self, snapshot: &RepositorySnapshot) -> Result<WriteMetadata> {
        let key = Self::snapshot_key(&snapshot.name)?;
        self.write_json(&key, snapshot).await?;

        Ok(WriteMetadata {
            location: self.path(&key).display().to_string(),
            commit_count: snapshot.commit_count(),
        })
    }

    async fn load_snapshots(&self) -> Result<Vec<RepositorySnapshot>> {
        let mut snapshots = Vec::new();
        for file in self.snapshot_files().await? {
            let key = format!("{SNAPSHOT_DIR}/{file}");
            if let Some(snapshot) = self.read_json::<RepositorySnapshot>(&key).await? {
                snapshots.push(snapshot);
            }
        }
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(snapshots)
    }

    async fn write_crawl_timestamp(&self, timestamp: &CrawlTimestamp) -> Result<()> {
        self.write_json(TIMESTAMP_FILE, timestamp).await
    }

    async fn load_crawl_timestamp(&self) -> Result<Option<CrawlTimestamp>> {
        self.read_json(TIMESTAMP_FILE).await
    }
}
