// src/models/mod.rs

//! Domain models for the application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod remote;
mod snapshot;

// Re-export all public types
pub use config::{Config, PathsConfig, RenderConfig, SourceConfig};
pub use remote::{
    ApiCommit, ApiRelease, ApiUser, Comparison, GitCommit, GitSignature, Page, RawCommit,
    ReleaseRef, RepositoryDetail, RepositoryRef,
};
pub use snapshot::{CommitRecord, CrawlTimestamp, RepositorySnapshot};
