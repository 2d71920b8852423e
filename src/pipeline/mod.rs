//! Pipeline entry points.
//!
//! - `run_crawler`: Crawl an organization and persist one snapshot per repository
//! - `run_generate`: Render persisted snapshots into static pages

pub mod crawl;
pub mod generate;
pub mod normalize;

pub use crawl::{CrawlStage, CrawlSummary, Crawler, RepoOutcome, run_crawler};
pub use generate::run_generate;
pub use normalize::{RepositoryKey, normalize};
