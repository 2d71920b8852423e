//! Service layer for the crawler.
//!
//! This module contains the remote-facing logic for:
//! - Repository listing (`list_public_repositories`)
//! - Release eligibility (`resolve_latest_release`)
//! - Unreleased commit collection (`collect_unreleased_commits`)
//! - The GitHub REST client (`GitHubClient`)

mod commits;
mod enumerator;
mod github;
mod releases;
mod source;
#[cfg(test)]
pub(crate) mod testing;

pub use commits::{UNKNOWN_AUTHOR, collect_unreleased_commits, resolve_author};
pub use enumerator::list_public_repositories;
pub use github::{GitHubClient, next_page_from_link};
pub use releases::resolve_latest_release;
pub use source::SourceApi;
