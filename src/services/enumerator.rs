// src/services/enumerator.rs

//! Organization repository listing.

use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::models::RepositoryRef;
use crate::services::SourceApi;

/// List the organization's public repositories in source order.
///
/// A `limit` of 0 means unbounded; otherwise the result is truncated to
/// exactly `limit` entries and no further pages are requested. Any page
/// failure aborts the whole listing.
pub async fn list_public_repositories(
    source: &dyn SourceApi,
    organization: &str,
    limit: usize,
    per_page: u32,
) -> Result<Vec<RepositoryRef>> {
    if organization.trim().is_empty() {
        return Err(AppError::config("organization name is required"));
    }

    let mut repos = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1;

    loop {
        let result = source.list_repositories(organization, page, per_page).await?;
        let fetched = result.items.len();
        log::debug!("Repository page {} returned {} entries", page, fetched);

        for repo in result.items {
            if repo.private {
                continue;
            }
            if seen.insert(repo.name.clone()) {
                repos.push(repo);
            }
        }

        if limit > 0 && repos.len() >= limit {
            repos.truncate(limit);
            break;
        }

        match result.next_page {
            Some(next) if fetched > 0 => page = next,
            _ => break,
        }
    }

    Ok(repos)
}
