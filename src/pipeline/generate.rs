// src/pipeline/generate.rs

//! Static report generation from persisted snapshots.

use std::path::Path;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::render::{Renderer, SiteReport, TemplateSource, format_last_updated};
use crate::storage::SnapshotStorage;

/// Render every persisted snapshot into `output_dir`.
///
/// A missing or unreadable crawl timestamp only drops the footer; a snapshot
/// that does not match the schema stops generation.
pub async fn run_generate(
    config: &Config,
    storage: &dyn SnapshotStorage,
    templates: &TemplateSource,
    output_dir: &Path,
) -> Result<SiteReport> {
    log::info!("Generating HTML pages...");

    let renderer = Renderer::new(templates, &config.render)?;

    let last_updated = match storage.load_crawl_timestamp().await {
        Ok(Some(stamp)) => Some(stamp.last_crawled),
        Ok(None) => None,
        Err(e) => {
            log::warn!("Could not load crawl timestamp: {}", e);
            None
        }
    };

    let snapshots = storage.load_snapshots().await?;
    if snapshots.is_empty() {
        return Err(AppError::config(
            "No repository snapshots found in storage. Run the crawl command first.",
        ));
    }
    log::info!("Loaded {} repository snapshots", snapshots.len());
    if let Some(t) = last_updated {
        log::debug!("Last crawl: {}", format_last_updated(t));
    }

    let report = renderer
        .render_site(&snapshots, last_updated, output_dir, Utc::now())
        .await?;

    log::info!(
        "Generated {} HTML pages in {}/ directory",
        report.pages_written,
        output_dir.display()
    );
    log::info!("   Open {}/index.html in your browser", output_dir.display());

    Ok(report)
}
