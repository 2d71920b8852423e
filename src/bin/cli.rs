//! unreleased CLI
//!
//! `crawl` fetches unreleased commits for an organization into the storage
//! directory; `generate` renders them into a static site.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use unreleased::{
    error::Result,
    models::Config,
    pipeline,
    render::{TemplateSource, format_last_updated},
    storage::{LocalStorage, SnapshotStorage},
};

/// Report commits on each repository's default branch that are not released yet
#[derive(Parser, Debug)]
#[command(name = "unreleased", version, about)]
struct Cli {
    /// Directory holding config.toml, snapshots and the crawl timestamp
    #[arg(short, long, default_value = "data", global = true)]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the API and write one snapshot per repository with a release
    Crawl {
        /// Organization whose public repositories are crawled
        #[arg(short, long)]
        org: String,

        /// Process at most this many repositories
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },

    /// Generate HTML pages from the stored snapshots
    Generate {
        /// Output directory (default: paths.output_dir from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory with templates overriding the bundled ones
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// Show what is currently stored
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");
    let config = if config_path.exists() {
        let config = Config::load_or_default(&config_path);
        log::debug!("Loaded configuration from {}", config_path.display());
        config
    } else {
        Config::default()
    };

    let storage = LocalStorage::new(&cli.storage_dir);

    match cli.command {
        Command::Crawl { org, limit } => {
            config.validate()?;
            let limit = limit.map_or(0, |n| n as usize);
            let summary = pipeline::run_crawler(&config, &storage, &org, limit).await?;

            log::info!(
                "Enumerated {}: {} processed, {} skipped, {} failed",
                summary.enumerated,
                summary.processed,
                summary.skipped,
                summary.failed
            );
        }

        Command::Generate {
            output,
            template_dir,
        } => {
            config.validate()?;
            let output_dir = output.unwrap_or_else(|| config.paths.output_dir.clone());
            let templates =
                TemplateSource::from_dir(template_dir.or_else(|| config.paths.template_dir.clone()));
            if let TemplateSource::Directory(dir) = &templates {
                log::info!("Loading templates from disk: {}", dir.display());
            }

            let report = pipeline::run_generate(&config, &storage, &templates, &output_dir).await?;
            if report.page_failures > 0 {
                log::warn!("{} repository pages could not be generated", report.page_failures);
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
            log::info!("  API: {}", config.source.api_url);
            log::info!("  Token variable: {}", config.source.token_env);
            log::info!("  Page size: {}", config.source.per_page);
            log::info!("  Concurrent repositories: {}", config.source.max_concurrent);
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let snapshots = storage.load_snapshots().await?;
            let commits: usize = snapshots.iter().map(|s| s.commit_count()).sum();
            log::info!(
                "Snapshots: {} repositories, {} unreleased commits",
                snapshots.len(),
                commits
            );

            match storage.load_crawl_timestamp().await {
                Ok(Some(stamp)) => {
                    log::info!("Last crawled: {}", format_last_updated(stamp.last_crawled))
                }
                Ok(None) => log::info!("No crawl recorded yet."),
                Err(e) => log::warn!("Could not read crawl timestamp: {}", e),
            }
        }
    }

    Ok(())
}
