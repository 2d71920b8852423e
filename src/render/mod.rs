//! Static report rendering.
//!
//! Produces `index.html`, one `repos/{repository}.html` per snapshot and
//! `style.css` from a [`TemplateSource`] chosen at startup. Repository pages
//! live in their own directory so no repository name can shadow the index.

mod metrics;
mod templates;

use std::path::Path;

use chrono::{DateTime, Utc};

pub use metrics::{RepoMetrics, Scale, background_color, text_color};
pub use templates::{Template, TemplateSource};

use crate::error::Result;
use crate::models::{RenderConfig, RepositorySnapshot};
use crate::utils::{escape_html, is_safe_file_stem, truncate_graphemes};

/// Directory below the output root holding one page per repository.
pub const REPO_PAGE_DIR: &str = "repos";

/// Site-relative path of a repository's page.
pub fn repository_page_path(name: &str) -> String {
    format!("{REPO_PAGE_DIR}/{name}.html")
}

/// Format a crawl timestamp for page footers, e.g. "January 2, 2006 15:04 UTC".
pub fn format_last_updated(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%B %-d, %Y %H:%M UTC").to_string()
}

/// Counts from a site generation.
#[derive(Debug, Clone, Default)]
pub struct SiteReport {
    pub pages_written: usize,
    pub page_failures: usize,
}

/// Renders report pages from snapshots.
pub struct Renderer {
    index: Template,
    index_row: Template,
    repo: Template,
    commit_row: Template,
    stylesheet: Template,
    message_width: usize,
}

impl Renderer {
    /// Load every template up front so a missing file fails before any output.
    pub fn new(source: &TemplateSource, config: &RenderConfig) -> Result<Self> {
        Ok(Self {
            index: Template::load(source, "index.html")?,
            index_row: Template::load(source, "index_row.html")?,
            repo: Template::load(source, "repo.html")?,
            commit_row: Template::load(source, "commit_row.html")?,
            stylesheet: Template::load(source, "style.css")?,
            message_width: config.commit_message_width,
        })
    }

    fn footer(last_updated: Option<DateTime<Utc>>) -> String {
        last_updated.map_or_else(String::new, |t| {
            format!(
                "    <footer>Last updated: {}</footer>",
                escape_html(&format_last_updated(t))
            )
        })
    }

    /// Render the index page for snapshots already sorted by name.
    pub fn render_index(
        &self,
        snapshots: &[RepositorySnapshot],
        last_updated: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> String {
        let metrics: Vec<RepoMetrics> = snapshots
            .iter()
            .map(|s| RepoMetrics::compute(s, now))
            .collect();

        let commits = Scale::of(metrics.iter().map(|m| m.commit_count as i64));
        let behind = Scale::of(metrics.iter().map(|m| m.days_behind));
        let since = Scale::of(metrics.iter().map(|m| m.days_since_release));

        let rows: String = snapshots
            .iter()
            .zip(&metrics)
            .map(|(snapshot, m)| {
                let (commit_bg, commit_fg) = commits.colors(m.commit_count as i64);
                let (behind_bg, behind_fg) = behind.colors(m.days_behind);
                let (since_bg, since_fg) = since.colors(m.days_since_release);
                self.index_row.render(&[
                    ("name", escape_html(&snapshot.name)),
                    ("page_url", escape_html(&repository_page_path(&snapshot.name))),
                    ("repository_url", escape_html(&snapshot.repository_url)),
                    ("latest_release", escape_html(&snapshot.latest_release_tag)),
                    ("default_branch", escape_html(&snapshot.default_branch)),
                    ("commit_count", m.commit_count.to_string()),
                    ("commit_count_bg", commit_bg),
                    ("commit_count_fg", commit_fg.to_string()),
                    ("days_behind", m.days_behind.to_string()),
                    ("days_behind_bg", behind_bg),
                    ("days_behind_fg", behind_fg.to_string()),
                    ("days_since_release", m.days_since_release.to_string()),
                    ("days_since_release_bg", since_bg),
                    ("days_since_release_fg", since_fg.to_string()),
                ])
            })
            .collect();

        let owner = snapshots.first().map_or("", |s| s.owner.as_str());
        let total_commits: usize = metrics.iter().map(|m| m.commit_count).sum();
        let repos_with_commits = metrics.iter().filter(|m| m.commit_count > 0).count();

        self.index.render(&[
            ("owner", escape_html(owner)),
            ("total_repos", snapshots.len().to_string()),
            ("total_commits", total_commits.to_string()),
            ("repos_with_commits", repos_with_commits.to_string()),
            ("min_commits", commits.min.to_string()),
            ("max_commits", commits.max.to_string()),
            ("min_days_behind", behind.min.to_string()),
            ("max_days_behind", behind.max.to_string()),
            ("min_days_since_release", since.min.to_string()),
            ("max_days_since_release", since.max.to_string()),
            ("rows", rows),
            ("footer", Self::footer(last_updated)),
        ])
    }

    /// Render the detail page of one repository.
    pub fn render_repository(
        &self,
        snapshot: &RepositorySnapshot,
        last_updated: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> String {
        let metrics = RepoMetrics::compute(snapshot, now);

        let commit_rows: String = snapshot
            .unreleased_commits
            .iter()
            .map(|commit| {
                self.commit_row.render(&[
                    ("sha", escape_html(&commit.sha)),
                    ("short_sha", escape_html(commit.short_sha())),
                    ("url", escape_html(&commit.url)),
                    (
                        "summary",
                        escape_html(&truncate_graphemes(commit.summary(), self.message_width)),
                    ),
                    ("author", escape_html(&commit.author)),
                    ("date", commit.timestamp.format("%Y-%m-%d %H:%M").to_string()),
                ])
            })
            .collect();

        let empty_notice = if snapshot.unreleased_commits.is_empty() {
            "        <p class=\"empty\">Everything on the default branch is released.</p>".to_string()
        } else {
            String::new()
        };

        self.repo.render(&[
            ("owner", escape_html(&snapshot.owner)),
            ("name", escape_html(&snapshot.name)),
            ("repository_url", escape_html(&snapshot.repository_url)),
            ("compare_url", escape_html(&snapshot.compare_url())),
            ("default_branch", escape_html(&snapshot.default_branch)),
            ("latest_release", escape_html(&snapshot.latest_release_tag)),
            (
                "release_date",
                snapshot.latest_release_time.format("%Y-%m-%d").to_string(),
            ),
            ("commit_count", metrics.commit_count.to_string()),
            ("days_behind", metrics.days_behind.to_string()),
            ("days_since_release", metrics.days_since_release.to_string()),
            ("empty_notice", empty_notice),
            ("commit_rows", commit_rows),
            ("footer", Self::footer(last_updated)),
        ])
    }

    /// Stylesheet contents.
    pub fn stylesheet(&self) -> &str {
        self.stylesheet.text()
    }

    /// Write the whole site into `output_dir`.
    ///
    /// A failing repository page is logged and skipped; index and stylesheet
    /// failures are returned.
    pub async fn render_site(
        &self,
        snapshots: &[RepositorySnapshot],
        last_updated: Option<DateTime<Utc>>,
        output_dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<SiteReport> {
        tokio::fs::create_dir_all(output_dir.join(REPO_PAGE_DIR)).await?;

        let index = self.render_index(snapshots, last_updated, now);
        tokio::fs::write(output_dir.join("index.html"), index).await?;

        let mut report = SiteReport {
            pages_written: 1,
            ..SiteReport::default()
        };

        for snapshot in snapshots {
            if !is_safe_file_stem(&snapshot.name) {
                log::error!(
                    "Error generating page for {}: unusable file name",
                    snapshot.name
                );
                report.page_failures += 1;
                continue;
            }

            let page = self.render_repository(snapshot, last_updated, now);
            let path = output_dir.join(repository_page_path(&snapshot.name));
            match tokio::fs::write(&path, page).await {
                Ok(()) => report.pages_written += 1,
                Err(e) => {
                    log::error!("Error generating page for {}: {}", snapshot.name, e);
                    report.page_failures += 1;
                }
            }
        }

        tokio::fs::write(output_dir.join("style.css"), self.stylesheet()).await?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    use crate::models::CommitRecord;

    fn at(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 9, 0, 0).unwrap()
    }

    fn snapshot(name: &str, commits: usize) -> RepositorySnapshot {
        RepositorySnapshot {
            owner: "acme".to_string(),
            name: name.to_string(),
            default_branch: "main".to_string(),
            latest_release_tag: "v1.0.0".to_string(),
            latest_release_time: at(1, 1),
            unreleased_commits: (0..commits)
                .map(|i| CommitRecord {
                    sha: format!("{i:040}"),
                    author: "<script>".to_string(),
                    message: format!("Change #{i}\n\nExtended description"),
                    timestamp: at(1, 10 - i as u32),
                    url: format!("https://github.com/acme/{name}/commit/{i}"),
                })
                .collect(),
            repository_url: format!("https://github.com/acme/{name}"),
        }
    }

    fn renderer() -> Renderer {
        Renderer::new(&TemplateSource::Bundled, &RenderConfig::default()).unwrap()
    }

    #[test]
    fn test_format_last_updated() {
        let t = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap();
        assert_eq!(format_last_updated(t), "January 2, 2006 15:04 UTC");
    }

    #[test]
    fn test_index_lists_repositories_with_colors() {
        let snapshots = vec![snapshot("alpha", 0), snapshot("beta", 4)];
        let html = renderer().render_index(&snapshots, Some(at(2, 1)), at(3, 1));

        assert!(html.contains("Unreleased commits for acme"));
        assert!(html.contains(r#"<a href="repos/alpha.html">alpha</a>"#));
        assert!(html.contains(r#"<a href="repos/beta.html">beta</a>"#));
        assert!(html.contains("<strong>4</strong> unreleased commits in total"));
        assert!(html.contains("<strong>1</strong> with unreleased commits"));
        // alpha is the minimum (green), beta the maximum (red)
        assert!(html.contains("background-color: #10b981; color: #000000\">0<"));
        assert!(html.contains("background-color: #ef4444; color: #ffffff\">4<"));
        assert!(html.contains("Last updated: February 1, 2024 09:00 UTC"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_footer_omitted_when_unknown() {
        let html = renderer().render_index(&[snapshot("alpha", 1)], None, at(3, 1));
        assert!(!html.contains("Last updated"));
    }

    #[test]
    fn test_repository_page_escapes_and_lists_commits() {
        let html = renderer().render_repository(&snapshot("alpha", 2), None, at(3, 1));

        assert!(html.contains("acme/alpha"));
        assert!(html.contains("Change #0"));
        assert!(html.contains("Change #1"));
        assert!(!html.contains("Extended description"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("https://github.com/acme/alpha/compare/v1.0.0...main"));
        assert!(html.contains("<code>0000000</code>"));
        assert!(!html.contains("Everything on the default branch is released."));
    }

    #[test]
    fn test_repository_page_without_commits() {
        let html = renderer().render_repository(&snapshot("alpha", 0), None, at(3, 1));
        assert!(html.contains("Everything on the default branch is released."));
    }

    #[tokio::test]
    async fn test_render_site_writes_all_pages() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("site");
        let snapshots = vec![snapshot("alpha", 1), snapshot("beta", 0)];

        let report = renderer()
            .render_site(&snapshots, None, &out, at(3, 1))
            .await
            .unwrap();

        assert_eq!(report.pages_written, 3);
        assert_eq!(report.page_failures, 0);
        for file in ["index.html", "repos/alpha.html", "repos/beta.html", "style.css"] {
            assert!(out.join(file).exists(), "{file}");
        }
    }

    #[tokio::test]
    async fn test_render_site_skips_unsafe_names() {
        let tmp = TempDir::new().unwrap();
        let snapshots = vec![snapshot("../evil", 1), snapshot("ok", 1)];

        let report = renderer()
            .render_site(&snapshots, None, tmp.path(), at(3, 1))
            .await
            .unwrap();

        assert_eq!(report.page_failures, 1);
        assert!(tmp.path().join("repos/ok.html").exists());
    }

    #[tokio::test]
    async fn test_repository_named_index_keeps_summary_page() {
        let tmp = TempDir::new().unwrap();
        let snapshots = vec![snapshot("alpha", 1), snapshot("index", 2)];

        let report = renderer()
            .render_site(&snapshots, None, tmp.path(), at(3, 1))
            .await
            .unwrap();

        assert_eq!(report.pages_written, 3);
        assert_eq!(report.page_failures, 0);
        let index = std::fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(index.contains(r#"<a href="repos/alpha.html">alpha</a>"#));
        assert!(index.contains(r#"<a href="repos/index.html">index</a>"#));
        let page = std::fs::read_to_string(tmp.path().join("repos/index.html")).unwrap();
        assert!(page.contains("acme/index"));
    }
}
