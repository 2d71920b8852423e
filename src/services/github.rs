// src/services/github.rs

//! GitHub REST API implementation of [`SourceApi`].

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    ApiCommit, ApiRelease, Comparison, Page, RepositoryDetail, RepositoryRef, SourceConfig,
};
use crate::services::SourceApi;
use crate::utils::http;

static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]*)>\s*;\s*rel="next""#).expect("next link pattern is valid")
});

/// Error payload returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the GitHub REST API (github.com or an Enterprise base URL).
pub struct GitHubClient {
    client: Client,
    base_url: Url,
}

impl GitHubClient {
    /// Create a client authenticated with the given bearer token.
    pub fn new(config: &SourceConfig, token: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| AppError::config(format!("invalid token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let client = http::create_async_client(config, headers)?;
        let base_url = Url::parse(&config.api_url)?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "source.api_url cannot be used as a base: {}",
                config.api_url
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL from path segments below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, url: Url, context: &str) -> Result<Response> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
        Err(AppError::remote_status(context, status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| AppError::remote(context, format!("unexpected response body: {e}")))
    }

    async fn get_page<T: DeserializeOwned>(&self, url: Url, context: &str) -> Result<(T, Option<u32>)> {
        let response = self.send(url, context).await?;
        let next_page = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_from_link);
        let body = Self::decode(response, context).await?;
        Ok((body, next_page))
    }
}

#[async_trait]
impl SourceApi for GitHubClient {
    async fn list_repositories(
        &self,
        organization: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<RepositoryRef>> {
        let mut url = self.endpoint(&["orgs", organization, "repos"]);
        url.query_pairs_mut()
            .append_pair("type", "public")
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let context = format!("{organization} repository list (page {page})");
        let (items, next_page) = self.get_page(url, &context).await?;
        Ok(Page::new(items, next_page))
    }

    async fn latest_release(
        &self,
        organization: &str,
        repository: &str,
    ) -> Result<Option<ApiRelease>> {
        let url = self.endpoint(&["repos", organization, repository, "releases", "latest"]);
        let context = format!("{organization}/{repository} latest release");

        match self.send(url, &context).await {
            Ok(response) => Ok(Some(Self::decode(response, &context).await?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn repository(&self, organization: &str, repository: &str) -> Result<RepositoryDetail> {
        let url = self.endpoint(&["repos", organization, repository]);
        let context = format!("{organization}/{repository} detail");
        let response = self.send(url, &context).await?;
        Self::decode(response, &context).await
    }

    async fn compare_commits(
        &self,
        organization: &str,
        repository: &str,
        base: &str,
        head: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<ApiCommit>> {
        let range = format!("{base}...{head}");
        let mut url = self.endpoint(&["repos", organization, repository, "compare", &range]);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        let context = format!("{organization}/{repository} compare {range} (page {page})");
        let (comparison, next_page): (Comparison, _) = self.get_page(url, &context).await?;
        Ok(Page::new(comparison.commits, next_page))
    }
}

/// Extract the `page` query parameter of the `rel="next"` entry of a Link header.
pub fn next_page_from_link(header: &str) -> Option<u32> {
    let caps = NEXT_LINK.captures(header)?;
    let url = Url::parse(caps.get(1)?.as_str()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
