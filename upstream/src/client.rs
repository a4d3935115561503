use crate::error::{Result, UpstreamError};
use crate::filter::collect_range;
use crate::types::{ApiCommit, UpstreamCommit};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_WEB_BASE: &str = "https://github.com";

/// Source of upstream commit history between two commits of one repository
pub trait HistoryClient: Send + Sync {
    /// Commits reachable from `to_sha`, newest first, stopping before `from_sha`
    fn fetch_commits(
        &self,
        repo_slug: &str,
        from_sha: &str,
        to_sha: &str,
    ) -> impl Future<Output = Result<Vec<UpstreamCommit>>> + Send;
}

/// Settings for talking to a GitHub-compatible API
#[derive(Clone)]
pub struct GithubConfig {
    pub api_base: String,
    pub web_base: String,
    pub user_agent: String,
    pub per_page: u32,
    pub timeout_seconds: u64,
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            user_agent: "changelog".to_string(),
            per_page: 100,
            timeout_seconds: 30,
            token: None,
        }
    }
}

impl GithubConfig {
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

// keeps the credential out of debug output
impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_base", &self.api_base)
            .field("web_base", &self.web_base)
            .field("user_agent", &self.user_agent)
            .field("per_page", &self.per_page)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `HistoryClient` backed by the GitHub REST API.
///
/// Only the first page of history is requested. When the range start is not on
/// that page every fetched commit is returned.
#[derive(Clone, Debug)]
pub struct GithubClient {
    client: Client,
    config: GithubConfig,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Result<Self> {
        if config.per_page == 0 || config.per_page > 100 {
            return Err(UpstreamError::invalid_config(format!(
                "per_page must be between 1 and 100, got {}",
                config.per_page
            )));
        }
        Url::parse(&config.api_base)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    /// URL of the commit listing reachable from `to_sha`
    pub fn commits_url(&self, repo_slug: &str, to_sha: &str) -> Result<Url> {
        let (owner, repo) = split_slug(repo_slug)?;
        let mut url = Url::parse(&self.config.api_base)?;

        url.path_segments_mut()
            .map_err(|_| UpstreamError::invalid_config("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["repos", owner, repo, "commits"]);
        url.query_pairs_mut()
            .append_pair("sha", to_sha)
            .append_pair("per_page", &self.config.per_page.to_string());

        Ok(url)
    }

    async fn fetch_page(&self, repo_slug: &str, to_sha: &str) -> Result<Vec<ApiCommit>> {
        let url = self.commits_url(repo_slug, to_sha)?;

        let mut request = self
            .client
            .get(url)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::UnexpectedStatus {
                repo: repo_slug.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| UpstreamError::Decode {
            repo: repo_slug.to_string(),
            source,
        })
    }
}

impl HistoryClient for GithubClient {
    async fn fetch_commits(
        &self,
        repo_slug: &str,
        from_sha: &str,
        to_sha: &str,
    ) -> Result<Vec<UpstreamCommit>> {
        let page = self.fetch_page(repo_slug, to_sha).await?;
        let range = collect_range(&page, from_sha, repo_slug, &self.config.web_base);

        if !range.reached_start {
            debug!(
                repo = repo_slug,
                from = from_sha,
                fetched = page.len(),
                "range start not on first history page, keeping everything fetched"
            );
        }
        debug!(
            repo = repo_slug,
            fetched = page.len(),
            kept = range.commits.len(),
            "fetched upstream history"
        );

        Ok(range.commits)
    }
}

/// Split `owner/repo` into its two parts
pub fn split_slug(slug: &str) -> Result<(&str, &str)> {
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(UpstreamError::InvalidSlug {
            slug: slug.to_string(),
        }),
    }
}
