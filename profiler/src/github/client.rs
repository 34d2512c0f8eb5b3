//! GitHub REST client
//!
//! One shared `reqwest::Client` per instance. Every request carries the
//! configured bearer token; without a token nothing is sent.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use url::Url;

use super::types::{Profile, ReadmeResponse, RepositorySummary};
use super::DataSource;
use crate::config::GitHubConfig;
use crate::error::{ProfilerError, ProfilerResult, Service};

/// GitHub accepts at most this many items per page
const MAX_PER_PAGE: usize = 100;

/// GitHub REST API client
#[derive(Clone)]
pub struct GitHubClient {
    config: GitHubConfig,
    client: Client,
}

impl GitHubClient {
    /// Create a new client with the given configuration
    pub fn new(config: GitHubConfig) -> ProfilerResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ProfilerError::configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Whether a bearer token is configured
    pub fn has_token(&self) -> bool {
        self.config.token.is_some()
    }

    fn token(&self) -> ProfilerResult<&str> {
        self.config
            .token
            .as_deref()
            .ok_or_else(|| ProfilerError::configuration("Missing GitHub token"))
    }

    /// Build `{api_url}/{segments...}` with each segment escaped
    fn endpoint(&self, segments: &[&str]) -> ProfilerResult<Url> {
        let mut url = Url::parse(&self.config.api_url).map_err(|e| {
            ProfilerError::configuration(format!("invalid GitHub API URL: {}", e))
        })?;

        url.path_segments_mut()
            .map_err(|_| ProfilerError::configuration("GitHub API URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn get(&self, url: Url, token: &str) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(token)
            .header(header::ACCEPT, "application/vnd.github+json")
    }

    async fn send(&self, request: RequestBuilder) -> ProfilerResult<Response> {
        request
            .send()
            .await
            .map_err(|e| ProfilerError::upstream(Service::GitHub, e.to_string()))
    }
}

/// Turn a non-success response into an upstream error, logging the body
async fn upstream_failure(response: Response, what: &str) -> ProfilerError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!("GitHub {} failed with {}: {}", what, status, body);
    ProfilerError::upstream(Service::GitHub, format!("{} returned {}", what, status))
}

fn decode_readme(readme: ReadmeResponse) -> ProfilerResult<String> {
    if let Some(encoding) = readme.encoding.as_deref() {
        if encoding != "base64" {
            return Err(ProfilerError::upstream(
                Service::GitHub,
                format!("unsupported README encoding: {}", encoding),
            ));
        }
    }

    // GitHub wraps the base64 payload at 60 columns
    let compact: String = readme
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD.decode(compact.as_bytes()).map_err(|e| {
        ProfilerError::upstream(Service::GitHub, format!("README is not valid base64: {}", e))
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[async_trait]
impl DataSource for GitHubClient {
    fn ensure_credentials(&self) -> ProfilerResult<()> {
        self.token().map(|_| ())
    }

    async fn get_user(&self, username: &str) -> ProfilerResult<Profile> {
        let token = self.token()?;
        let url = self.endpoint(&["users", username])?;
        tracing::debug!("GET {}", url);

        let response = self.send(self.get(url, token)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ProfilerError::NotFound(username.to_string())),
            status if !status.is_success() => Err(upstream_failure(response, "user lookup").await),
            _ => response
                .json::<Profile>()
                .await
                .map_err(|e| ProfilerError::upstream(Service::GitHub, e.to_string())),
        }
    }

    async fn list_repos(
        &self,
        username: &str,
        limit: usize,
    ) -> ProfilerResult<Vec<RepositorySummary>> {
        let token = self.token()?;
        let url = self.endpoint(&["users", username, "repos"])?;
        let per_page = limit.clamp(1, MAX_PER_PAGE);
        tracing::debug!("GET {} (per_page={})", url, per_page);

        let response = self
            .send(self.get(url, token).query(&[("per_page", per_page)]))
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ProfilerError::NotFound(username.to_string())),
            status if !status.is_success() => Err(upstream_failure(response, "repo list").await),
            _ => {
                let mut repos = response
                    .json::<Vec<RepositorySummary>>()
                    .await
                    .map_err(|e| ProfilerError::upstream(Service::GitHub, e.to_string()))?;
                repos.truncate(limit);
                Ok(repos)
            }
        }
    }

    async fn get_readme(&self, owner: &str, repo: &str) -> ProfilerResult<Option<String>> {
        let token = self.token()?;
        let url = self.endpoint(&["repos", owner, repo, "readme"])?;
        tracing::debug!("GET {}", url);

        let response = self.send(self.get(url, token)).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if !status.is_success() => Err(upstream_failure(response, "README fetch").await),
            _ => {
                let readme = response
                    .json::<ReadmeResponse>()
                    .await
                    .map_err(|e| ProfilerError::upstream(Service::GitHub, e.to_string()))?;
                decode_readme(readme).map(Some)
            }
        }
    }

    async fn count_commits(&self, owner: &str, repo: &str, per_page: u32) -> ProfilerResult<u32> {
        let token = self.token()?;
        let url = self.endpoint(&["repos", owner, repo, "commits"])?;
        let per_page = (per_page as usize).clamp(1, MAX_PER_PAGE);
        tracing::debug!("GET {} (per_page={})", url, per_page);

        let response = self
            .send(self.get(url, token).query(&[("per_page", per_page)]))
            .await?;
        if !response.status().is_success() {
            return Err(upstream_failure(response, "commit list").await);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProfilerError::upstream(Service::GitHub, e.to_string()))?;

        match body.as_array() {
            Some(commits) => Ok(commits.len() as u32),
            None => Err(ProfilerError::upstream(
                Service::GitHub,
                "commit list is not an array",
            )),
        }
    }
}
