//! Data-source abstraction over the GitHub REST API

mod client;
mod types;

pub use client::GitHubClient;
pub use types::{Profile, RepoOwner, RepositorySummary, UNKNOWN_LANGUAGE};

use async_trait::async_trait;

use crate::error::ProfilerResult;

/// Read operations the pipeline needs from the data source
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch a user's profile; `NotFound` when the user does not exist
    async fn get_user(&self, username: &str) -> ProfilerResult<Profile>;

    /// Fetch up to `limit` repositories in source order
    async fn list_repos(&self, username: &str, limit: usize)
        -> ProfilerResult<Vec<RepositorySummary>>;

    /// Fetch and decode a repository README; `Ok(None)` when there is none
    async fn get_readme(&self, owner: &str, repo: &str) -> ProfilerResult<Option<String>>;

    /// Count the most recent commits, requesting at most `per_page`
    async fn count_commits(&self, owner: &str, repo: &str, per_page: u32) -> ProfilerResult<u32>;

    /// Fail with `Configuration` when the source cannot authenticate.
    ///
    /// Called before best-effort fan-out so a missing credential is not
    /// mistaken for a per-repository failure.
    fn ensure_credentials(&self) -> ProfilerResult<()> {
        Ok(())
    }
}
