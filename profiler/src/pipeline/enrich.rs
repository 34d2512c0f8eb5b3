//! Repository enrichment
//!
//! Each repository gets its README text and recent commit count. Both
//! sub-fetches are best effort: a failure resolves to a sentinel (empty
//! README, zero commits) and never fails the batch.

use std::future::Future;
use std::time::Duration;

use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use super::PipelineSettings;
use crate::error::ProfilerResult;
use crate::github::{DataSource, RepositorySummary};

/// Outcome of one best-effort sub-fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Ok(T),
    /// The fetch failed or timed out; the value is the default sentinel
    Degraded(T),
}

impl<T> Fetched<T> {
    pub fn into_value(self) -> T {
        match self {
            Fetched::Ok(v) | Fetched::Degraded(v) => v,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetched::Degraded(_))
    }
}

/// A repository augmented with README text and commit count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRepository {
    #[serde(flatten)]
    pub repo: RepositorySummary,
    /// README text; empty when none is available
    pub readme: String,
    /// Recent commit count; 0 for both "no commits" and "fetch failed"
    pub commit_count: u32,
    #[serde(skip)]
    pub readme_degraded: bool,
    #[serde(skip)]
    pub commits_degraded: bool,
}

/// A repository supplied by a caller, optionally with its README already known
#[derive(Debug, Clone, Deserialize)]
pub struct SuppliedRepository {
    #[serde(flatten)]
    pub repo: RepositorySummary,
    #[serde(default)]
    pub readme: Option<String>,
}

enum ReadmeSource {
    Fetch,
    Supplied(Option<String>),
}

/// Enriches repositories against a data source
pub struct Enricher<'a> {
    source: &'a dyn DataSource,
    commits_per_page: u32,
    fetch_timeout: Option<Duration>,
    max_concurrency: Option<usize>,
}

impl<'a> Enricher<'a> {
    pub fn new(source: &'a dyn DataSource, settings: &PipelineSettings) -> Self {
        Self {
            source,
            commits_per_page: settings.commits_per_page,
            fetch_timeout: settings.fetch_timeout,
            max_concurrency: settings.max_concurrency,
        }
    }

    /// Fetch README and commit count for every repository, preserving order
    pub async fn enrich(&self, repos: Vec<RepositorySummary>) -> Vec<EnrichedRepository> {
        let jobs = repos
            .into_iter()
            .map(|repo| (repo, ReadmeSource::Fetch))
            .collect();
        self.run(jobs).await
    }

    /// Fetch commit counts only; supplied README text is used as is
    pub async fn enrich_supplied(&self, repos: Vec<SuppliedRepository>) -> Vec<EnrichedRepository> {
        let jobs = repos
            .into_iter()
            .map(|supplied| (supplied.repo, ReadmeSource::Supplied(supplied.readme)))
            .collect();
        self.run(jobs).await
    }

    async fn run(&self, jobs: Vec<(RepositorySummary, ReadmeSource)>) -> Vec<EnrichedRepository> {
        let count = jobs.len();
        let tasks = jobs
            .into_iter()
            .map(|(repo, readme)| self.enrich_one(repo, readme));

        let enriched: Vec<EnrichedRepository> = match self.max_concurrency {
            Some(limit) => stream::iter(tasks).buffered(limit.max(1)).collect().await,
            None => join_all(tasks).await,
        };

        tracing::debug!("Enriched {} repositories", count);
        enriched
    }

    async fn enrich_one(
        &self,
        repo: RepositorySummary,
        readme: ReadmeSource,
    ) -> EnrichedRepository {
        let readme_fut = async {
            match readme {
                ReadmeSource::Fetch => self.fetch_readme(&repo).await,
                ReadmeSource::Supplied(text) => Fetched::Ok(text.unwrap_or_default()),
            }
        };
        let (readme, commits) = tokio::join!(readme_fut, self.fetch_commit_count(&repo));

        EnrichedRepository {
            readme_degraded: readme.is_degraded(),
            commits_degraded: commits.is_degraded(),
            readme: readme.into_value(),
            commit_count: commits.into_value(),
            repo,
        }
    }

    /// README text, or the empty sentinel when absent or on failure
    pub async fn fetch_readme(&self, repo: &RepositorySummary) -> Fetched<String> {
        let fut = async {
            self.source
                .get_readme(&repo.owner.login, &repo.name)
                .await
                .map(Option::unwrap_or_default)
        };
        self.settle("README", repo, fut, String::new()).await
    }

    /// Recent commit count, or 0 on failure
    pub async fn fetch_commit_count(&self, repo: &RepositorySummary) -> Fetched<u32> {
        let fut = self
            .source
            .count_commits(&repo.owner.login, &repo.name, self.commits_per_page);
        self.settle("commits", repo, fut, 0).await
    }

    async fn settle<T, F>(
        &self,
        what: &str,
        repo: &RepositorySummary,
        fut: F,
        default: T,
    ) -> Fetched<T>
    where
        F: Future<Output = ProfilerResult<T>>,
    {
        let result = match self.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        "{} fetch for {}/{} timed out after {:?}",
                        what,
                        repo.owner.login,
                        repo.name,
                        limit
                    );
                    return Fetched::Degraded(default);
                }
            },
            None => fut.await,
        };

        match result {
            Ok(value) => Fetched::Ok(value),
            Err(e) => {
                tracing::warn!(
                    "{} fetch for {}/{} failed: {}",
                    what,
                    repo.owner.login,
                    repo.name,
                    e
                );
                Fetched::Degraded(default)
            }
        }
    }
}
