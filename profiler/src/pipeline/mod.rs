//! Aggregation pipeline
//!
//! username → fetch → enrich → aggregate → compose → summarize.
//! [`Pipeline`] owns the two upstream seams and runs every stage for one
//! request; nothing is cached between requests.

pub mod aggregate;
pub mod enrich;
pub mod fetch;
pub mod prompt;

pub use aggregate::{AggregationPayload, CommitActivity, ReadmeExcerpt};
pub use enrich::{EnrichedRepository, Enricher, Fetched, SuppliedRepository};
pub use fetch::{fetch_profile, validate_username};
pub use prompt::compose;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::error::ProfilerResult;
use crate::github::{DataSource, Profile};
use crate::summarizer::Summarizer;

/// Tunables for the fetch/enrich/compose stages
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Maximum repositories taken per user
    pub repo_cap: usize,
    /// Commits requested per repository
    pub commits_per_page: u32,
    /// README excerpt length in characters
    pub excerpt_chars: usize,
    /// Per sub-fetch timeout; `None` waits for the upstream indefinitely
    pub fetch_timeout: Option<Duration>,
    /// Repositories enriched at once; `None` fans out over all of them
    pub max_concurrency: Option<usize>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            repo_cap: 5,
            commits_per_page: 50,
            excerpt_chars: 500,
            fetch_timeout: None,
            max_concurrency: None,
        }
    }
}

/// Profile plus enriched repositories for one user
#[derive(Debug, Clone, Serialize)]
pub struct UserActivity {
    pub user: Profile,
    pub repos: Vec<EnrichedRepository>,
}

/// One side of a comparison
#[derive(Debug)]
pub struct ComparisonSide {
    pub username: String,
    pub outcome: ProfilerResult<String>,
}

/// Two independently produced summaries
#[derive(Debug)]
pub struct Comparison {
    pub first: ComparisonSide,
    pub second: ComparisonSide,
}

/// The full fetch-to-summary pipeline
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn DataSource>,
    summarizer: Arc<dyn Summarizer>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn DataSource>,
        summarizer: Arc<dyn Summarizer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            summarizer,
            settings,
        }
    }

    /// Fetch a profile and enrich its repositories
    pub async fn collect(&self, username: &str) -> ProfilerResult<UserActivity> {
        let (user, repos) =
            fetch_profile(self.source.as_ref(), username, self.settings.repo_cap).await?;
        let repos = Enricher::new(self.source.as_ref(), &self.settings)
            .enrich(repos)
            .await;

        Ok(UserActivity { user, repos })
    }

    /// Run every stage for one username.
    ///
    /// Both upstream credentials are checked before anything is fetched.
    pub async fn summarize_user(&self, username: &str) -> ProfilerResult<String> {
        validate_username(username)?;
        self.summarizer.ensure_credentials()?;

        let activity = self.collect(username).await?;
        tracing::info!(
            "Collected {} repositories for {}",
            activity.repos.len(),
            activity.user.login
        );
        self.summarize_enriched(&activity.user.login, &activity.repos)
            .await
    }

    /// Summarize caller-supplied repositories; only commit counts are fetched
    pub async fn summarize_repos(
        &self,
        username: &str,
        repos: Vec<SuppliedRepository>,
    ) -> ProfilerResult<String> {
        let username = validate_username(username)?;
        self.source.ensure_credentials()?;
        self.summarizer.ensure_credentials()?;

        let enriched = Enricher::new(self.source.as_ref(), &self.settings)
            .enrich_supplied(repos)
            .await;
        self.summarize_enriched(username, &enriched).await
    }

    /// Run the pipeline for two users concurrently.
    ///
    /// Neither side can cancel or fail the other; each outcome is reported
    /// as it settled.
    pub async fn compare_users(&self, first: &str, second: &str) -> Comparison {
        let (first_outcome, second_outcome) =
            tokio::join!(self.summarize_user(first), self.summarize_user(second));

        for (username, outcome) in [(first, &first_outcome), (second, &second_outcome)] {
            if let Err(e) = outcome {
                tracing::warn!("Comparison side {} failed: {}", username.trim(), e);
            }
        }

        Comparison {
            first: ComparisonSide {
                username: first.trim().to_string(),
                outcome: first_outcome,
            },
            second: ComparisonSide {
                username: second.trim().to_string(),
                outcome: second_outcome,
            },
        }
    }

    async fn summarize_enriched(
        &self,
        username: &str,
        repos: &[EnrichedRepository],
    ) -> ProfilerResult<String> {
        let payload = AggregationPayload::build(repos, self.settings.excerpt_chars);
        let prompt = compose(username, &payload);
        tracing::debug!(
            "Composed prompt for {} ({} chars, model {})",
            username,
            prompt.chars().count(),
            self.summarizer.model()
        );

        self.summarizer.summarize(&prompt).await
    }
}
