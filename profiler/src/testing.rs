//! In-memory doubles for the data source and summarizer

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ProfilerError, ProfilerResult, Service};
use crate::github::{DataSource, Profile, RepositorySummary};
use crate::pipeline::EnrichedRepository;
use crate::summarizer::{Summarizer, FALLBACK_SUMMARY};

pub(crate) fn repo(name: &str, owner: &str, language: Option<&str>) -> RepositorySummary {
    let repo = RepositorySummary::new(name, owner);
    match language {
        Some(lang) => repo.with_language(lang),
        None => repo,
    }
}

pub(crate) fn enriched(repo: RepositorySummary, readme: &str, commits: u32) -> EnrichedRepository {
    EnrichedRepository {
        repo,
        readme: readme.to_string(),
        commit_count: commits,
        readme_degraded: false,
        commits_degraded: false,
    }
}

/// Data source backed by maps; records every call it receives
#[derive(Default)]
pub(crate) struct FakeSource {
    users: HashMap<String, Vec<RepositorySummary>>,
    readmes: HashMap<String, String>,
    commits: HashMap<String, u32>,
    failing_readmes: HashSet<String>,
    failing_commits: HashSet<String>,
    delays: HashMap<String, Duration>,
    missing_token: bool,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, login: &str, repos: Vec<RepositorySummary>) -> Self {
        self.users.insert(login.to_string(), repos);
        self
    }

    pub fn with_readme(mut self, key: &str, text: &str) -> Self {
        self.readmes.insert(key.to_string(), text.to_string());
        self
    }

    pub fn with_commits(mut self, key: &str, count: u32) -> Self {
        self.commits.insert(key.to_string(), count);
        self
    }

    pub fn failing_readme(mut self, key: &str) -> Self {
        self.failing_readmes.insert(key.to_string());
        self
    }

    pub fn failing_commits(mut self, key: &str) -> Self {
        self.failing_commits.insert(key.to_string());
        self
    }

    /// Delay both sub-fetches for `key` by `delay`
    pub fn slow_repo(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn without_token(mut self) -> Self {
        self.missing_token = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of sub-fetches observed running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_token(&self) -> ProfilerResult<()> {
        if self.missing_token {
            return Err(ProfilerError::configuration("Missing GitHub token"));
        }
        Ok(())
    }

    async fn sub_fetch(&self, key: &str) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let delay = self.delays.get(key).copied().unwrap_or(Duration::from_millis(5));
        tokio::time::sleep(delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DataSource for FakeSource {
    fn ensure_credentials(&self) -> ProfilerResult<()> {
        self.check_token()
    }

    async fn get_user(&self, username: &str) -> ProfilerResult<Profile> {
        self.check_token()?;
        self.record(format!("user:{}", username));
        match self.users.get(username) {
            Some(repos) => Ok(Profile {
                login: username.to_string(),
                name: None,
                avatar_url: None,
                bio: None,
                followers: 0,
                public_repos: repos.len() as u64,
            }),
            None => Err(ProfilerError::NotFound(username.to_string())),
        }
    }

    async fn list_repos(
        &self,
        username: &str,
        limit: usize,
    ) -> ProfilerResult<Vec<RepositorySummary>> {
        self.check_token()?;
        self.record(format!("repos:{}", username));
        match self.users.get(username) {
            Some(repos) => Ok(repos.iter().take(limit).cloned().collect()),
            None => Err(ProfilerError::NotFound(username.to_string())),
        }
    }

    async fn get_readme(&self, owner: &str, repo: &str) -> ProfilerResult<Option<String>> {
        self.check_token()?;
        let key = format!("{}/{}", owner, repo);
        self.record(format!("readme:{}", key));
        self.sub_fetch(&key).await;
        if self.failing_readmes.contains(&key) {
            return Err(ProfilerError::upstream(Service::GitHub, "README fetch returned 500"));
        }
        Ok(self.readmes.get(&key).cloned())
    }

    async fn count_commits(&self, owner: &str, repo: &str, _per_page: u32) -> ProfilerResult<u32> {
        self.check_token()?;
        let key = format!("{}/{}", owner, repo);
        self.record(format!("commits:{}", key));
        self.sub_fetch(&key).await;
        if self.failing_commits.contains(&key) {
            return Err(ProfilerError::upstream(Service::GitHub, "commit list returned 500"));
        }
        Ok(self.commits.get(&key).copied().unwrap_or(0))
    }
}

/// Summarizer that answers "summary of <user>" for the user named in the prompt
#[derive(Default)]
pub(crate) struct FakeSummarizer {
    failing_for: HashSet<String>,
    fallback: bool,
    missing_key: bool,
    prompts: Mutex<Vec<String>>,
}

impl FakeSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with an upstream error for prompts about `username`
    pub fn failing_for(mut self, username: &str) -> Self {
        self.failing_for.insert(username.to_string());
        self
    }

    /// Answer every prompt with the fallback literal
    pub fn returning_fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn without_key(mut self) -> Self {
        self.missing_key = true;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

/// Username between the first pair of `**` in a composed prompt
fn prompt_subject(prompt: &str) -> &str {
    prompt
        .split("**")
        .nth(1)
        .unwrap_or_default()
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, prompt: &str) -> ProfilerResult<String> {
        self.ensure_credentials()?;
        let subject = prompt_subject(prompt).to_string();
        if self.failing_for.contains(&subject) {
            return Err(ProfilerError::upstream(Service::Summarizer, "Gemini API returned 500"));
        }

        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fallback {
            return Ok(FALLBACK_SUMMARY.to_string());
        }
        Ok(format!("summary of {}", subject))
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    fn ensure_credentials(&self) -> ProfilerResult<()> {
        if self.missing_key {
            return Err(ProfilerError::configuration("Missing summarizer API key"));
        }
        Ok(())
    }
}
