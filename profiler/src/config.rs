//! Configuration loading
//!
//! Settings come from an optional `.profiler.toml`; credentials come only
//! from the environment (via CLI flags) and are handed to each client
//! explicitly.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::pipeline::PipelineSettings;

const CONFIG_FILE_NAME: &str = ".profiler.toml";
const APP_DIR: &str = "gh-profiler";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/gh-profiler/
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join(APP_DIR).join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

/// Credentials supplied out of band (environment or CLI flags)
#[derive(Clone, Default)]
pub struct Credentials {
    pub github_token: Option<String>,
    pub gemini_api_key: Option<String>,
}

impl Credentials {
    /// Build credentials, treating blank values as absent
    pub fn new(github_token: Option<String>, gemini_api_key: Option<String>) -> Self {
        Self {
            github_token: non_blank(github_token),
            gemini_api_key: non_blank(gemini_api_key),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Runtime client configuration
// ============================================================================

/// Configuration for the GitHub REST client
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// Base URL of the REST API
    pub api_url: String,
    /// Bearer token; absence fails every request before it is sent
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl GitHubConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: None,
            user_agent: default_user_agent(),
            timeout: Duration::from_secs(default_github_timeout()),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for the generative-text summarization client
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub api_url: String,
    pub model: String,
    /// Service API key, distinct from the GitHub token
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl SummarizerConfig {
    pub fn new(api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            model: model.into(),
            api_key: None,
            timeout: Duration::from_secs(default_summarizer_timeout()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// File configuration (.profiler.toml)
// ============================================================================

/// Top-level configuration (from .profiler.toml)
#[derive(Debug, Default, Deserialize)]
pub struct ProfilerFileConfig {
    #[serde(default)]
    pub github: GitHubSection,
    #[serde(default)]
    pub summarizer: SummarizerSection,
    #[serde(default)]
    pub enrichment: EnrichmentSection,
    #[serde(default)]
    pub prompt: PromptSection,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub notes: NotesSection,
}

/// GitHub section
#[derive(Debug, Deserialize)]
pub struct GitHubSection {
    #[serde(default = "default_github_url")]
    pub api_url: String,
    /// Maximum repositories taken from the repo list
    #[serde(default = "default_repo_cap")]
    pub repo_cap: usize,
    /// Commits requested per repository
    #[serde(default = "default_commits_per_page")]
    pub commits_per_page: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_github_timeout")]
    pub timeout_secs: u64,
}

/// Summarization service section
#[derive(Debug, Deserialize)]
pub struct SummarizerSection {
    #[serde(default = "default_summarizer_url")]
    pub api_url: String,
    #[serde(default = "default_summarizer_model")]
    pub model: String,
    #[serde(default = "default_summarizer_timeout")]
    pub timeout_secs: u64,
}

/// Enrichment section
#[derive(Debug, Default, Deserialize)]
pub struct EnrichmentSection {
    /// Per README/commit fetch timeout; a slower fetch degrades to its default
    pub fetch_timeout_secs: Option<u64>,
    /// Ceiling on repositories enriched at once (unbounded when unset)
    pub max_concurrency: Option<usize>,
}

/// Prompt section
#[derive(Debug, Deserialize)]
pub struct PromptSection {
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,
}

/// HTTP server section
#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Notes store section
#[derive(Debug, Default, Deserialize)]
pub struct NotesSection {
    pub path: Option<PathBuf>,
}

// Default value functions
fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

fn default_repo_cap() -> usize {
    5
}

fn default_commits_per_page() -> u32 {
    50
}

fn default_user_agent() -> String {
    format!("gh-profiler/{}", env!("CARGO_PKG_VERSION"))
}

fn default_summarizer_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_summarizer_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_github_timeout() -> u64 {
    30
}

fn default_summarizer_timeout() -> u64 {
    60
}

fn default_excerpt_chars() -> usize {
    500
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for GitHubSection {
    fn default() -> Self {
        Self {
            api_url: default_github_url(),
            repo_cap: default_repo_cap(),
            commits_per_page: default_commits_per_page(),
            user_agent: default_user_agent(),
            timeout_secs: default_github_timeout(),
        }
    }
}

impl Default for SummarizerSection {
    fn default() -> Self {
        Self {
            api_url: default_summarizer_url(),
            model: default_summarizer_model(),
            timeout_secs: default_summarizer_timeout(),
        }
    }
}

impl Default for PromptSection {
    fn default() -> Self {
        Self {
            excerpt_chars: default_excerpt_chars(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ProfilerFileConfig {
    /// Load config from .profiler.toml
    ///
    /// Search order:
    /// 1. Walk up directory tree from cwd looking for .profiler.toml
    /// 2. Check ~/.config/gh-profiler/.profiler.toml (global fallback)
    /// 3. Fall back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file(CONFIG_FILE_NAME) {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProfilerFileConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// GitHub client configuration with the given token
    pub fn github_config(&self, credentials: &Credentials) -> GitHubConfig {
        let mut config = GitHubConfig::new(&self.github.api_url)
            .with_timeout(Duration::from_secs(self.github.timeout_secs));
        config.user_agent = self.github.user_agent.clone();
        if let Some(token) = &credentials.github_token {
            config = config.with_token(token);
        }
        config
    }

    /// Summarizer client configuration with the given API key
    pub fn summarizer_config(&self, credentials: &Credentials) -> SummarizerConfig {
        let mut config = SummarizerConfig::new(&self.summarizer.api_url, &self.summarizer.model)
            .with_timeout(Duration::from_secs(self.summarizer.timeout_secs));
        if let Some(key) = &credentials.gemini_api_key {
            config = config.with_api_key(key);
        }
        config
    }

    /// Tunables for the fetch/enrich/compose stages
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            repo_cap: self.github.repo_cap,
            commits_per_page: self.github.commits_per_page,
            excerpt_chars: self.prompt.excerpt_chars,
            fetch_timeout: self.enrichment.fetch_timeout_secs.map(Duration::from_secs),
            max_concurrency: self.enrichment.max_concurrency,
        }
    }

    /// Notes file location: configured path, else the platform data dir
    pub fn notes_path(&self) -> PathBuf {
        if let Some(path) = &self.notes.path {
            return path.clone();
        }

        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("notes.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: ProfilerFileConfig = toml::from_str("").unwrap();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.repo_cap, 5);
        assert_eq!(config.github.commits_per_page, 50);
        assert_eq!(config.summarizer.model, "gemini-2.0-flash");
        assert_eq!(config.prompt.excerpt_chars, 500);
        assert_eq!(config.server.port, 3000);
        assert!(config.enrichment.fetch_timeout_secs.is_none());
        assert!(config.enrichment.max_concurrency.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
            [github]
            repo_cap = 3

            [enrichment]
            fetch_timeout_secs = 10
            max_concurrency = 2

            [notes]
            path = "/tmp/notes.json"
        "#;
        let config: ProfilerFileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.github.repo_cap, 3);
        assert_eq!(config.github.commits_per_page, 50);

        let settings = config.pipeline_settings();
        assert_eq!(settings.repo_cap, 3);
        assert_eq!(settings.fetch_timeout, Some(Duration::from_secs(10)));
        assert_eq!(settings.max_concurrency, Some(2));
        assert_eq!(config.notes_path(), PathBuf::from("/tmp/notes.json"));
    }

    #[test]
    fn test_client_timeouts_from_file() {
        let config = ProfilerFileConfig::default();
        let creds = Credentials::default();
        assert_eq!(config.github_config(&creds).timeout, Duration::from_secs(30));
        assert_eq!(config.summarizer_config(&creds).timeout, Duration::from_secs(60));

        let toml = r#"
            [github]
            timeout_secs = 5
            user_agent = "custom-agent"

            [summarizer]
            timeout_secs = 90
        "#;
        let config: ProfilerFileConfig = toml::from_str(toml).unwrap();

        let github = config.github_config(&creds);
        assert_eq!(github.timeout, Duration::from_secs(5));
        assert_eq!(github.user_agent, "custom-agent");
        assert_eq!(github.api_url, "https://api.github.com");
        assert_eq!(
            config.summarizer_config(&creds).timeout,
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_credentials_flow_into_client_configs() {
        let config = ProfilerFileConfig::default();
        let creds = Credentials::new(Some("gh-token".into()), Some("  ".into()));

        let github = config.github_config(&creds);
        assert_eq!(github.token.as_deref(), Some("gh-token"));

        let summarizer = config.summarizer_config(&creds);
        assert!(summarizer.api_key.is_none(), "blank key is treated as absent");
    }

    #[test]
    fn test_credentials_debug_is_redacted() {
        let creds = Credentials::new(Some("secret-token".into()), None);
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("<redacted>"));
    }
}
