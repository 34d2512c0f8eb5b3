//! GitHub wire types
//!
//! Only the fields the pipeline consumes are modeled; everything else in the
//! REST payloads is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Language label used when a repository reports none
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// A user's public profile snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub public_repos: u64,
}

/// Owner of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

/// Repository metadata as returned by the repo list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub description: Option<String>,
}

impl RepositorySummary {
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: RepoOwner {
                login: owner.into(),
            },
            language: None,
            stargazers_count: 0,
            description: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Primary language, normalized to "Unknown" when missing or blank
    pub fn language_or_unknown(&self) -> &str {
        match self.language.as_deref() {
            Some(lang) if !lang.trim().is_empty() => lang,
            _ => UNKNOWN_LANGUAGE,
        }
    }
}

/// `GET /repos/{owner}/{repo}/readme` response
#[derive(Debug, Deserialize)]
pub(crate) struct ReadmeResponse {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: Option<String>,
}
