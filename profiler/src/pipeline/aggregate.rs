//! Aggregation payload: the reduced view of enriched repositories that feeds
//! prompt composition. Pure, no I/O.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::enrich::EnrichedRepository;

/// Appended to README excerpts that were cut short
pub const ELLIPSIS: &str = "...";

/// Commit count for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitActivity {
    pub repo: String,
    pub commits: u32,
}

impl fmt::Display for CommitActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} commits", self.repo, self.commits)
    }
}

/// README excerpt for one repository; `None` when there is no README
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadmeExcerpt {
    pub repo: String,
    pub excerpt: Option<String>,
}

impl fmt::Display for ReadmeExcerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.excerpt {
            Some(text) => write!(f, "Repo \"{}\" README excerpt:\n{}", self.repo, text),
            None => write!(f, "Repo \"{}\" has no README available.", self.repo),
        }
    }
}

/// Request-scoped summary of a user's repositories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationPayload {
    pub total_repos: usize,
    /// Language name to number of repositories using it
    pub languages: BTreeMap<String, usize>,
    /// In enrichment order
    pub commits: Vec<CommitActivity>,
    /// In enrichment order
    pub readmes: Vec<ReadmeExcerpt>,
}

impl AggregationPayload {
    /// Reduce enriched repositories into a payload
    pub fn build(repos: &[EnrichedRepository], excerpt_chars: usize) -> Self {
        let mut languages = BTreeMap::new();
        for enriched in repos {
            *languages
                .entry(enriched.repo.language_or_unknown().to_string())
                .or_insert(0) += 1;
        }

        let commits = repos
            .iter()
            .map(|e| CommitActivity {
                repo: e.repo.name.clone(),
                commits: e.commit_count,
            })
            .collect();

        let readmes = repos
            .iter()
            .map(|e| ReadmeExcerpt {
                repo: e.repo.name.clone(),
                excerpt: (!e.readme.is_empty()).then(|| excerpt(&e.readme, excerpt_chars)),
            })
            .collect();

        Self {
            total_repos: repos.len(),
            languages,
            commits,
            readmes,
        }
    }
}

/// First `max_chars` characters of `text`, with [`ELLIPSIS`] appended when
/// anything was cut. Counts characters, not bytes.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}
