//! Shared application state

use std::sync::Arc;

use crate::notes::NoteStore;
use crate::pipeline::Pipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Fetch-to-summary pipeline
    pub pipeline: Arc<Pipeline>,
    /// Personal notes store
    pub notes: NoteStore,
    /// Whether a GitHub token was configured at startup
    pub github_token: bool,
    /// Whether a summarizer API key was configured at startup
    pub summarizer_key: bool,
}

impl AppState {
    /// Create new app state
    pub fn new(pipeline: Pipeline, notes: NoteStore) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            notes,
            github_token: false,
            summarizer_key: false,
        }
    }

    /// Record which credentials are present, for the health endpoint
    pub fn with_credentials(mut self, github_token: bool, summarizer_key: bool) -> Self {
        self.github_token = github_token;
        self.summarizer_key = summarizer_key;
        self
    }
}
