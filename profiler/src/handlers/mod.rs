//! Command handlers module
//!
//! Handler functions for CLI commands. CommandContext holds the resolved
//! configuration and builds clients on demand.

use std::sync::Arc;

use anyhow::Result;

use gh_profiler::config::{Credentials, ProfilerFileConfig};
use gh_profiler::error::ProfilerError;
use gh_profiler::github::GitHubClient;
use gh_profiler::notes::NoteStore;
use gh_profiler::pipeline::Pipeline;
use gh_profiler::summarizer::GeminiClient;

pub mod notes;
pub mod serve;
pub mod summary;

pub use notes::run_notes_command;
pub use serve::run_serve;
pub use summary::{compare, profile, summarize};

/// Shared context for command handlers.
///
/// Clients are only built when a command needs them, so `notes` works
/// without any credentials.
pub struct CommandContext {
    pub verbose: u8,
    pub file_config: ProfilerFileConfig,
    pub credentials: Credentials,
}

impl CommandContext {
    pub fn new(file_config: ProfilerFileConfig, credentials: Credentials, verbose: u8) -> Self {
        Self {
            verbose,
            file_config,
            credentials,
        }
    }

    /// GitHub client from the file config and credentials
    pub fn github_client(&self) -> Result<GitHubClient> {
        Ok(GitHubClient::new(
            self.file_config.github_config(&self.credentials),
        )?)
    }

    /// Summarization client from the file config and credentials
    pub fn summarizer_client(&self) -> Result<GeminiClient> {
        Ok(GeminiClient::new(
            self.file_config.summarizer_config(&self.credentials),
        )?)
    }

    /// Build the full pipeline
    pub fn pipeline(&self) -> Result<Pipeline> {
        Ok(self.assemble(self.github_client()?, self.summarizer_client()?))
    }

    /// Wire already-built clients into a pipeline
    pub fn assemble(&self, github: GitHubClient, summarizer: GeminiClient) -> Pipeline {
        Pipeline::new(
            Arc::new(github),
            Arc::new(summarizer),
            self.file_config.pipeline_settings(),
        )
    }

    /// Notes store at the configured location
    pub fn note_store(&self) -> NoteStore {
        NoteStore::new(self.file_config.notes_path())
    }
}

/// Log the full error and hand back only its public message
pub(crate) fn public_error(err: ProfilerError) -> anyhow::Error {
    if err.is_client_error() {
        tracing::debug!("Command rejected: {}", err);
    } else {
        tracing::error!("Command failed: {}", err);
    }
    anyhow::anyhow!(err.public_message())
}
