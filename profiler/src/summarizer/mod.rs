//! Summarization service abstraction

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::error::ProfilerResult;

/// Returned when the service answers successfully but without usable text
pub const FALLBACK_SUMMARY: &str = "No summary returned";

/// Trait for generative-text backends
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Send a single prompt and get the summary text back.
    ///
    /// A response without usable text resolves to [`FALLBACK_SUMMARY`];
    /// only transport failures and non-success statuses are errors.
    async fn summarize(&self, prompt: &str) -> ProfilerResult<String>;

    /// Get the model name
    fn model(&self) -> &str;

    /// Fail with `Configuration` when the service cannot authenticate
    fn ensure_credentials(&self) -> ProfilerResult<()> {
        Ok(())
    }
}
