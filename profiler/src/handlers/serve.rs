//! Serve command handler
//!
//! Start the HTTP API.

use anyhow::Result;

use super::CommandContext;
use gh_profiler::web::{self, AppState, WebConfig};

/// Handle the `serve` command
pub async fn run_serve(
    ctx: &CommandContext,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let config = WebConfig {
        host: host.unwrap_or_else(|| ctx.file_config.server.host.clone()),
        port: port.unwrap_or(ctx.file_config.server.port),
    };

    let github = ctx.github_client()?;
    let summarizer = ctx.summarizer_client()?;
    let github_token = github.has_token();
    let summarizer_key = summarizer.has_api_key();
    if !github_token {
        tracing::warn!("GITHUB_TOKEN is not set; GitHub requests will fail");
    }
    if !summarizer_key {
        tracing::warn!("GEMINI_API_KEY is not set; summaries will fail");
    }

    let state = AppState::new(ctx.assemble(github, summarizer), ctx.note_store())
        .with_credentials(github_token, summarizer_key);

    web::serve(config, state).await
}
