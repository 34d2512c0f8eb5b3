use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gh_profiler::config::{Credentials, ProfilerFileConfig};

mod cli;
mod handlers;

use cli::{Cli, Commands};
use handlers::CommandContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    let file_config = match &cli.config {
        Some(path) => ProfilerFileConfig::load_from_path(path)?,
        None => ProfilerFileConfig::load()?,
    };
    let credentials = Credentials::new(cli.github_token, cli.gemini_api_key);
    let ctx = CommandContext::new(file_config, credentials, cli.verbose);

    match cli.command {
        Commands::Summarize { username } => handlers::summarize(&ctx, &username).await,
        Commands::Compare { first, second } => handlers::compare(&ctx, &first, &second).await,
        Commands::Profile { username } => handlers::profile(&ctx, &username).await,
        Commands::Serve { host, port } => handlers::run_serve(&ctx, host, port).await,
        Commands::Notes { command } => handlers::run_notes_command(&ctx, command).await,
    }
}

/// RUST_LOG wins when set; otherwise -v picks the level. Logs go to stderr.
fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
