//! Summary command handlers
//!
//! `summarize`, `compare` and `profile` all run against live services.

use anyhow::{bail, Result};

use super::{public_error, CommandContext};
use gh_profiler::pipeline::ComparisonSide;

/// Handle the `summarize` command
pub async fn summarize(ctx: &CommandContext, username: &str) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let summary = pipeline
        .summarize_user(username)
        .await
        .map_err(public_error)?;

    println!("{}", summary);
    Ok(())
}

/// Handle the `compare` command - each side prints its own result
pub async fn compare(ctx: &CommandContext, first: &str, second: &str) -> Result<()> {
    if first.trim().is_empty() || second.trim().is_empty() {
        bail!("Two usernames are required");
    }

    let pipeline = ctx.pipeline()?;
    let comparison = pipeline.compare_users(first, second).await;

    print_side(&comparison.first);
    println!();
    print_side(&comparison.second);

    if comparison.first.outcome.is_err() && comparison.second.outcome.is_err() {
        bail!("Both summaries failed");
    }
    Ok(())
}

fn print_side(side: &ComparisonSide) {
    println!("=== {} ===", side.username);
    match &side.outcome {
        Ok(summary) => println!("{}", summary),
        Err(e) => println!("Error: {}", e.public_message()),
    }
}

/// Handle the `profile` command - enriched profile as pretty JSON
pub async fn profile(ctx: &CommandContext, username: &str) -> Result<()> {
    let pipeline = ctx.pipeline()?;
    let activity = pipeline.collect(username).await.map_err(public_error)?;

    if ctx.verbose >= 1 {
        let degraded = activity
            .repos
            .iter()
            .filter(|r| r.readme_degraded || r.commits_degraded)
            .count();
        eprintln!("{} repositories, {} degraded", activity.repos.len(), degraded);
    }

    println!("{}", serde_json::to_string_pretty(&activity)?);
    Ok(())
}
