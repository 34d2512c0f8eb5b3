//! Profile fetching: one user lookup plus one repo-list request

use crate::error::{ProfilerError, ProfilerResult};
use crate::github::{DataSource, Profile, RepositorySummary};

/// Trim a username, rejecting empty input before anything is dispatched
pub fn validate_username(username: &str) -> ProfilerResult<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ProfilerError::validation("Missing username"));
    }
    Ok(trimmed)
}

/// Fetch a profile and at most `repo_cap` repositories in source order.
///
/// Both requests are issued concurrently. A missing profile wins over
/// whatever the repo-list request returned.
pub async fn fetch_profile(
    source: &dyn DataSource,
    username: &str,
    repo_cap: usize,
) -> ProfilerResult<(Profile, Vec<RepositorySummary>)> {
    let username = validate_username(username)?;
    source.ensure_credentials()?;

    let (profile, repos) = tokio::join!(
        source.get_user(username),
        source.list_repos(username, repo_cap)
    );

    let profile = profile?;
    let mut repos = repos?;
    repos.truncate(repo_cap);

    tracing::debug!("Fetched profile {} with {} repos", profile.login, repos.len());
    Ok((profile, repos))
}
