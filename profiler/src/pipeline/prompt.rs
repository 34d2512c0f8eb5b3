//! Prompt composition
//!
//! Renders an [`AggregationPayload`] into the single prompt sent to the
//! summarization service. Output depends only on the arguments.

use super::aggregate::AggregationPayload;

/// Instruction block appended after the data sections; never truncated
pub const INSTRUCTIONS: &str = concat!(
    "Summarize and analyze this GitHub activity, covering the following points:\n",
    "1. End every point with a newline.\n",
    "2. The number of repositories, in a single point.\n",
    "3. The programming languages used, in another single point.\n",
    "4. How frequent the commits are and how active the user is, in another single point, ",
    "in no more than 100 words.\n",
    "5. A general analysis and summary, in another single point, in no more than 200 words.\n",
    "Do not output anything beyond these points."
);

const EMPTY_SECTION: &str = "- none";

/// Compose the summarization prompt for `username`
pub fn compose(username: &str, payload: &AggregationPayload) -> String {
    let languages = bullet_list(
        payload
            .languages
            .iter()
            .map(|(lang, count)| format!("{}: {} repo(s)", lang, count)),
    );

    let commits = bullet_list(payload.commits.iter().map(ToString::to_string));

    let readmes = if payload.readmes.is_empty() {
        EMPTY_SECTION.to_string()
    } else {
        payload
            .readmes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!(
        "User **{}** has **{} public repositories**.\n\n\
         Languages used:\n{}\n\n\
         Commit activity:\n{}\n\n\
         README excerpts:\n{}\n\n\
         {}\n",
        username, payload.total_repos, languages, commits, readmes, INSTRUCTIONS
    )
}

fn bullet_list(items: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = items.map(|item| format!("- {}", item)).collect();
    if lines.is_empty() {
        EMPTY_SECTION.to_string()
    } else {
        lines.join("\n")
    }
}
