//! GitHub activity profiler: fetch a user's repositories, enrich them, and
//! summarize the result with a generative-text service

pub mod config;
pub mod error;
pub mod github;
pub mod notes;
pub mod pipeline;
pub mod summarizer;
pub mod web;

#[cfg(test)]
mod testing;
