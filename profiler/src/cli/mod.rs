//! CLI module
//!
//! Argument definitions for the `profiler` binary.

pub mod args;

pub use args::{Cli, Commands, NotesCommands};
