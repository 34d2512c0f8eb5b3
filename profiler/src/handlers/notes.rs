//! Notes command handlers

use anyhow::Result;

use super::{public_error, CommandContext};
use crate::cli::NotesCommands;

/// Dispatch a `notes` subcommand
pub async fn run_notes_command(ctx: &CommandContext, command: NotesCommands) -> Result<()> {
    let store = ctx.note_store();

    match command {
        NotesCommands::Add { note } => {
            store.append(&note).await.map_err(public_error)?;
            println!("Saved note to {}", store.path().display());
        }
        NotesCommands::List => {
            let notes = store.list().await.map_err(public_error)?;
            if notes.is_empty() {
                println!("No notes yet.");
            }
            for (i, note) in notes.iter().enumerate() {
                println!("{:>3}. {}", i + 1, note);
            }
        }
    }

    Ok(())
}
