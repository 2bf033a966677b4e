//! Saved state CLI commands.

use clap::Subcommand;

use crate::cli::output::print_highlighted_json;
use crate::error::AlbumwallError;
use crate::state::{FileStateStore, StateStore};

/// Saved state commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum StateCommands {
    /// Print the saved album URL and position as JSON.
    Show,

    /// Rewind the saved position to the first image.
    ///
    /// The saved album URL is kept. Takes effect the next time albumwall
    /// starts.
    Reset,
}

/// Execute state subcommands.
///
/// # Errors
///
/// Returns an error if the state file cannot be read or written.
pub fn execute(cmd: &StateCommands) -> Result<(), AlbumwallError> {
    let store = FileStateStore::at_default_location();
    match cmd {
        StateCommands::Show => show_state(&store),
        StateCommands::Reset => reset_state(&store).map(drop),
    }
}

fn show_state(store: &FileStateStore) -> Result<(), AlbumwallError> {
    match store.load()? {
        Some(state) => print_highlighted_json(&serde_json::to_value(state)?),
        None => println!("No saved state at {}", store.path().display()),
    }
    Ok(())
}

/// Returns whether there was a state to reset.
fn reset_state(store: &dyn StateStore) -> Result<bool, AlbumwallError> {
    let Some(mut state) = store.load()? else {
        println!("No saved state, nothing to reset.");
        return Ok(false);
    };

    state.position = 0;
    store.persist(&state)?;
    println!("Position reset for {}", state.source_url);
    Ok(true)
}
