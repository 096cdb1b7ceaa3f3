//! Command-line interface for growing_tictactoe.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Growing tic-tac-toe - play N×N tic-tac-toe against a remote move service
#[derive(Parser, Debug)]
#[command(name = "growing_tictactoe")]
#[command(about = "N×N tic-tac-toe against a remote move service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client config file (defaults are used if it is missing)
    #[arg(short, long, global = true, default_value = "growing_tictactoe.toml")]
    pub config: PathBuf,

    /// Move service URL, overriding config and environment
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play in the terminal UI
    Play,

    /// Inspect a game snapshot and ask the service about it
    Probe {
        /// Snapshot string, e.g. "_ ____X____"
        #[arg(long)]
        game: String,
    },
}
