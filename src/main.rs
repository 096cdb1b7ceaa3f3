//! Growing tic-tac-toe - terminal client
//!
//! Plays N×N tic-tac-toe against a remote move service.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use growing_tictactoe::{Board, ClientConfig, MoveService, RestMoveService};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => run_tui(config).await,
        Command::Probe { game } => run_probe(config, game).await,
    }
}

/// Config file, then environment, then command line.
fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let config = ClientConfig::load_or_default(&cli.config)?.with_env_overrides();
    Ok(match &cli.server_url {
        Some(url) => config.with_server_url(url.clone()),
        None => config,
    })
}

/// Run the terminal UI
async fn run_tui(config: ClientConfig) -> Result<()> {
    let service = RestMoveService::new(config.server_url().clone(), config.request_timeout())?;
    tui::run_tui(Arc::new(service), config.poll_interval()).await
}

/// Print what the service knows about a snapshot
#[instrument(skip(config))]
async fn run_probe(config: ClientConfig, game: String) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let board = Board::from_snapshot(&game).context("Could not parse snapshot")?;
    info!(server_url = %config.server_url(), "Probing move service");

    println!("{}", board.display());
    println!();
    println!("Size: {}x{} (win length {})", board.size(), board.size(), board.win_length());
    println!("To move: {}", board.current_mark());
    if let Some(line) = board.won_line() {
        println!("Won line: {:?}", line);
    }

    let service = RestMoveService::new(config.server_url().clone(), config.request_timeout())?;
    let status = service.build_status(&game).await?;
    println!("Build progress: {:.0}%", status.progress);

    if status.is_ready() {
        match service.chances(&game).await {
            Ok(chances) => println!("Chances: {}", chances.percentages()),
            Err(e) => warn!(error = %e, "Chances unavailable"),
        }
    }

    Ok(())
}
