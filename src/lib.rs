//! Growing tic-tac-toe - an N×N game against a remote move service.
//!
//! The board grows by two after a draw so play can continue; boards larger
//! than 4×4 need one mark fewer than the side length to win.
//!
//! # Architecture
//!
//! - **Games**: board model, win detection and snapshot strings
//! - **Client**: the [`MoveService`] trait and its REST implementation
//! - **Controller**: the session state machine driving the service protocol
//! - **Config**: TOML client settings
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use growing_tictactoe::{ClientConfig, GameController, RestMoveService};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::default();
//! let service = RestMoveService::new(config.server_url().clone(), config.request_timeout())?;
//! let controller = GameController::new(Arc::new(service), config.poll_interval());
//!
//! let status = controller.play(4).await?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod controller;
mod games;

// Crate-level exports - Move service client
pub use client::{
    BuildStatus, ChancePercentages, Chances, Envelope, MoveService, NextMove, RestMoveService,
    ServiceError,
};

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, SERVER_URL_ENV};

// Crate-level exports - Session control
pub use controller::{
    ControllerError, DEFAULT_POLL_INTERVAL, GameController, GameEvent, GameStatus,
    ProtocolViolation, SessionView,
};

// Crate-level exports - Game types
pub use games::tictactoe::{
    Board, BoardError, DEFAULT_SIZE, LOCAL_MARK, Mark, Move, MoveError, MoveOutcome, REMOTE_MARK,
    SnapshotError, Square, rules,
};
