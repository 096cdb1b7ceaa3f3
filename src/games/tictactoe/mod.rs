//! N×N tic-tac-toe that grows after a draw.

mod action;
pub mod rules;
mod snapshot;
mod types;

pub use action::{Move, MoveError};
pub use snapshot::SnapshotError;
pub use types::{
    Board, BoardError, DEFAULT_SIZE, LOCAL_MARK, Mark, MoveOutcome, REMOTE_MARK, Square,
};
