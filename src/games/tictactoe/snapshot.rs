//! Game snapshot strings used as query keys by the move service.
//!
//! Format: `"<wonIndex> <cells>"` where `wonIndex` is the first index of the
//! winning line (decimal) or `_`, and `cells` holds one character per square
//! in index order: `X`, `O` or `_` for empty.

use super::types::{Board, Mark, Square};
use derive_more::{Display, Error};
use tracing::instrument;

const EMPTY: char = '_';

/// Malformed snapshot string.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid snapshot {snapshot:?}: {reason}")]
pub struct SnapshotError {
    /// The rejected input.
    pub snapshot: String,
    /// What was wrong with it.
    pub reason: String,
}

impl SnapshotError {
    fn new(snapshot: &str, reason: impl Into<String>) -> Self {
        Self {
            snapshot: snapshot.to_string(),
            reason: reason.into(),
        }
    }
}

impl Board {
    /// Serializes the board into the service's query key.
    pub fn snapshot(&self) -> String {
        let won = self.won_marker();
        let cells: String = self
            .squares()
            .iter()
            .map(|square| square.mark().map_or(EMPTY, Mark::as_char))
            .collect();

        format!("{won} {cells}")
    }

    fn won_marker(&self) -> String {
        self.won_line()
            .and_then(|line| line.first())
            .map_or_else(|| EMPTY.to_string(), ToString::to_string)
    }

    /// Parses a snapshot back into a board.
    ///
    /// The side length comes from the cell count, the mark to move from the
    /// mark counts (X moves when it has not placed more marks than O), and
    /// the winning line is re-detected from the cells. The win marker must
    /// agree with the detected line.
    #[instrument]
    pub fn from_snapshot(snapshot: &str) -> Result<Self, SnapshotError> {
        let (won, cells) = snapshot
            .split_once(' ')
            .ok_or_else(|| SnapshotError::new(snapshot, "missing separator"))?;

        let squares = cells
            .chars()
            .map(|c| match c {
                EMPTY => Ok(Square::Empty),
                c => Mark::from_char(c)
                    .map(Square::Occupied)
                    .ok_or_else(|| SnapshotError::new(snapshot, format!("unknown cell {c:?}"))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let size = squares.len().isqrt();
        if size == 0 || size * size != squares.len() {
            return Err(SnapshotError::new(snapshot, "cell count is not a square"));
        }

        let count = |mark| squares.iter().filter(|s| s.mark() == Some(mark)).count();
        let current_mark = if count(Mark::X) <= count(Mark::O) {
            Mark::X
        } else {
            Mark::O
        };

        let board = Board::from_parts(size, squares, current_mark);
        if won != board.won_marker() {
            return Err(SnapshotError::new(
                snapshot,
                format!("win marker {won:?} does not match the board"),
            ));
        }

        Ok(board)
    }
}
