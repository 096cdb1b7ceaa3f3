//! First-class move types.
//!
//! Moves are domain events, not side effects: a move names who plays where
//! and can be validated against a board before it is applied.

use super::types::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A mark placed at a board index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The mark being placed.
    pub mark: Mark,
    /// Board index of the target square.
    pub index: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, index: usize) -> Self {
        Self { mark, index }
    }

    /// Checks this move against the board's turn and occupancy rules.
    #[instrument(skip(board))]
    pub fn validate(&self, board: &Board) -> Result<(), MoveError> {
        if board.won_line().is_some() {
            return Err(MoveError::GameOver);
        }
        if self.mark != board.current_mark() {
            return Err(MoveError::WrongPlayer(self.mark));
        }
        match board.get(self.index) {
            None => Err(MoveError::InvalidIndex(self.index)),
            Some(square) if square.mark().is_some() => Err(MoveError::SquareOccupied(self.index)),
            Some(_) => Ok(()),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.index)
    }
}

/// Why a local move was refused.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The square is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(usize),

    /// The index is outside the board.
    #[display("Square {} is not on the board", _0)]
    InvalidIndex(usize),

    /// A line has already been won.
    #[display("Game is already over")]
    GameOver,

    /// It is not this mark's turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Mark),

    /// The session is not waiting for a local move right now.
    #[display("Not accepting moves while {}", _0)]
    NotAccepting(String),
}

impl std::error::Error for MoveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_move() {
        let board = Board::new(3);
        assert_eq!(Move::new(Mark::X, 4).validate(&board), Ok(()));
    }

    #[test]
    fn test_wrong_player() {
        let board = Board::new(3);
        assert_eq!(
            Move::new(Mark::O, 4).validate(&board),
            Err(MoveError::WrongPlayer(Mark::O))
        );
    }

    #[test]
    fn test_occupied_square() {
        let mut board = Board::new(3);
        board.set_move(4, Mark::X).unwrap();
        board.set_move(0, Mark::O).unwrap();
        assert_eq!(
            Move::new(Mark::X, 4).validate(&board),
            Err(MoveError::SquareOccupied(4))
        );
    }

    #[test]
    fn test_out_of_range() {
        let board = Board::new(3);
        assert_eq!(
            Move::new(Mark::X, 9).validate(&board),
            Err(MoveError::InvalidIndex(9))
        );
    }

    #[test]
    fn test_no_moves_after_win() {
        let mut board = Board::new(3);
        for index in [0, 1, 2] {
            board.set_move(index, Mark::O).unwrap();
        }
        assert_eq!(
            Move::new(Mark::X, 5).validate(&board),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Move::new(Mark::O, 7).to_string(), "O -> 7");
    }
}
