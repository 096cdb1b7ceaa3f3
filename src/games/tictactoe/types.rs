//! Core domain types for N×N tic-tac-toe.

use super::rules;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Board size every session starts with.
pub const DEFAULT_SIZE: usize = 3;

/// Mark placed by a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Mark {
    /// Player X (goes first, always the local player).
    X,
    /// Player O (the remote service).
    O,
}

/// Mark used by the person at the keyboard.
pub const LOCAL_MARK: Mark = Mark::X;

/// Mark used by the remote move service.
pub const REMOTE_MARK: Mark = Mark::O;

impl Mark {
    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Single-character form used in snapshots.
    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }

    /// Parses the single-character form.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'X' => Some(Mark::X),
            'O' => Some(Mark::O),
            _ => None,
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this square, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

/// Errors raised by the board itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Index outside `0..size²`.
    #[display("Index {index} is outside a board of {cells} cells")]
    InvalidIndex {
        /// Offending index.
        index: usize,
        /// Number of cells on the board.
        cells: usize,
    },
}

/// What a single `set_move` did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Index that was written.
    pub index: usize,
    /// Mark that was written.
    pub mark: Mark,
    /// Winning line on the board after the move, if any.
    pub won_line: Option<Vec<usize>>,
    /// Whether every square is now occupied.
    pub full: bool,
}

impl MoveOutcome {
    /// True if the board holds a winning line after this move.
    pub fn is_win(&self) -> bool {
        self.won_line.is_some()
    }
}

/// Square N×N board that can grow after a draw.
///
/// Squares are stored row-major: index `i` is column `i % size`, row `i / size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    squares: Vec<Square>,
    won_line: Option<Vec<usize>>,
    current_mark: Mark,
}

impl Board {
    /// Creates an empty `size × size` board with X to move.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            squares: vec![Square::Empty; size * size],
            won_line: None,
            current_mark: Mark::X,
        }
    }

    /// Rebuilds a board from raw parts, re-running win detection.
    pub(super) fn from_parts(size: usize, squares: Vec<Square>, current_mark: Mark) -> Self {
        let mut board = Self {
            size,
            squares,
            won_line: None,
            current_mark,
        };
        board.won_line = board.check_win();
        board
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of consecutive marks needed to win on this board.
    pub fn win_length(&self) -> usize {
        rules::win_length(self.size)
    }

    /// All squares in index order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Gets the square at `index`.
    pub fn get(&self, index: usize) -> Option<Square> {
        self.squares.get(index).copied()
    }

    /// Checks whether the square at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Square::Empty))
    }

    /// Winning line, if one has been recorded since the last resize.
    pub fn won_line(&self) -> Option<&[usize]> {
        self.won_line.as_deref()
    }

    /// Mark whose turn it is.
    pub fn current_mark(&self) -> Mark {
        self.current_mark
    }

    /// Checks if every square is occupied.
    pub fn is_full(&self) -> bool {
        rules::is_full(self)
    }

    /// Converts `(x, y)` to an index, or `None` when off the board.
    pub fn coords_to_index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then(|| x + y * self.size)
    }

    /// Converts an index to `(x, y)`, or `None` when off the board.
    pub fn index_to_coords(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.squares.len()).then(|| (index % self.size, index / self.size))
    }

    /// Grows the board to `new_size`, keeping existing marks centered.
    ///
    /// Every old square `(x, y)` moves to `(x + offset, y + offset)` with
    /// `offset = (new_size - size) / 2`. The recorded win is cleared because
    /// win length depends on size.
    #[instrument(skip(self), fields(size = self.size))]
    pub fn resize(&mut self, new_size: usize) {
        let offset = new_size.saturating_sub(self.size) / 2;
        let mut squares = vec![Square::Empty; new_size * new_size];

        for y in 0..self.size {
            for x in 0..self.size {
                let (nx, ny) = (x + offset, y + offset);
                if nx < new_size && ny < new_size {
                    squares[nx + ny * new_size] = self.squares[x + y * self.size];
                }
            }
        }

        debug!(new_size, offset, "Board resized");
        self.size = new_size;
        self.squares = squares;
        self.won_line = None;
    }

    /// Places `mark` at `index` and reports the resulting board facts.
    ///
    /// Legality (empty square, right turn, no win yet) is the caller's job;
    /// only the index range is checked here. Win detection always runs over
    /// the whole board.
    #[instrument(skip(self), fields(size = self.size))]
    pub fn set_move(&mut self, index: usize, mark: Mark) -> Result<MoveOutcome, BoardError> {
        let cells = self.squares.len();
        let square = self
            .squares
            .get_mut(index)
            .ok_or(BoardError::InvalidIndex { index, cells })?;
        *square = Square::Occupied(mark);

        if self.won_line.is_none()
            && let Some(line) = self.check_win()
        {
            debug!(?line, %mark, "Winning line found");
            self.won_line = Some(line);
        }

        self.current_mark = mark.opponent();

        Ok(MoveOutcome {
            index,
            mark,
            won_line: self.won_line.clone(),
            full: self.is_full(),
        })
    }

    /// Returns the first winning line on the board, if any.
    pub fn check_win(&self) -> Option<Vec<usize>> {
        rules::check_win(self)
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        self.squares
            .chunks(self.size.max(1))
            .map(|row| {
                row.iter()
                    .map(|square| square.mark().map_or('.', Mark::as_char).to_string())
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}
