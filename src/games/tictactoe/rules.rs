//! Game rules for N×N tic-tac-toe.
//!
//! Pure functions evaluating a board. Rules are kept apart from board
//! storage so the controller and the board share one definition of
//! "won" and "full".

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{check_win, win_length, win_lines};
