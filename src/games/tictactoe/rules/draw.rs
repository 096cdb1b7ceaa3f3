//! Full-board detection.

use super::super::{Board, Square};

/// Checks if the board is full (all squares occupied).
///
/// A full board with no winner is a draw; the controller decides which.
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::super::Mark;
    use super::super::win::check_win;
    use super::*;

    fn is_draw(board: &Board) -> bool {
        is_full(board) && check_win(board).is_none()
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new(3)));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new(3);
        board.set_move(4, Mark::X).unwrap();
        assert!(!is_full(&board));
    }

    #[test]
    fn test_draw_detection() {
        // X O X / O X X / O X O
        let mut board = Board::new(3);
        let marks = [
            Mark::X, Mark::O, Mark::X,
            Mark::O, Mark::X, Mark::X,
            Mark::O, Mark::X, Mark::O,
        ];
        for (index, mark) in marks.into_iter().enumerate() {
            board.set_move(index, mark).unwrap();
        }

        assert!(is_draw(&board));
    }

    #[test]
    fn test_not_draw_if_winner() {
        let mut board = Board::new(3);
        for index in [0, 1, 2] {
            board.set_move(index, Mark::X).unwrap();
        }
        for index in [3, 4, 5, 6, 7, 8] {
            board.set_move(index, Mark::O).unwrap();
        }

        assert!(is_full(&board));
        assert!(!is_draw(&board));
    }

    #[test]
    fn test_grown_board_is_not_full() {
        let mut board = Board::new(1);
        board.set_move(0, Mark::X).unwrap();
        assert!(is_full(&board));

        board.resize(3);
        assert!(!is_full(&board));
    }
}
