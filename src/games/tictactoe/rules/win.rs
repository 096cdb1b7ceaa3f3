//! Win detection for boards of any size.

use super::super::{Board, Square};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{instrument, trace};

type LineCache = Mutex<HashMap<(usize, usize), Arc<[Vec<usize>]>>>;

static WIN_LINES: OnceLock<LineCache> = OnceLock::new();

/// Number of consecutive marks needed to win on a `size × size` board.
///
/// Boards up to 4×4 need a full row; larger boards need one less than the
/// side length so a grown board stays winnable.
pub fn win_length(size: usize) -> usize {
    if size <= 4 { size } else { size - 1 }
}

/// Every line of `len` cells on a `size × size` board, in evaluation order.
///
/// Order: verticals (by start row, then column), horizontals (by start
/// column, then row), then for each `(x, y)` offset the down-right diagonal
/// followed by the down-left diagonal. Results are cached per
/// `(size, len)`.
#[instrument]
pub fn win_lines(size: usize, len: usize) -> Arc<[Vec<usize>]> {
    let cache = WIN_LINES.get_or_init(Default::default);
    let mut cache = cache.lock().unwrap_or_else(PoisonError::into_inner);

    cache
        .entry((size, len))
        .or_insert_with(|| {
            let lines = enumerate_lines(size, len);
            trace!(count = lines.len(), "Enumerated win lines");
            lines.into()
        })
        .clone()
}

fn enumerate_lines(size: usize, len: usize) -> Vec<Vec<usize>> {
    if len == 0 || len > size {
        return Vec::new();
    }

    let slack = size - len;
    let mut lines = Vec::new();

    // Vertical
    for y_offset in 0..=slack {
        for x in 0..size {
            lines.push((0..len).map(|i| x + (y_offset + i) * size).collect());
        }
    }

    // Horizontal
    for x_offset in 0..=slack {
        for y in 0..size {
            lines.push((0..len).map(|i| (x_offset + i) + y * size).collect());
        }
    }

    // Diagonal
    for x_offset in 0..=slack {
        for y_offset in 0..=slack {
            lines.push(
                (0..len)
                    .map(|i| (x_offset + i) + (y_offset + i) * size)
                    .collect(),
            );
            lines.push(
                (0..len)
                    .map(|i| (x_offset + len - 1 - i) + (y_offset + i) * size)
                    .collect(),
            );
        }
    }

    lines
}

/// Returns the first line whose cells all hold the same mark.
#[instrument(skip(board), fields(size = board.size()))]
pub fn check_win(board: &Board) -> Option<Vec<usize>> {
    let squares = board.squares();

    win_lines(board.size(), board.win_length())
        .iter()
        .find(|line| {
            let first = squares[line[0]];
            first != Square::Empty && line.iter().all(|&i| squares[i] == first)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::super::super::Mark;
    use super::*;

    fn board_with(size: usize, mark: Mark, indices: &[usize]) -> Board {
        let mut board = Board::new(size);
        for &index in indices {
            board.set_move(index, mark).unwrap();
        }
        board
    }

    #[test]
    fn test_win_length_by_size() {
        for size in 1..=4 {
            assert_eq!(win_length(size), size);
        }
        for size in 5..=15 {
            assert_eq!(win_length(size), size - 1);
        }
    }

    #[test]
    fn test_line_counts() {
        // 3 columns + 3 rows + 2 diagonals
        assert_eq!(win_lines(3, 3).len(), 8);
        // 5 columns × 2 + 5 rows × 2 + 4 offsets × 2 diagonals
        assert_eq!(win_lines(5, 4).len(), 28);
        // 7×7, len 6: 14 + 14 + 8
        assert_eq!(win_lines(7, 6).len(), 36);
    }

    #[test]
    fn test_lines_have_win_length_and_stay_in_bounds() {
        for size in 1..=9 {
            let len = win_length(size);
            for line in win_lines(size, len).iter() {
                assert_eq!(line.len(), len);
                assert!(line.iter().all(|&i| i < size * size));
            }
        }
    }

    #[test]
    fn test_line_order_is_stable() {
        let lines = win_lines(3, 3);
        assert_eq!(lines[0], vec![0, 3, 6]);
        assert_eq!(lines[3], vec![0, 1, 2]);
        assert_eq!(lines[6], vec![0, 4, 8]);
        assert_eq!(lines[7], vec![2, 4, 6]);
        assert_eq!(&*win_lines(3, 3), enumerate_lines(3, 3).as_slice());
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_win(&Board::new(3)), None);
        assert_eq!(check_win(&Board::new(7)), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(3, Mark::X, &[0, 1, 2]);
        assert_eq!(check_win(&board), Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_with(3, Mark::O, &[2, 4, 6]);
        assert_eq!(check_win(&board), Some(vec![2, 4, 6]));
    }

    #[test]
    fn test_offset_row_on_five_by_five() {
        let board = board_with(5, Mark::O, &[6, 7, 8, 9]);
        assert_eq!(check_win(&board), Some(vec![6, 7, 8, 9]));
    }

    #[test]
    fn test_offset_column_on_five_by_five() {
        // Column 3, rows 1..=4
        let board = board_with(5, Mark::X, &[8, 13, 18, 23]);
        assert_eq!(check_win(&board), Some(vec![8, 13, 18, 23]));
    }

    #[test]
    fn test_offset_diagonals_on_five_by_five() {
        let board = board_with(5, Mark::X, &[6, 12, 18, 24]);
        assert_eq!(check_win(&board), Some(vec![6, 12, 18, 24]));

        let board = board_with(5, Mark::O, &[9, 13, 17, 21]);
        assert_eq!(check_win(&board), Some(vec![9, 13, 17, 21]));
    }

    #[test]
    fn test_mixed_marks_do_not_win() {
        let mut board = Board::new(5);
        for index in [5, 6, 7] {
            board.set_move(index, Mark::X).unwrap();
        }
        board.set_move(8, Mark::O).unwrap();
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_incomplete_run() {
        let board = board_with(5, Mark::X, &[0, 1, 2]);
        assert_eq!(check_win(&board), None);
    }

    #[test]
    fn test_first_line_in_order_wins() {
        // Both column 0 and row 0 are complete; verticals come first.
        let board = board_with(3, Mark::X, &[0, 1, 2, 3, 6]);
        assert_eq!(check_win(&board), Some(vec![0, 3, 6]));
    }
}
