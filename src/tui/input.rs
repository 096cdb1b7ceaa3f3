//! Keyboard handling.

use crossterm::event::KeyCode;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor.
    Cursor(KeyCode),
    /// Play at the cursor.
    Play,
    /// Grow a drawn board and keep playing.
    Continue,
    /// Discard the session.
    Restart,
    /// Leave the program.
    Quit,
}

/// Maps a key to an action.
pub fn action_for_key(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => Some(Action::Cursor(key)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Play),
        KeyCode::Char('c') => Some(Action::Continue),
        KeyCode::Char('r') => Some(Action::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        _ => None,
    }
}

/// Moves the `(x, y)` cursor on a `size × size` board, stopping at edges.
pub fn move_cursor((x, y): (usize, usize), size: usize, key: KeyCode) -> (usize, usize) {
    let last = size.saturating_sub(1);
    match key {
        KeyCode::Right => ((x + 1).min(last), y),
        KeyCode::Left => (x.saturating_sub(1), y),
        KeyCode::Down => (x, (y + 1).min(last)),
        KeyCode::Up => (x, y.saturating_sub(1)),
        _ => (x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_within_board() {
        assert_eq!(move_cursor((1, 1), 3, KeyCode::Right), (2, 1));
        assert_eq!(move_cursor((1, 1), 3, KeyCode::Up), (1, 0));
        assert_eq!(move_cursor((1, 1), 5, KeyCode::Down), (1, 2));
    }

    #[test]
    fn test_cursor_stops_at_edges() {
        assert_eq!(move_cursor((2, 2), 3, KeyCode::Right), (2, 2));
        assert_eq!(move_cursor((0, 0), 3, KeyCode::Left), (0, 0));
        assert_eq!(move_cursor((0, 0), 3, KeyCode::Up), (0, 0));
        assert_eq!(move_cursor((4, 4), 5, KeyCode::Down), (4, 4));
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(action_for_key(KeyCode::Enter), Some(Action::Play));
        assert_eq!(action_for_key(KeyCode::Char(' ')), Some(Action::Play));
        assert_eq!(action_for_key(KeyCode::Char('c')), Some(Action::Continue));
        assert_eq!(action_for_key(KeyCode::Char('q')), Some(Action::Quit));
        assert_eq!(action_for_key(KeyCode::Char('x')), None);
    }
}
