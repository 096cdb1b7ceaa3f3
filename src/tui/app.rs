//! Application state and logic.

use super::input::{Action, move_cursor};
use growing_tictactoe::{GameEvent, GameStatus, SessionView};
use tracing::debug;

/// Work the UI hands to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Play the local mark at this index.
    Play(usize),
    /// Grow the drawn board.
    Continue,
    /// Start over.
    Restart,
    /// Exit.
    Quit,
}

/// Main application state.
pub struct App {
    view: SessionView,
    cursor: (usize, usize),
    cursor_size: usize,
    notice: Option<String>,
}

impl App {
    /// Creates the app for a session, cursor in the center.
    pub fn new(view: SessionView) -> Self {
        let size = view.board.size();
        Self {
            view,
            cursor: (size / 2, size / 2),
            cursor_size: size,
            notice: None,
        }
    }

    /// Latest session copy.
    pub fn view(&self) -> &SessionView {
        &self.view
    }

    /// Cursor as `(x, y)`.
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// One-off message for the player.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Applies a controller event together with a fresh session copy.
    pub fn handle_event(&mut self, event: &GameEvent, view: SessionView) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::Resized { size } => {
                let offset = size.saturating_sub(self.cursor_size) / 2;
                self.cursor = (self.cursor.0 + offset, self.cursor.1 + offset);
                self.cursor_size = *size;
            }
            GameEvent::Restarted => {
                self.cursor_size = view.board.size();
                self.cursor = (self.cursor_size / 2, self.cursor_size / 2);
                self.notice = None;
            }
            GameEvent::Turn(_) => self.notice = None,
            GameEvent::StatusChanged(_) | GameEvent::BuildProgress(_) | GameEvent::Chances(_) => {}
        }

        self.view = view;
        let last = self.view.board.size().saturating_sub(1);
        self.cursor = (self.cursor.0.min(last), self.cursor.1.min(last));
    }

    /// Turns a key action into a controller request, if it is allowed now.
    pub fn handle_action(&mut self, action: Action) -> Option<Request> {
        match action {
            Action::Cursor(key) => {
                self.cursor = move_cursor(self.cursor, self.view.board.size(), key);
                None
            }
            Action::Play => {
                if self.view.status != GameStatus::AwaitingLocalMove {
                    self.notice = Some("Not your turn".to_string());
                    return None;
                }
                let (x, y) = self.cursor;
                match self.view.board.coords_to_index(x, y) {
                    Some(index) if self.view.board.is_empty(index) => Some(Request::Play(index)),
                    _ => {
                        self.notice = Some("That square is taken".to_string());
                        None
                    }
                }
            }
            Action::Continue if self.view.status == GameStatus::Draw => Some(Request::Continue),
            Action::Continue => None,
            Action::Restart => Some(Request::Restart),
            Action::Quit => Some(Request::Quit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use growing_tictactoe::{Board, Mark};

    fn view(board: Board, status: GameStatus) -> SessionView {
        SessionView {
            board,
            status,
            build_progress: 0.0,
            chances: None,
            crash_reason: None,
        }
    }

    #[test]
    fn test_play_at_cursor() {
        let mut app = App::new(view(Board::new(3), GameStatus::AwaitingLocalMove));
        assert_eq!(app.cursor(), (1, 1));
        assert_eq!(app.handle_action(Action::Play), Some(Request::Play(4)));

        app.handle_action(Action::Cursor(KeyCode::Up));
        assert_eq!(app.handle_action(Action::Play), Some(Request::Play(1)));
    }

    #[test]
    fn test_play_refused_on_taken_square() {
        let mut board = Board::new(3);
        board.set_move(4, Mark::X).unwrap();
        board.set_move(0, Mark::O).unwrap();
        let mut app = App::new(view(board, GameStatus::AwaitingLocalMove));

        assert_eq!(app.handle_action(Action::Play), None);
        assert_eq!(app.notice(), Some("That square is taken"));
    }

    #[test]
    fn test_play_refused_while_waiting() {
        let mut app = App::new(view(Board::new(3), GameStatus::AwaitingBuild));
        assert_eq!(app.handle_action(Action::Play), None);
        assert_eq!(app.notice(), Some("Not your turn"));
    }

    #[test]
    fn test_continue_only_after_draw() {
        let mut app = App::new(view(Board::new(3), GameStatus::Won));
        assert_eq!(app.handle_action(Action::Continue), None);

        let mut app = App::new(view(Board::new(3), GameStatus::Draw));
        assert_eq!(app.handle_action(Action::Continue), Some(Request::Continue));
    }

    #[test]
    fn test_resize_keeps_cursor_on_same_square() {
        let mut app = App::new(view(Board::new(3), GameStatus::Draw));
        let mut grown = Board::new(3);
        grown.resize(5);

        app.handle_event(
            &GameEvent::Resized { size: 5 },
            view(grown, GameStatus::AwaitingLocalMove),
        );

        assert_eq!(app.cursor(), (2, 2));
        assert_eq!(app.view().board.size(), 5);
    }
}
