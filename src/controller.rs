//! Turn-by-turn game controller driving the remote move protocol.
//!
//! The controller owns the board and the session status. Local moves are
//! applied directly; the reply is obtained from a [`MoveService`] by
//! checking the build status of the current snapshot, triggering and polling
//! a build when needed, and then fetching the next move.
//!
//! Every status transition bumps an epoch. An async step remembers the epoch
//! it was launched under and, after each suspension, drops its result if the
//! epoch has moved on. That check is the only cancellation mechanism: a late
//! poll or a reply for a restarted session never touches the board.

use crate::client::{ChancePercentages, MoveService, NextMove, ServiceError};
use crate::games::tictactoe::{
    Board, BoardError, DEFAULT_SIZE, LOCAL_MARK, Move, MoveError, MoveOutcome, REMOTE_MARK,
};
use derive_more::{Display, Error, From};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Default wait between build status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Board growth applied by [`GameController::continue_game`].
const GROWTH: usize = 2;

/// Status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum GameStatus {
    /// Waiting for the service to finish building its move map.
    AwaitingBuild,
    /// Waiting for the local player.
    AwaitingLocalMove,
    /// Waiting for the service's move.
    AwaitingRemoteMove,
    /// Local player completed a line.
    Won,
    /// Service completed a line.
    Lost,
    /// Board filled without a line.
    Draw,
    /// Unrecoverable failure; only a restart helps.
    Crashed,
}

impl GameStatus {
    /// True for states no move can leave.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Won | GameStatus::Lost | GameStatus::Draw | GameStatus::Crashed
        )
    }
}

/// The service answered with a move that cannot be played.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Protocol violation: {message}")]
pub struct ProtocolViolation {
    /// What was wrong with the answer.
    pub message: String,
}

/// Failures that crash a session.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ControllerError {
    /// Board contract violation.
    #[display("{_0}")]
    Board(BoardError),
    /// Network failure talking to the move service.
    #[display("{_0}")]
    Service(ServiceError),
    /// The move service broke the protocol.
    #[display("{_0}")]
    Protocol(ProtocolViolation),
}

/// Notifications for observers such as the terminal UI.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A mark was placed.
    Turn(MoveOutcome),
    /// The board grew; every cell should be redrawn.
    Resized {
        /// New side length.
        size: usize,
    },
    /// The session entered a new status.
    StatusChanged(GameStatus),
    /// Build progress reported while waiting for a build.
    BuildProgress(f64),
    /// Fresh outcome chances for the local player.
    Chances(ChancePercentages),
    /// The session was discarded and a new one started.
    Restarted,
}

/// Read-only copy of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// Board state.
    pub board: Board,
    /// Current status.
    pub status: GameStatus,
    /// Last reported build progress.
    pub build_progress: f64,
    /// Last fetched chances.
    pub chances: Option<ChancePercentages>,
    /// Cause of the crash, when crashed.
    pub crash_reason: Option<String>,
}

impl SessionView {
    /// Human-readable status line.
    pub fn status_line(&self) -> String {
        match self.status {
            GameStatus::AwaitingBuild => {
                format!("Building the map... ({:.0}%)", self.build_progress)
            }
            GameStatus::AwaitingLocalMove => "Waiting for your move...".to_string(),
            GameStatus::AwaitingRemoteMove => "Thinking...".to_string(),
            GameStatus::Won => "You won, but you are a cheater!".to_string(),
            GameStatus::Lost => "You lost.".to_string(),
            GameStatus::Draw => "Let's call it a draw.".to_string(),
            GameStatus::Crashed => "The server crashed. Please restart.".to_string(),
        }
    }
}

#[derive(Debug)]
struct SessionState {
    board: Board,
    status: GameStatus,
    epoch: u64,
    generation: u64,
    build_progress: f64,
    chances: Option<ChancePercentages>,
    crash_reason: Option<String>,
}

impl SessionState {
    fn new(epoch: u64, generation: u64) -> Self {
        Self {
            board: Board::new(DEFAULT_SIZE),
            status: GameStatus::AwaitingLocalMove,
            epoch,
            generation,
            build_progress: 0.0,
            chances: None,
            crash_reason: None,
        }
    }
}

/// Epoch an async step was launched under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket(u64);

/// Handle to one game session.
///
/// Clones share the same session, so a UI can hand a clone to a spawned
/// task while keeping one for reading state.
#[derive(Clone)]
pub struct GameController {
    service: Arc<dyn MoveService>,
    state: Arc<Mutex<SessionState>>,
    events: Option<mpsc::UnboundedSender<GameEvent>>,
    poll_interval: Duration,
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("state", &self.state)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl GameController {
    /// Creates a controller with a fresh 3×3 session.
    pub fn new(service: Arc<dyn MoveService>, poll_interval: Duration) -> Self {
        Self {
            service,
            state: Arc::new(Mutex::new(SessionState::new(0, 0))),
            events: None,
            poll_interval,
        }
    }

    /// Publishes [`GameEvent`]s on `events`.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<GameEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Wait between build status polls.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Copy of the session for rendering.
    pub fn view(&self) -> SessionView {
        let state = self.lock();
        SessionView {
            board: state.board.clone(),
            status: state.status,
            build_progress: state.build_progress,
            chances: state.chances,
            crash_reason: state.crash_reason.clone(),
        }
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.lock().status
    }

    /// Copy of the board.
    pub fn board(&self) -> Board {
        self.lock().board.clone()
    }

    /// Plays the local mark at `index`, then runs the service's reply.
    ///
    /// Returns the status once the session is stable again. Illegal moves
    /// are refused without changing anything; service failures crash the
    /// session instead of being returned.
    #[instrument(skip(self))]
    pub async fn play(&self, index: usize) -> Result<GameStatus, MoveError> {
        let ticket = {
            let mut state = self.lock();
            if state.status != GameStatus::AwaitingLocalMove {
                return Err(MoveError::NotAccepting(state.status.to_string()));
            }
            Move::new(LOCAL_MARK, index).validate(&state.board)?;

            let outcome = state
                .board
                .set_move(index, LOCAL_MARK)
                .map_err(|_| MoveError::InvalidIndex(index))?;
            info!(index, "Local move applied");
            self.emit(GameEvent::Turn(outcome.clone()));

            match self.settle(&mut state, &outcome, GameStatus::Won) {
                Some(status) => return Ok(status),
                None => self.enter(&mut state, GameStatus::AwaitingRemoteMove),
            }
        };

        self.remote_turn(ticket).await;
        Ok(self.status())
    }

    /// Grows a drawn board by two and resumes play.
    ///
    /// If the service is to move on the grown board its reply is fetched
    /// before returning.
    #[instrument(skip(self))]
    pub async fn continue_game(&self) -> Result<GameStatus, MoveError> {
        let ticket = {
            let mut state = self.lock();
            if state.status != GameStatus::Draw {
                return Err(MoveError::NotAccepting(state.status.to_string()));
            }

            let size = state.board.size() + GROWTH;
            state.board.resize(size);
            info!(size, "Continuing on a larger board");
            self.emit(GameEvent::Resized { size });

            if state.board.current_mark() == REMOTE_MARK {
                self.enter(&mut state, GameStatus::AwaitingRemoteMove)
            } else {
                return Ok(self.enter_status(&mut state, GameStatus::AwaitingLocalMove));
            }
        };

        self.remote_turn(ticket).await;
        Ok(self.status())
    }

    /// Discards the session and starts a new 3×3 game.
    ///
    /// Any request still in flight for the old session is ignored when it
    /// returns.
    #[instrument(skip(self))]
    pub fn restart(&self) {
        let mut state = self.lock();
        let epoch = state.epoch + 1;
        let generation = state.generation + 1;
        *state = SessionState::new(epoch, generation);
        info!(generation, "Session restarted");
        self.emit(GameEvent::Restarted);
        self.emit(GameEvent::StatusChanged(state.status));
    }

    /// Fetches and publishes outcome chances for the current board.
    ///
    /// A failure crashes the session. An answer or failure arriving after
    /// the board changed, the session crashed or the session was restarted
    /// is dropped.
    #[instrument(skip(self))]
    pub async fn refresh_chances(&self) {
        let (generation, game) = {
            let state = self.lock();
            (state.generation, state.board.snapshot())
        };

        let result = self.service.chances(&game).await;

        let mut state = self.lock();
        // Within a generation a board never returns to an earlier snapshot.
        if state.generation != generation
            || state.status == GameStatus::Crashed
            || state.board.snapshot() != game
        {
            debug!(game, ok = result.is_ok(), "Discarding chances for an outdated board");
            return;
        }
        match result {
            Ok(chances) => {
                let percentages = chances.percentages();
                debug!(%percentages, "Chances updated");
                state.chances = Some(percentages);
                self.emit(GameEvent::Chances(percentages));
            }
            Err(err) => self.crash(&mut state, err.into()),
        }
    }

    /// Runs the service's turn, crashing the session on failure.
    async fn remote_turn(&self, ticket: Ticket) {
        let game = self.lock().board.snapshot();
        if self.fetch_reply(ticket, &game).await.is_some() {
            self.refresh_chances().await;
        }
    }

    /// Status check, optional build and polling, then the move itself.
    ///
    /// Returns `None` if the step was discarded or crashed the session.
    #[instrument(skip(self, ticket))]
    async fn fetch_reply(&self, ticket: Ticket, game: &str) -> Option<()> {
        let status = self.request(ticket, self.service.build_status(game)).await?;

        let ticket = if status.is_ready() {
            ticket
        } else {
            if status.is_unbuilt() {
                info!("Requesting map build");
                self.request(ticket, self.service.build(game)).await?;
            }
            self.wait_for_build(ticket, game).await?
        };

        let next = self.request(ticket, self.service.next_move(game)).await?;
        self.apply_reply(ticket, next)
    }

    /// Polls build status once per interval until the map is ready.
    async fn wait_for_build(&self, ticket: Ticket, game: &str) -> Option<Ticket> {
        let ticket = {
            let mut state = self.resume(ticket)?;
            self.enter(&mut state, GameStatus::AwaitingBuild)
        };

        loop {
            let status = self.request(ticket, self.service.build_status(game)).await?;

            {
                let mut state = self.resume(ticket)?;
                if status.is_ready() {
                    debug!("Map ready");
                    return Some(self.enter(&mut state, GameStatus::AwaitingRemoteMove));
                }
                state.build_progress = status.progress;
                debug!(progress = status.progress, "Map still building");
                self.emit(GameEvent::BuildProgress(status.progress));
            }

            tokio::time::sleep(self.poll_interval).await;
            drop(self.resume(ticket)?);
        }
    }

    /// Validates and plays the service's move.
    fn apply_reply(&self, ticket: Ticket, next: NextMove) -> Option<()> {
        let mut state = self.resume(ticket)?;

        let index = usize::try_from(next.x)
            .ok()
            .zip(usize::try_from(next.y).ok())
            .and_then(|(x, y)| state.board.coords_to_index(x, y));
        let Some(index) = index else {
            let message = format!("move ({}, {}) is off the board", next.x, next.y);
            self.crash(&mut state, ProtocolViolation { message }.into());
            return None;
        };
        if !state.board.is_empty(index) {
            let message = format!("move ({}, {}) targets an occupied square", next.x, next.y);
            self.crash(&mut state, ProtocolViolation { message }.into());
            return None;
        }

        let outcome = match state.board.set_move(index, REMOTE_MARK) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.crash(&mut state, err.into());
                return None;
            }
        };
        info!(index, x = next.x, y = next.y, "Remote move applied");
        self.emit(GameEvent::Turn(outcome.clone()));

        if self.settle(&mut state, &outcome, GameStatus::Lost).is_none() {
            self.enter(&mut state, GameStatus::AwaitingLocalMove);
        }
        Some(())
    }

    /// Awaits `call` and hands back its value if the step is still current.
    async fn request<T>(
        &self,
        ticket: Ticket,
        call: impl Future<Output = Result<T, ServiceError>>,
    ) -> Option<T> {
        let result = call.await;
        let mut state = self.resume(ticket)?;
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.crash(&mut state, err.into());
                None
            }
        }
    }

    /// Moves to `on_win` or `Draw` if the move ended the game.
    fn settle(
        &self,
        state: &mut SessionState,
        outcome: &MoveOutcome,
        on_win: GameStatus,
    ) -> Option<GameStatus> {
        let status = if outcome.is_win() {
            on_win
        } else if outcome.full {
            GameStatus::Draw
        } else {
            return None;
        };
        Some(self.enter_status(state, status))
    }

    fn crash(&self, state: &mut SessionState, err: ControllerError) {
        error!(error = %err, "Session crashed");
        state.crash_reason = Some(err.to_string());
        self.enter(state, GameStatus::Crashed);
    }

    /// Locks the state if `ticket` is still the current epoch.
    fn resume(&self, ticket: Ticket) -> Option<MutexGuard<'_, SessionState>> {
        let state = self.lock();
        if state.epoch == ticket.0 {
            Some(state)
        } else {
            debug!(
                launched = ticket.0,
                current = state.epoch,
                status = %state.status,
                "Discarding stale response"
            );
            None
        }
    }

    fn enter(&self, state: &mut SessionState, status: GameStatus) -> Ticket {
        state.epoch += 1;
        if status != state.status {
            debug!(from = %state.status, to = %status, "Status changed");
        }
        state.status = status;
        self.emit(GameEvent::StatusChanged(status));
        Ticket(state.epoch)
    }

    fn enter_status(&self, state: &mut SessionState, status: GameStatus) -> GameStatus {
        self.enter(state, status);
        status
    }

    fn emit(&self, event: GameEvent) {
        if let Some(events) = &self.events
            && events.send(event).is_err()
        {
            warn!("Event receiver dropped");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{BuildStatus, Chances};

    /// Service that must never be called.
    struct Unreachable;

    #[async_trait::async_trait]
    impl MoveService for Unreachable {
        async fn build_status(&self, _game: &str) -> Result<BuildStatus, ServiceError> {
            Err(ServiceError::new("unexpected call"))
        }
        async fn build(&self, _game: &str) -> Result<(), ServiceError> {
            Err(ServiceError::new("unexpected call"))
        }
        async fn next_move(&self, _game: &str) -> Result<NextMove, ServiceError> {
            Err(ServiceError::new("unexpected call"))
        }
        async fn chances(&self, _game: &str) -> Result<Chances, ServiceError> {
            Err(ServiceError::new("unexpected call"))
        }
    }

    fn controller() -> GameController {
        GameController::new(Arc::new(Unreachable), Duration::from_millis(1))
    }

    #[test]
    fn test_status_names() {
        assert_eq!(GameStatus::AwaitingBuild.to_string(), "awaiting-build");
        assert_eq!(GameStatus::AwaitingLocalMove.to_string(), "awaiting-local-move");
        assert_eq!(GameStatus::Crashed.to_string(), "crashed");
        assert!(GameStatus::Draw.is_terminal());
        assert!(!GameStatus::AwaitingRemoteMove.is_terminal());
    }

    #[test]
    fn test_initial_session() {
        let view = controller().view();
        assert_eq!(view.status, GameStatus::AwaitingLocalMove);
        assert_eq!(view.board, Board::new(3));
        assert_eq!(view.status_line(), "Waiting for your move...");
    }

    #[test]
    fn test_resume_rejects_stale_ticket() {
        let controller = controller();
        let ticket = {
            let mut state = controller.lock();
            controller.enter(&mut state, GameStatus::AwaitingRemoteMove)
        };
        assert!(controller.resume(ticket).is_some());

        controller.restart();
        assert!(controller.resume(ticket).is_none());
    }

    #[test]
    fn test_stale_reply_is_not_applied() {
        let controller = controller();
        let ticket = {
            let mut state = controller.lock();
            controller.enter(&mut state, GameStatus::AwaitingRemoteMove)
        };
        controller.restart();

        assert_eq!(controller.apply_reply(ticket, NextMove { x: 0, y: 0 }), None);
        assert_eq!(controller.board(), Board::new(3));
        assert_eq!(controller.status(), GameStatus::AwaitingLocalMove);
    }

    #[test]
    fn test_off_board_reply_crashes() {
        let controller = controller();
        let ticket = {
            let mut state = controller.lock();
            controller.enter(&mut state, GameStatus::AwaitingRemoteMove)
        };

        assert_eq!(controller.apply_reply(ticket, NextMove { x: 3, y: -1 }), None);
        let view = controller.view();
        assert_eq!(view.status, GameStatus::Crashed);
        assert!(view.crash_reason.unwrap().contains("off the board"));
    }

    #[tokio::test]
    async fn test_refused_moves_change_nothing() {
        let controller = controller();
        controller.restart();
        {
            let mut state = controller.lock();
            controller.enter(&mut state, GameStatus::Won);
        }

        let err = controller.play(4).await.unwrap_err();
        assert_eq!(err, MoveError::NotAccepting("won".to_string()));
        assert_eq!(controller.board(), Board::new(3));
    }

    #[tokio::test]
    async fn test_continue_requires_draw() {
        let controller = controller();
        assert!(controller.continue_game().await.is_err());
        assert_eq!(controller.board().size(), 3);
    }

    #[tokio::test]
    async fn test_events_are_published() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = controller().with_events(tx);

        controller.restart();

        assert_eq!(rx.recv().await, Some(GameEvent::Restarted));
        assert_eq!(
            rx.recv().await,
            Some(GameEvent::StatusChanged(GameStatus::AwaitingLocalMove))
        );
    }
}
