//! Terminal UI for growing tic-tac-toe

mod app;
mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use growing_tictactoe::{GameController, GameEvent, MoveService};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use app::{App, Request};
use input::action_for_key;

const LOG_FILE: &str = "growing_tictactoe.log";
const FRAME_POLL: Duration = Duration::from_millis(50);

/// Run the TUI client
pub async fn run_tui(service: Arc<dyn MoveService>, poll_interval: Duration) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!("Starting growing tic-tac-toe TUI");

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let controller = GameController::new(service, poll_interval).with_events(event_tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &controller, &mut event_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }

    res
}

/// Draws, drains controller events and handles keys until the player quits.
#[instrument(skip_all)]
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    controller: &GameController,
    event_rx: &mut mpsc::UnboundedReceiver<GameEvent>,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut app = App::new(controller.view());

    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(&event, controller.view());
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if !event::poll(FRAME_POLL)? {
            tokio::task::yield_now().await;
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = action_for_key(key.code) else {
            continue;
        };

        match app.handle_action(action) {
            Some(Request::Quit) => {
                info!("User quit");
                return Ok(());
            }
            Some(Request::Restart) => controller.restart(),
            Some(Request::Play(index)) => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    if let Err(e) = controller.play(index).await {
                        warn!(error = %e, index, "Move refused");
                    }
                });
            }
            Some(Request::Continue) => {
                let controller = controller.clone();
                tokio::spawn(async move {
                    if let Err(e) = controller.continue_game().await {
                        warn!(error = %e, "Continue refused");
                    }
                });
            }
            None => {}
        }
    }
}
