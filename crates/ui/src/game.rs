//! Game lifecycle: setup, the three UI tasks, and teardown.
//!
//! ```text
//! init terminal -> border + title -> flush
//!   spawn BoardRenderer, spawn MoveDispatcher, arm InputPoller
//!   wait for completion
//! dismissal key -> flush -> input mode -> close terminal
//! ```
//!
//! The terminal is closed whenever init succeeded, whatever happens after.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::completion::CompletionSignal;
use crate::error::ClientError;
use crate::input::{input_queue, GameOverFlag, InputPoller, MoveDispatcher};
use crate::render::{BoardRenderer, GameEnd};
use crate::session::SessionHandle;
use crate::term::draw::{draw_border, write_message};
use crate::term::{EventSource, InputMode, Surface};
use crate::types::{text, Color, Geometry};

/// How long teardown waits for the dispatcher to notice the closed queue.
const DISPATCHER_GRACE: Duration = Duration::from_millis(200);

/// Result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub player_name: String,
    pub frames: u64,
    pub end: GameEnd,
    /// Moves delivered to the session; `None` if the dispatcher had not
    /// wound down by teardown.
    pub moves_forwarded: Option<u64>,
}

pub struct TetrisUi<S, E> {
    surface: S,
    events: E,
    session: SessionHandle,
    geometry: Geometry,
}

impl<S, E> TetrisUi<S, E>
where
    S: Surface + 'static,
    E: EventSource,
{
    pub fn new(surface: S, events: E, session: SessionHandle, geometry: Geometry) -> Self {
        Self {
            surface,
            events,
            session,
            geometry,
        }
    }

    /// Run one game to completion.
    ///
    /// Fails with [`ClientError::System`] before anything is spawned if the
    /// terminal cannot be initialised.
    pub async fn start_game(self) -> Result<GameSummary, ClientError> {
        let TetrisUi {
            mut surface,
            events,
            session,
            geometry,
        } = self;

        surface
            .init()
            .map_err(|e| ClientError::system("unable to initialise terminal", e))?;
        log::info!("terminal initialised for player {}", session.player_name);

        let surface = Arc::new(Mutex::new(surface));
        let result = play(Arc::clone(&surface), events, session, geometry).await;

        if let Err(e) = surface.lock().await.close() {
            log::warn!("failed to close terminal: {e:#}");
        }
        result
    }
}

async fn play<S, E>(
    surface: Arc<Mutex<S>>,
    events: E,
    session: SessionHandle,
    geometry: Geometry,
) -> Result<GameSummary, ClientError>
where
    S: Surface + 'static,
    E: EventSource,
{
    {
        let mut term = surface.lock().await;
        draw_border(&mut *term, geometry.border);
        write_message(&mut *term, text::TITLE, text::TITLE_AT, Color::White);
        term.flush()
            .map_err(|e| ClientError::terminal("initial flush failed", e))?;
    }

    let SessionHandle {
        player_name,
        snapshots,
        moves,
    } = session;

    let completion = CompletionSignal::new();
    let game_over = GameOverFlag::new();
    let (queue, keys) = input_queue();
    let poller = InputPoller::new(events, queue.clone(), game_over.clone());

    let renderer = BoardRenderer::new(
        Arc::clone(&surface),
        geometry,
        player_name.clone(),
        snapshots,
        queue,
        game_over,
        completion.clone(),
    );
    let render_task = tokio::spawn(renderer.run());
    let mut dispatch_task = tokio::spawn(MoveDispatcher::new(keys, moves, poller.clone()).run());
    poller.arm();

    completion.wait().await;
    log::info!("game ended, waiting for dismissal key");

    let dismiss = poller.clone();
    match tokio::task::spawn_blocking(move || dismiss.await_dismissal()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => log::warn!("dismissal poll failed: {e:#}"),
        Err(e) => log::warn!("dismissal task failed: {e}"),
    }

    {
        let mut term = surface.lock().await;
        term.flush()
            .map_err(|e| ClientError::terminal("final flush failed", e))?;
        term.set_input_mode(InputMode::Esc)
            .map_err(|e| ClientError::terminal("unable to reset input mode", e))?;
    }

    let report = match render_task.await {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => return Err(ClientError::terminal("rendering failed", e)),
        Err(e) => return Err(ClientError::terminal("renderer task failed", e)),
    };

    // The queue is closed by now; a dispatcher still running is stuck on a
    // session sink nobody drains.
    let moves_forwarded = match tokio::time::timeout(DISPATCHER_GRACE, &mut dispatch_task).await {
        Ok(Ok(stats)) => Some(stats.forwarded),
        Ok(Err(e)) => {
            log::warn!("dispatcher task failed: {e}");
            None
        }
        Err(_) => {
            log::warn!("dispatcher still busy at teardown, aborting");
            dispatch_task.abort();
            None
        }
    };

    Ok(GameSummary {
        player_name,
        frames: report.frames,
        end: report.end,
        moves_forwarded,
    })
}
