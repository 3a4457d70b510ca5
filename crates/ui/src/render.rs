//! Board renderer: turns session snapshots into terminal frames.
//!
//! Snapshots are drained one at a time in arrival order. Each one is drawn as
//! a full clear-redraw-flush under the surface lock, so frames never
//! interleave with other writers. A game-over snapshot, or the session
//! stream ending, draws the end message and tears the input path down.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, Mutex};

use crate::completion::CompletionSignal;
use crate::input::{GameOverFlag, InputQueue};
use crate::term::draw::{clear_board, clear_preview, draw_board_pixel, draw_preview_pixel, write_message};
use crate::term::Surface;
use crate::types::{text, BoardSnapshot, Color, Geometry};

/// Why the render loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    /// The session sent a game-over snapshot.
    GameOver,
    /// The session stream ended without one.
    SessionClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// Snapshots drawn, game-over excluded.
    pub frames: u64,
    pub end: GameEnd,
}

pub struct BoardRenderer<S> {
    surface: Arc<Mutex<S>>,
    geometry: Geometry,
    player_name: String,
    snapshots: mpsc::Receiver<BoardSnapshot>,
    input: InputQueue,
    game_over: GameOverFlag,
    completion: CompletionSignal,
}

impl<S: Surface> BoardRenderer<S> {
    pub fn new(
        surface: Arc<Mutex<S>>,
        geometry: Geometry,
        player_name: String,
        snapshots: mpsc::Receiver<BoardSnapshot>,
        input: InputQueue,
        game_over: GameOverFlag,
        completion: CompletionSignal,
    ) -> Self {
        Self {
            surface,
            geometry,
            player_name,
            snapshots,
            input,
            game_over,
            completion,
        }
    }

    /// Render until the game ends.
    ///
    /// Whatever the outcome, on return the game-over flag is set, completion
    /// has been signalled and both the input queue and the snapshot stream
    /// are closed.
    pub async fn run(mut self) -> Result<RenderReport> {
        let mut frames = 0u64;

        let outcome = loop {
            let Some(snapshot) = self.snapshots.recv().await else {
                log::info!("session stream ended without game over");
                break self
                    .end_screen(text::CONNECTION_LOST)
                    .await
                    .map(|_| GameEnd::SessionClosed);
            };

            log::debug!(
                "board update: pixels={} next={} pieces={} lines={} game_over={}",
                snapshot.pixels.len(),
                snapshot.next_piece_pixels.len(),
                snapshot.piece_count,
                snapshot.lines_cleared,
                snapshot.game_over
            );

            if snapshot.game_over {
                break self.end_screen(text::GAME_OVER).await.map(|_| GameEnd::GameOver);
            }

            let drawn = {
                let mut term = self.surface.lock().await;
                draw_frame(&mut *term, &self.geometry, &self.player_name, &snapshot)
            };
            if let Err(e) = drawn {
                break Err(e);
            }
            frames += 1;
        };

        self.shutdown().await;
        outcome.map(|end| RenderReport { frames, end })
    }

    async fn end_screen(&self, message: &str) -> Result<()> {
        self.game_over.set();
        let mut term = self.surface.lock().await;
        write_message(&mut *term, message, text::GAME_OVER_AT, Color::White);
        term.flush()
    }

    async fn shutdown(&mut self) {
        self.game_over.set();
        if self.completion.signal() {
            log::info!("game finished, completion signalled");
        }
        self.input.close().await;
        self.snapshots.close();
    }
}

/// Draw one full frame and flush it.
///
/// Clears the board and preview, writes the status lines, draws every pixel
/// (later pixels win), then flushes.
pub fn draw_frame<S: Surface + ?Sized>(
    surface: &mut S,
    geometry: &Geometry,
    player_name: &str,
    snapshot: &BoardSnapshot,
) -> Result<()> {
    clear_board(surface, geometry);
    clear_preview(surface, geometry);

    write_message(surface, &format!("player: {player_name}"), text::PLAYER_AT, Color::White);
    write_message(surface, &format!("pieces: {}", snapshot.piece_count), text::PIECES_AT, Color::White);
    write_message(surface, &format!("lines: {}", snapshot.lines_cleared), text::LINES_AT, Color::White);
    write_message(surface, text::NEXT_PIECE, text::NEXT_PIECE_AT, Color::White);

    for &p in &snapshot.pixels {
        draw_board_pixel(surface, geometry, p);
    }
    for &p in &snapshot.next_piece_pixels {
        draw_preview_pixel(surface, geometry, p);
    }

    surface.flush()
}
