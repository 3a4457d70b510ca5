//! Local replay session.
//!
//! Plays a fixed script of board snapshots into a [`SessionPeer`] at a steady
//! pace and logs the moves the UI sends back. The script is line-delimited
//! JSON, one [`BoardSnapshot`] per line:
//!
//! ```text
//! {"pixels":[{"x":4,"y":0,"color":"cyan"}],"nextPiecePixels":[],"pieceCount":1,"linesCleared":0}
//! {"gameOver":true}
//! ```
//!
//! Blank lines are skipped. A script that does not end the game gets a final
//! `{"gameOver":true}` appended so the client always reaches its end screen.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::handle::SessionPeer;
use crate::types::BoardSnapshot;

/// What a replay run delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    pub snapshots_sent: usize,
    pub moves_received: usize,
}

#[derive(Debug, Clone)]
pub struct ReplaySession {
    snapshots: Vec<BoardSnapshot>,
    interval: Duration,
}

impl ReplaySession {
    pub fn new(mut snapshots: Vec<BoardSnapshot>, interval: Duration) -> Self {
        if !snapshots.iter().any(|s| s.game_over) {
            snapshots.push(BoardSnapshot::game_over());
        }
        Self {
            snapshots,
            interval,
        }
    }

    pub fn from_path(path: impl AsRef<Path>, interval: Duration) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading replay script {}", path.display()))?;
        let snapshots =
            parse_script(&text).with_context(|| format!("parsing replay script {}", path.display()))?;
        Ok(Self::new(snapshots, interval))
    }

    pub fn snapshots(&self) -> &[BoardSnapshot] {
        &self.snapshots
    }

    pub fn spawn(self, peer: SessionPeer) -> JoinHandle<ReplayReport> {
        tokio::spawn(self.run(peer))
    }

    /// Send every snapshot, one per interval, until the script ends or the
    /// client closes the stream.
    pub async fn run(self, mut peer: SessionPeer) -> ReplayReport {
        let mut report = ReplayReport::default();
        let mut ticker = tokio::time::interval(self.interval);
        let mut script = self.snapshots.into_iter();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(snapshot) = script.next() else {
                        break;
                    };
                    let game_over = snapshot.game_over;
                    if peer.snapshots.send(snapshot).await.is_err() {
                        log::info!("client closed the session after {} snapshots", report.snapshots_sent);
                        break;
                    }
                    report.snapshots_sent += 1;
                    if game_over {
                        break;
                    }
                }
                Some(m) = peer.moves.recv() => {
                    log::debug!("replay received move {}", m.as_str());
                    report.moves_received += 1;
                }
            }
        }

        while let Ok(m) = peer.moves.try_recv() {
            log::debug!("replay received move {}", m.as_str());
            report.moves_received += 1;
        }
        log::info!("replay finished: {:?}", report);
        report
    }
}

/// Parse a line-delimited JSON snapshot script.
pub fn parse_script(text: &str) -> Result<Vec<BoardSnapshot>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<BoardSnapshot>(line)
                .with_context(|| format!("line {}: invalid snapshot", i + 1))
        })
        .collect()
}
