//! Session channel pair.

use tokio::sync::mpsc;

use crate::types::{BoardSnapshot, MoveCommand};

/// UI side of a session.
#[derive(Debug)]
pub struct SessionHandle {
    pub player_name: String,
    pub snapshots: mpsc::Receiver<BoardSnapshot>,
    pub moves: mpsc::Sender<MoveCommand>,
}

/// Collaborator side of a session.
#[derive(Debug)]
pub struct SessionPeer {
    pub snapshots: mpsc::Sender<BoardSnapshot>,
    pub moves: mpsc::Receiver<MoveCommand>,
}

impl SessionHandle {
    /// Create a connected handle/peer pair with `capacity` slots per direction.
    pub fn channel(player_name: impl Into<String>, capacity: usize) -> (SessionHandle, SessionPeer) {
        let capacity = capacity.max(1);
        let (snap_tx, snap_rx) = mpsc::channel(capacity);
        let (move_tx, move_rx) = mpsc::channel(capacity);
        (
            SessionHandle {
                player_name: player_name.into(),
                snapshots: snap_rx,
                moves: move_tx,
            },
            SessionPeer {
                snapshots: snap_tx,
                moves: move_rx,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closing_inbound_stream_rejects_further_snapshots() {
        let (mut handle, peer) = SessionHandle::channel("ada", 2);
        peer.snapshots.send(BoardSnapshot::default()).await.unwrap();

        handle.snapshots.close();
        assert!(peer.snapshots.send(BoardSnapshot::game_over()).await.is_err());

        // Already-buffered snapshots are still delivered, then the stream ends.
        assert_eq!(handle.snapshots.recv().await, Some(BoardSnapshot::default()));
        assert_eq!(handle.snapshots.recv().await, None);
    }

    #[tokio::test]
    async fn zero_capacity_is_raised_to_one() {
        let (handle, mut peer) = SessionHandle::channel("ada", 0);
        handle.moves.send(MoveCommand::Drop).await.unwrap();
        assert_eq!(peer.moves.recv().await, Some(MoveCommand::Drop));
        assert_eq!(handle.player_name, "ada");
    }
}
