//! Move dispatcher: drains the input queue and forwards moves to the session.

use tokio::sync::mpsc;

use crate::map::move_for_key;
use crate::poller::InputPoller;
use crate::queue::InputReceiver;
use crate::term::EventSource;
use crate::types::MoveCommand;

/// Counters for one dispatcher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchStats {
    /// Keys taken off the input queue.
    pub events: u64,
    /// Moves delivered to the session sink.
    pub forwarded: u64,
    /// Keys with no move mapping.
    pub ignored: u64,
    /// Moves lost because the session sink was closed.
    pub dropped: u64,
}

pub struct MoveDispatcher<E> {
    keys: InputReceiver,
    moves: mpsc::Sender<MoveCommand>,
    poller: InputPoller<E>,
}

impl<E: EventSource> MoveDispatcher<E> {
    pub fn new(keys: InputReceiver, moves: mpsc::Sender<MoveCommand>, poller: InputPoller<E>) -> Self {
        Self {
            keys,
            moves,
            poller,
        }
    }

    /// Dispatch keys in FIFO order until the input queue is closed and drained.
    ///
    /// After each key, mapped or not, the poller is re-armed for exactly one
    /// more read.
    pub async fn run(mut self) -> DispatchStats {
        let mut stats = DispatchStats::default();

        while let Some(key) = self.keys.recv().await {
            stats.events += 1;
            match move_for_key(key) {
                Some(cmd) => {
                    log::debug!("keypress, move: {}", cmd.as_str());
                    if self.moves.send(cmd).await.is_ok() {
                        stats.forwarded += 1;
                    } else {
                        log::warn!("session move sink closed, dropping {}", cmd.as_str());
                        stats.dropped += 1;
                    }
                }
                None => {
                    log::debug!("keypress {:?} has no move", key.code);
                    stats.ignored += 1;
                }
            }
            self.poller.arm();
        }

        log::debug!("input queue closed, dispatcher exiting: {:?}", stats);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::GameOverFlag;
    use crate::queue::input_queue;
    use crate::term::testing::ScriptedEvents;
    use crossterm::event::KeyCode;
    use std::time::Duration;

    #[tokio::test]
    async fn forwards_mapped_keys_and_rearms_after_every_key() {
        let (events, script) = ScriptedEvents::new();
        let (queue, rx) = input_queue();
        let (move_tx, mut move_rx) = mpsc::channel(8);
        let poller = InputPoller::new(events, queue.clone(), GameOverFlag::new());

        let dispatcher = tokio::spawn(MoveDispatcher::new(rx, move_tx, poller.clone()).run());
        poller.arm();

        script.press(KeyCode::Char('p'));
        script.press(KeyCode::Left);
        script.press(KeyCode::Enter);
        script.press(KeyCode::Char(' '));

        let first = tokio::time::timeout(Duration::from_secs(2), move_rx.recv())
            .await
            .unwrap();
        let second = tokio::time::timeout(Duration::from_secs(2), move_rx.recv())
            .await
            .unwrap();
        assert_eq!(first, Some(MoveCommand::MoveLeft));
        assert_eq!(second, Some(MoveCommand::Drop));

        // Four keys handled, fifth poll armed and waiting.
        while script.polls() < 5 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(queue.dequeued(), 4);
        assert!(queue.max_depth() <= 1);

        queue.close().await;
        // Unblock the armed poll; the queue is closed so the key is discarded.
        script.press(KeyCode::Left);
        let stats = tokio::time::timeout(Duration::from_secs(2), dispatcher)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            stats,
            DispatchStats {
                events: 4,
                forwarded: 2,
                ignored: 2,
                dropped: 0,
            }
        );
        assert!(move_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_session_sink_drops_moves() {
        let (events, script) = ScriptedEvents::new();
        let (queue, rx) = input_queue();
        let (move_tx, move_rx) = mpsc::channel(1);
        drop(move_rx);
        let flag = GameOverFlag::new();
        let poller = InputPoller::new(events, queue.clone(), flag.clone());

        let dispatcher = tokio::spawn(MoveDispatcher::new(rx, move_tx, poller.clone()).run());
        poller.arm();
        script.press(KeyCode::Up);

        while queue.dequeued() < 1 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        flag.set();
        queue.close().await;
        script.press(KeyCode::Esc);

        let stats = tokio::time::timeout(Duration::from_secs(2), dispatcher)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.forwarded, 0);
    }
}
