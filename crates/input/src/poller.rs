//! Input poller: one blocking terminal read per arming.
//!
//! The poller is not a free-running loop. Each call to [`InputPoller::arm`]
//! reads exactly one key press on the blocking pool and hands it to the
//! input queue; the dispatcher re-arms it once that key has been handled.
//! Non-key events (resize, focus, mouse, key release) are skipped within the
//! same arming so they never break the re-arm chain.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, KeyEvent, KeyEventKind};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::flag::GameOverFlag;
use crate::queue::InputQueue;
use crate::term::EventSource;

/// What one arming did with the key it read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Enqueued,
    /// Read after game over; counts as the dismissal key.
    Discarded,
    /// Read before game over, but the queue closed before it was enqueued.
    Dropped,
}

pub struct InputPoller<E> {
    source: Arc<Mutex<E>>,
    queue: InputQueue,
    game_over: GameOverFlag,
    dismissed: Arc<AtomicBool>,
}

impl<E> Clone for InputPoller<E> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            queue: self.queue.clone(),
            game_over: self.game_over.clone(),
            dismissed: Arc::clone(&self.dismissed),
        }
    }
}

impl<E: EventSource> InputPoller<E> {
    pub fn new(source: E, queue: InputQueue, game_over: GameOverFlag) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            queue,
            game_over,
            dismissed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start one poll on the blocking pool.
    ///
    /// Returns `None` without polling once the game is over. Must be called
    /// from within a tokio runtime.
    pub fn arm(&self) -> Option<JoinHandle<()>> {
        if self.game_over.is_set() {
            log::debug!("game over, input poller not re-armed");
            return None;
        }
        let poller = self.clone();
        Some(tokio::task::spawn_blocking(move || {
            match poller.poll_once() {
                Ok(outcome) => log::trace!("input poll: {:?}", outcome),
                Err(e) => log::warn!("input poll failed: {e:#}"),
            }
        }))
    }

    /// Read one key press and enqueue it unless the game is over.
    ///
    /// Blocks the calling thread. Only a key read after game over is
    /// remembered as the dismissal key; a key that loses the race with the
    /// queue closing is dropped and the player still gets a dismissal read.
    pub fn poll_once(&self) -> Result<PollOutcome> {
        let mut source = self.source.blocking_lock();
        let key = next_key(&mut *source)?;
        log::debug!("user keypress: {:?}", key.code);

        if self.game_over.is_set() {
            self.dismissed.store(true, Ordering::Release);
            return Ok(PollOutcome::Discarded);
        }
        if self.queue.push_blocking(key) {
            return Ok(PollOutcome::Enqueued);
        }
        log::debug!("input queue closed, keypress dropped");
        Ok(PollOutcome::Dropped)
    }

    /// Block until the player has pressed a key after game over.
    ///
    /// Waits for any poll still in flight. If that poll already consumed a
    /// post-game key, returns at once; otherwise reads one more key.
    pub fn await_dismissal(&self) -> Result<()> {
        let mut source = self.source.blocking_lock();
        if self.dismissed.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        let key = next_key(&mut *source)?;
        log::debug!("dismissal keypress: {:?}", key.code);
        Ok(())
    }
}

fn next_key<E: EventSource + ?Sized>(source: &mut E) -> Result<KeyEvent> {
    loop {
        match source.poll_event()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => return Ok(key),
            other => log::trace!("ignoring non-key event: {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::input_queue;
    use crate::term::testing::ScriptedEvents;
    use crossterm::event::KeyCode;

    #[tokio::test]
    async fn enqueues_one_key_per_poll() {
        let (events, script) = ScriptedEvents::new();
        let (queue, mut rx) = input_queue();
        let poller = InputPoller::new(events, queue.clone(), GameOverFlag::new());

        script.press(KeyCode::Left);
        script.press(KeyCode::Right);

        let p = poller.clone();
        let outcome = tokio::task::spawn_blocking(move || p.poll_once())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome, PollOutcome::Enqueued);
        assert_eq!(queue.enqueued(), 1);
        assert_eq!(rx.recv().await.map(|k| k.code), Some(KeyCode::Left));
        assert_eq!(script.polls(), 1);
    }

    #[tokio::test]
    async fn skips_non_key_events_within_one_poll() {
        let (events, script) = ScriptedEvents::new();
        let (queue, mut rx) = input_queue();
        let poller = InputPoller::new(events, queue.clone(), GameOverFlag::new());

        script.send(Event::Resize(80, 24));
        script.send(Event::FocusLost);
        script.release(KeyCode::Left);
        script.press(KeyCode::Down);

        let p = poller.clone();
        tokio::task::spawn_blocking(move || p.poll_once())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rx.recv().await.map(|k| k.code), Some(KeyCode::Down));
        assert_eq!(queue.enqueued(), 1);
        assert_eq!(script.polls(), 4);
    }

    #[tokio::test]
    async fn discards_after_game_over_and_counts_as_dismissal() {
        let (events, script) = ScriptedEvents::new();
        let (queue, _rx) = input_queue();
        let flag = GameOverFlag::new();
        let poller = InputPoller::new(events, queue.clone(), flag.clone());

        flag.set();
        script.press(KeyCode::Left);

        let p = poller.clone();
        let outcome = tokio::task::spawn_blocking(move || p.poll_once())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome, PollOutcome::Discarded);
        assert_eq!(queue.enqueued(), 0);

        // The discarded key already dismissed the game; no further read.
        let p = poller.clone();
        tokio::task::spawn_blocking(move || p.await_dismissal())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(script.polls(), 1);
    }

    #[tokio::test]
    async fn key_lost_to_queue_close_is_not_a_dismissal() {
        let (events, script) = ScriptedEvents::new();
        let (queue, _rx) = input_queue();
        let flag = GameOverFlag::new();
        let poller = InputPoller::new(events, queue.clone(), flag.clone());

        // Queue closes while the flag still reads clear.
        queue.close().await;
        script.press(KeyCode::Left);

        let p = poller.clone();
        let outcome = tokio::task::spawn_blocking(move || p.poll_once())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome, PollOutcome::Dropped);
        assert_eq!(queue.enqueued(), 0);

        // The game-over screen still waits for a fresh key.
        flag.set();
        script.press(KeyCode::Enter);
        let p = poller.clone();
        tokio::task::spawn_blocking(move || p.await_dismissal())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(script.polls(), 2);
    }

    #[tokio::test]
    async fn arm_is_a_no_op_after_game_over() {
        let (events, script) = ScriptedEvents::new();
        let (queue, _rx) = input_queue();
        let flag = GameOverFlag::new();
        let poller = InputPoller::new(events, queue, flag.clone());

        flag.set();
        assert!(poller.arm().is_none());
        assert_eq!(script.polls(), 0);
    }

    #[tokio::test]
    async fn poll_error_is_reported() {
        let (events, script) = ScriptedEvents::new();
        let (queue, _rx) = input_queue();
        let poller = InputPoller::new(events, queue, GameOverFlag::new());
        drop(script);

        let result = tokio::task::spawn_blocking(move || poller.poll_once())
            .await
            .unwrap();
        assert!(result.is_err());
    }
}
