//! Shared game-over flag.
//!
//! Set once by the board renderer, read by the input poller before each
//! enqueue. The check is racy by nature: a key read just before the flag is
//! set may still be enqueued, and one read just after is discarded. Either
//! way at most one stray key is affected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct GameOverFlag(Arc<AtomicBool>);

impl GameOverFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
