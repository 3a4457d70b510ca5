//! Closable single-slot input queue.
//!
//! A tokio channel of capacity [`INPUT_QUEUE_CAPACITY`] whose only sender
//! lives in a shared slot. [`InputQueue::close`] takes the sender out, after
//! which the receiver drains what is left and then reports `None`.
//!
//! Enqueue/dequeue counters are kept so the in-flight depth can be observed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossterm::event::KeyEvent;
use tokio::sync::{mpsc, Mutex};

/// One key in flight at a time.
pub const INPUT_QUEUE_CAPACITY: usize = 1;

#[derive(Debug)]
struct Shared {
    slot: Mutex<Option<mpsc::Sender<KeyEvent>>>,
    enqueued: AtomicU64,
    dequeued: AtomicU64,
    max_depth: AtomicU64,
}

impl Shared {
    fn depth(&self) -> u64 {
        self.enqueued
            .load(Ordering::SeqCst)
            .saturating_sub(self.dequeued.load(Ordering::SeqCst))
    }
}

/// Create the queue's producer handle and its single consumer.
pub fn input_queue() -> (InputQueue, InputReceiver) {
    let (tx, rx) = mpsc::channel(INPUT_QUEUE_CAPACITY);
    let shared = Arc::new(Shared {
        slot: Mutex::new(Some(tx)),
        enqueued: AtomicU64::new(0),
        dequeued: AtomicU64::new(0),
        max_depth: AtomicU64::new(0),
    });
    (
        InputQueue {
            shared: Arc::clone(&shared),
        },
        InputReceiver { rx, shared },
    )
}

/// Producer/closer handle. Cheap to clone.
#[derive(Debug, Clone)]
pub struct InputQueue {
    shared: Arc<Shared>,
}

impl InputQueue {
    /// Enqueue a key from a blocking context.
    ///
    /// Returns `false` if the queue has been closed.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async execution context.
    pub fn push_blocking(&self, key: KeyEvent) -> bool {
        let Some(tx) = self.shared.slot.blocking_lock().clone() else {
            return false;
        };

        // Count before sending so the depth never dips below zero when the
        // consumer wins the race.
        let enqueued = self.shared.enqueued.fetch_add(1, Ordering::SeqCst) + 1;
        let depth = enqueued.saturating_sub(self.shared.dequeued.load(Ordering::SeqCst));
        self.shared.max_depth.fetch_max(depth, Ordering::SeqCst);

        if tx.blocking_send(key).is_err() {
            self.shared.enqueued.fetch_sub(1, Ordering::SeqCst);
            return false;
        }
        true
    }

    /// Close the queue. Returns `true` if this call closed it.
    pub async fn close(&self) -> bool {
        self.shared.slot.lock().await.take().is_some()
    }

    pub async fn is_closed(&self) -> bool {
        self.shared.slot.lock().await.is_none()
    }

    pub fn enqueued(&self) -> u64 {
        self.shared.enqueued.load(Ordering::SeqCst)
    }

    pub fn dequeued(&self) -> u64 {
        self.shared.dequeued.load(Ordering::SeqCst)
    }

    /// Keys enqueued but not yet taken by the consumer.
    pub fn depth(&self) -> u64 {
        self.shared.depth()
    }

    /// Largest depth observed at any enqueue.
    pub fn max_depth(&self) -> u64 {
        self.shared.max_depth.load(Ordering::SeqCst)
    }
}

/// Consumer side of the input queue.
#[derive(Debug)]
pub struct InputReceiver {
    rx: mpsc::Receiver<KeyEvent>,
    shared: Arc<Shared>,
}

impl InputReceiver {
    /// Next key in FIFO order, or `None` once the queue is closed and drained.
    pub async fn recv(&mut self) -> Option<KeyEvent> {
        let key = self.rx.recv().await?;
        self.shared.dequeued.fetch_add(1, Ordering::SeqCst);
        Some(key)
    }
}
