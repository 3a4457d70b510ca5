//! Terminal input module (session-facing).
//!
//! Turns raw terminal key events into [`MoveCommand`](crate::types::MoveCommand)s
//! with at most one key event in flight at a time:
//!
//! ```text
//! InputPoller --(InputQueue, capacity 1)--> MoveDispatcher --> session move sink
//!      ^                                          |
//!      +--------------- re-arm -------------------+
//! ```
//!
//! The poller performs one blocking read per arming and the dispatcher re-arms
//! it after each event, so stale keystrokes never pile up behind a slow render.

pub mod dispatcher;
pub mod flag;
pub mod map;
pub mod poller;
pub mod queue;

pub use tetris_client_term as term;
pub use tetris_client_types as types;

pub use dispatcher::{DispatchStats, MoveDispatcher};
pub use flag::GameOverFlag;
pub use map::move_for_key;
pub use poller::{InputPoller, PollOutcome};
pub use queue::{input_queue, InputQueue, InputReceiver, INPUT_QUEUE_CAPACITY};
