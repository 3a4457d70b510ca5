//! Terminal game client UI.
//!
//! Binds three concurrent activities around one terminal and one session:
//!
//! - **input**: [`InputPoller`](crate::input::InputPoller) and
//!   [`MoveDispatcher`](crate::input::MoveDispatcher) turn key presses into
//!   session moves, one key in flight at a time
//! - **render**: [`BoardRenderer`] redraws the board for every snapshot and
//!   ends the game
//! - **lifecycle**: [`TetrisUi`] sets up, waits on the [`CompletionSignal`],
//!   and tears down

pub mod completion;
pub mod config;
pub mod error;
pub mod game;
pub mod render;

pub use tetris_client_input as input;
pub use tetris_client_session as session;
pub use tetris_client_term as term;
pub use tetris_client_types as types;

pub use completion::CompletionSignal;
pub use config::ClientConfig;
pub use error::ClientError;
pub use game::{GameSummary, TetrisUi};
pub use render::{draw_frame, BoardRenderer, GameEnd, RenderReport};
