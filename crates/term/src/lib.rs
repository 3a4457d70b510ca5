//! Terminal surface module.
//!
//! A small, game-oriented layer over the terminal: a [`Surface`] to write
//! colored cells and flush them, an [`EventSource`] to block on input, and
//! stateless drawing helpers for the client's fixed layout.
//!
//! Goals:
//! - Keep drawing testable without a real terminal (see [`testing`])
//! - Flush only changed cells to the real terminal
//! - Fixed aspect ratio (2 chars wide per logical cell)

pub mod draw;
pub mod fb;
pub mod renderer;
pub mod surface;
pub mod testing;

pub use tetris_client_types as types;

pub use fb::{Cell, FrameBuffer};
pub use renderer::{encode_diff_into, encode_full_into, CrosstermEvents, CrosstermSurface};
pub use surface::{EventSource, InputMode, Surface};
