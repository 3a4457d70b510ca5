//! Terminal surface abstraction.
//!
//! The terminal is split into two halves so that a task blocked waiting for
//! the next key never holds up drawing:
//!
//! - [`Surface`]: lifecycle, cell writes and flushing
//! - [`EventSource`]: blocking reads of input events

use anyhow::Result;
use crossterm::event::Event;

use crate::types::Color;

/// Input reporting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// A lone escape byte is reported as the Esc key.
    #[default]
    Esc,
    /// Mouse events are reported in addition to keys.
    Mouse,
}

/// Drawing half of a terminal.
///
/// Cell writes are buffered; nothing is visible until [`Surface::flush`].
pub trait Surface: Send {
    fn init(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;

    fn set_cell(&mut self, x: u16, y: u16, ch: char, fg: Color, bg: Color);

    fn flush(&mut self) -> Result<()>;

    fn set_input_mode(&mut self, mode: InputMode) -> Result<()>;
}

/// Input half of a terminal.
pub trait EventSource: Send + 'static {
    /// Block until the next input event is available.
    fn poll_event(&mut self) -> Result<Event>;
}
