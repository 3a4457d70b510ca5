//! Crossterm-backed terminal surface.
//!
//! Cell writes go into a back buffer. `flush` diffs it against the frame that
//! was last written and emits only the changed runs; the first flush after
//! `init` is a full redraw.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::fb::{Cell, FrameBuffer};
use crate::surface::{EventSource, InputMode, Surface};
use crate::types::Color;

pub struct CrosstermSurface {
    out: Box<dyn Write + Send>,
    back: FrameBuffer,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    mouse_capture: bool,
}

impl CrosstermSurface {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Surface that writes its escape sequences to `out` instead of stdout.
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Box::new(out),
            back: FrameBuffer::new(0, 0),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
            mouse_capture: false,
        }
    }

    fn enter_screen(&mut self, w: u16, h: u16) -> Result<()> {
        self.back = FrameBuffer::new(w, h);
        self.last = None;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

impl Default for CrosstermSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for CrosstermSurface {
    fn init(&mut self) -> Result<()> {
        let (w, h) = terminal::size()?;
        terminal::enable_raw_mode()?;
        if let Err(e) = self.enter_screen(w, h) {
            // `close` is not called after a failed init.
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.buf.clear();
        if self.mouse_capture {
            self.buf.queue(DisableMouseCapture)?;
            self.mouse_capture = false;
        }
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, fg: Color, bg: Color) {
        self.back.set(x, y, Cell { ch, fg, bg });
    }

    fn flush(&mut self) -> Result<()> {
        self.buf.clear();
        match self.last.as_mut() {
            Some(prev) => {
                encode_diff_into(prev, &self.back, &mut self.buf)?;
                prev.clone_from(&self.back);
            }
            None => {
                encode_full_into(&self.back, &mut self.buf)?;
                self.last = Some(self.back.clone());
            }
        }
        self.flush_buf()
    }

    fn set_input_mode(&mut self, mode: InputMode) -> Result<()> {
        let want_mouse = mode == InputMode::Mouse;
        if want_mouse == self.mouse_capture {
            return Ok(());
        }
        self.buf.clear();
        if want_mouse {
            self.buf.queue(EnableMouseCapture)?;
        } else {
            self.buf.queue(DisableMouseCapture)?;
        }
        self.mouse_capture = want_mouse;
        self.flush_buf()
    }
}

/// Blocking crossterm event reader.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self) -> Result<Event> {
        Ok(event::read()?)
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current: Option<(Color, Color)> = None;
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if current != Some((cell.fg, cell.bg)) {
                apply_colors_into(out, cell)?;
                current = Some((cell.fg, cell.bg));
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(ResetColor)?;
    Ok(())
}

/// Encode a diff redraw (changed runs) into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut current: Option<(Color, Color)> = None;

    for_each_changed_run(prev, next, |x, y, len| {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(x + dx, y).unwrap_or_default();
            if current != Some((cell.fg, cell.bg)) {
                apply_colors_into(out, cell)?;
                current = Some((cell.fg, cell.bg));
            }
            out.queue(Print(cell.ch))?;
        }
        Ok(())
    })?;

    out.queue(ResetColor)?;
    Ok(())
}

fn apply_colors_into(out: &mut Vec<u8>, cell: Cell) -> Result<()> {
    out.queue(SetForegroundColor(term_color(cell.fg)))?;
    out.queue(SetBackgroundColor(term_color(cell.bg)))?;
    Ok(())
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Default => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::White => TermColor::Grey,
    }
}

fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        // Size changed: treat everything as dirty in a single pass (row runs).
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    let h = next.height();

    for y in 0..h {
        let mut x = 0;
        while x < w {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }

            let start = x;
            x += 1;
            while x < w && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}
