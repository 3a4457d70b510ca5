//! In-memory terminal doubles for tests and benches.
//!
//! - [`MemorySurface`] records cell writes into a [`FrameBuffer`]; the paired
//!   [`SurfaceProbe`] inspects it after the surface has been moved into the
//!   code under test.
//! - [`ScriptedEvents`] blocks like a real terminal until the paired
//!   [`KeyScript`] supplies an event. Dropping the script ends the source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};

use crate::fb::{Cell, FrameBuffer};
use crate::surface::{EventSource, InputMode, Surface};
use crate::types::Color;

#[derive(Debug)]
struct MemoryState {
    fb: FrameBuffer,
    init_error: Option<String>,
    initialized: bool,
    closed: bool,
    flushes: usize,
    cell_writes: usize,
    input_mode: Option<InputMode>,
}

fn lock(state: &Mutex<MemoryState>) -> MutexGuard<'_, MemoryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A surface that draws into memory.
#[derive(Debug)]
pub struct MemorySurface {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySurface {
    pub fn new(width: u16, height: u16) -> (Self, SurfaceProbe) {
        let state = Arc::new(Mutex::new(MemoryState {
            fb: FrameBuffer::new(width, height),
            init_error: None,
            initialized: false,
            closed: false,
            flushes: 0,
            cell_writes: 0,
            input_mode: None,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            SurfaceProbe { state },
        )
    }

    /// A surface whose `init` fails with `message`.
    pub fn failing_init(width: u16, height: u16, message: &str) -> (Self, SurfaceProbe) {
        let (surface, probe) = Self::new(width, height);
        lock(&surface.state).init_error = Some(message.to_string());
        (surface, probe)
    }
}

impl Surface for MemorySurface {
    fn init(&mut self) -> Result<()> {
        let mut st = lock(&self.state);
        if let Some(msg) = &st.init_error {
            return Err(anyhow!("{msg}"));
        }
        st.initialized = true;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        lock(&self.state).closed = true;
        Ok(())
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, fg: Color, bg: Color) {
        let mut st = lock(&self.state);
        st.cell_writes += 1;
        st.fb.set(x, y, Cell { ch, fg, bg });
    }

    fn flush(&mut self) -> Result<()> {
        lock(&self.state).flushes += 1;
        Ok(())
    }

    fn set_input_mode(&mut self, mode: InputMode) -> Result<()> {
        lock(&self.state).input_mode = Some(mode);
        Ok(())
    }
}

/// Read side of a [`MemorySurface`].
#[derive(Debug, Clone)]
pub struct SurfaceProbe {
    state: Arc<Mutex<MemoryState>>,
}

impl SurfaceProbe {
    /// Cell at `(x, y)`; blank for out-of-bounds positions.
    pub fn cell(&self, x: u16, y: u16) -> Cell {
        lock(&self.state).fb.get(x, y).unwrap_or_default()
    }

    pub fn row_text(&self, y: u16) -> String {
        lock(&self.state).fb.row_text(y)
    }

    /// Whole screen as text, one line per row.
    pub fn text(&self) -> String {
        let st = lock(&self.state);
        (0..st.fb.height())
            .map(|y| st.fb.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text().contains(needle)
    }

    pub fn flushes(&self) -> usize {
        lock(&self.state).flushes
    }

    pub fn cell_writes(&self) -> usize {
        lock(&self.state).cell_writes
    }

    pub fn is_initialized(&self) -> bool {
        lock(&self.state).initialized
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }

    pub fn input_mode(&self) -> Option<InputMode> {
        lock(&self.state).input_mode
    }
}

/// An event source fed by a [`KeyScript`].
#[derive(Debug)]
pub struct ScriptedEvents {
    rx: mpsc::Receiver<Event>,
    polls: Arc<AtomicUsize>,
}

impl ScriptedEvents {
    pub fn new() -> (Self, KeyScript) {
        let (tx, rx) = mpsc::channel();
        let polls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                rx,
                polls: Arc::clone(&polls),
            },
            KeyScript { tx, polls },
        )
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Result<Event> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        self.rx.recv().map_err(|_| anyhow!("event script ended"))
    }
}

/// Write side of a [`ScriptedEvents`].
#[derive(Debug, Clone)]
pub struct KeyScript {
    tx: mpsc::Sender<Event>,
    polls: Arc<AtomicUsize>,
}

impl KeyScript {
    pub fn press(&self, code: KeyCode) {
        self.send(Event::Key(KeyEvent::from(code)));
    }

    pub fn release(&self, code: KeyCode) {
        let mut key = KeyEvent::from(code);
        key.kind = KeyEventKind::Release;
        self.send(Event::Key(key));
    }

    pub fn send(&self, event: Event) {
        // A closed source just means the reader is gone.
        let _ = self.tx.send(event);
    }

    /// Number of `poll_event` calls made so far.
    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}
