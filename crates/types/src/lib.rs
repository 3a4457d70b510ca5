//! Core types module - shared data structures and constants
//!
//! This module defines the data exchanged between the remote session and the
//! terminal client. All types are plain data: the session produces
//! [`BoardSnapshot`]s, the client produces [`MoveCommand`]s, and [`Geometry`]
//! fixes where everything lands on the terminal.
//!
//! # Screen Layout
//!
//! All coordinates are terminal cells (column, row):
//!
//! | Element | Origin | Extent |
//! |---------|--------|--------|
//! | Border box | (0, 0) | 35 x 30 |
//! | Game over message | (2, 1) | - |
//! | Title | (2, 2) | - |
//! | Status text | (2, 3) .. (2, 6) | - |
//! | Next-piece preview | (15, 6) | 4 x 4 cells |
//! | Board | (2, 10) | width x height cells |
//!
//! Every logical board/preview cell is two terminal columns wide.
//!
//! # Examples
//!
//! ```
//! use tetris_client_types::{BoardSnapshot, Color, MoveCommand, Pixel};
//!
//! let snap: BoardSnapshot = serde_json::from_str(
//!     r#"{"pixels":[{"x":0,"y":0,"color":"red"}],"pieceCount":3}"#,
//! )
//! .unwrap();
//! assert_eq!(snap.pixels, vec![Pixel::new(0, 0, Color::Red)]);
//! assert_eq!(snap.piece_count, 3);
//! assert!(!snap.game_over);
//!
//! assert_eq!(MoveCommand::from_str("rotateLeft"), Some(MoveCommand::RotateLeft));
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells (10 columns)
pub const BOARD_WIDTH: u16 = 10;

/// Default board height in cells (20 rows)
pub const BOARD_HEIGHT: u16 = 20;

/// Next-piece preview extent in cells (4x4)
pub const PREVIEW_SIZE: u16 = 4;

/// Terminal columns per logical cell.
pub const CELL_COLUMNS: u16 = 2;

/// Terminal cell color.
///
/// `Default` is the terminal's own background/foreground, which is what an
/// empty board cell is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

/// One logical grid cell's desired fill color.
///
/// A later pixel for the same (x, y) supersedes an earlier one in the same
/// redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub x: u16,
    pub y: u16,
    #[serde(default)]
    pub color: Color,
}

impl Pixel {
    pub const fn new(x: u16, y: u16, color: Color) -> Self {
        Self { x, y, color }
    }
}

/// Complete description of what the board should look like "now".
///
/// Produced by the remote session and consumed exactly once, in arrival
/// order, by the board renderer. Missing fields default, so a bare
/// `{"gameOver":true}` is a valid terminal snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardSnapshot {
    pub pixels: Vec<Pixel>,
    pub next_piece_pixels: Vec<Pixel>,
    pub piece_count: u32,
    pub lines_cleared: u32,
    pub game_over: bool,
}

impl BoardSnapshot {
    /// The snapshot that ends a game.
    pub fn game_over() -> Self {
        Self {
            game_over: true,
            ..Self::default()
        }
    }
}

/// Player moves forwarded to the remote session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveCommand {
    /// Rotate piece 90° counter-clockwise
    RotateLeft,
    /// Rotate piece 90° clockwise
    RotateRight,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece to the lowest valid position
    Drop,
    /// Move piece one cell down
    Down,
}

impl MoveCommand {
    pub const ALL: [MoveCommand; 6] = [
        MoveCommand::RotateLeft,
        MoveCommand::RotateRight,
        MoveCommand::MoveLeft,
        MoveCommand::MoveRight,
        MoveCommand::Drop,
        MoveCommand::Down,
    ];

    /// Parse a move from its camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_client_types::MoveCommand;
    ///
    /// assert_eq!(MoveCommand::from_str("drop"), Some(MoveCommand::Drop));
    /// assert_eq!(MoveCommand::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoveCommand::RotateLeft => "rotateLeft",
            MoveCommand::RotateRight => "rotateRight",
            MoveCommand::MoveLeft => "moveLeft",
            MoveCommand::MoveRight => "moveRight",
            MoveCommand::Drop => "drop",
            MoveCommand::Down => "down",
        }
    }
}

/// A terminal cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// A rectangle in terminal cells.
///
/// The border is drawn on the edges at `x`, `x + width`, `y` and `y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Fixed screen geometry for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub board_origin: Point,
    pub preview_origin: Point,
    pub border: Rect,
    pub board_width: u16,
    pub board_height: u16,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            board_origin: Point::new(2, 10),
            preview_origin: Point::new(15, 6),
            border: Rect::new(0, 0, 35, 30),
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
        }
    }
}

impl Geometry {
    pub fn with_board_size(mut self, width: u16, height: u16) -> Self {
        self.board_width = width;
        self.board_height = height;
        self
    }

    /// Whether the board's columns end left of the border's right edge.
    pub fn board_fits_width(&self) -> bool {
        let right = self.border.x.saturating_add(self.border.width);
        self.board_width
            .checked_mul(CELL_COLUMNS)
            .and_then(|w| w.checked_add(self.board_origin.x))
            .is_some_and(|end| self.board_width > 0 && end <= right)
    }

    /// Whether the board's rows end above the border's bottom edge.
    pub fn board_fits_height(&self) -> bool {
        let bottom = self.border.y.saturating_add(self.border.height);
        self.board_origin
            .y
            .checked_add(self.board_height)
            .is_some_and(|end| self.board_height > 0 && end <= bottom)
    }

    pub fn contains_board(&self, p: &Pixel) -> bool {
        p.x < self.board_width && p.y < self.board_height
    }

    pub fn contains_preview(&self, p: &Pixel) -> bool {
        p.x < PREVIEW_SIZE && p.y < PREVIEW_SIZE
    }
}

/// Fixed text positions.
pub mod text {
    use super::Point;

    pub const TITLE: &str = "tetris://";
    pub const GAME_OVER: &str = "GAME OVER, PRESS A KEY";
    pub const CONNECTION_LOST: &str = "CONNECTION LOST, PRESS A KEY";
    pub const NEXT_PIECE: &str = "next piece:";

    pub const GAME_OVER_AT: Point = Point::new(2, 1);
    pub const TITLE_AT: Point = Point::new(2, 2);
    pub const PLAYER_AT: Point = Point::new(2, 3);
    pub const PIECES_AT: Point = Point::new(2, 4);
    pub const LINES_AT: Point = Point::new(2, 5);
    pub const NEXT_PIECE_AT: Point = Point::new(2, 6);
}
