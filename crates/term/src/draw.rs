//! Drawing helpers on top of a [`Surface`].
//!
//! Stateless: every function writes cells and leaves flushing to the caller.

use crate::surface::Surface;
use crate::types::{Color, Geometry, Pixel, Point, Rect, CELL_COLUMNS, PREVIEW_SIZE};

pub const HORIZONTAL: char = '═';
pub const VERTICAL: char = '║';
pub const TOP_LEFT: char = '╔';
pub const TOP_RIGHT: char = '╗';
pub const BOTTOM_LEFT: char = '╚';
pub const BOTTOM_RIGHT: char = '╝';

/// Draw a double-line box with corners at `(x, y)` and `(x + width, y + height)`.
pub fn draw_border<S: Surface + ?Sized>(surface: &mut S, rect: Rect) {
    let Rect {
        x,
        y,
        width,
        height,
    } = rect;
    let (right, bottom) = (x + width, y + height);
    let d = Color::Default;

    surface.set_cell(x, y, TOP_LEFT, d, d);
    surface.set_cell(right, y, TOP_RIGHT, d, d);
    for cx in x + 1..right {
        surface.set_cell(cx, y, HORIZONTAL, d, d);
        surface.set_cell(cx, bottom, HORIZONTAL, d, d);
    }
    for cy in y + 1..bottom {
        surface.set_cell(x, cy, VERTICAL, d, d);
        surface.set_cell(right, cy, VERTICAL, d, d);
    }
    surface.set_cell(x, bottom, BOTTOM_LEFT, d, d);
    surface.set_cell(right, bottom, BOTTOM_RIGHT, d, d);
}

/// Write `message` left to right starting at `at`, black on `color`.
pub fn write_message<S: Surface + ?Sized>(surface: &mut S, message: &str, at: Point, color: Color) {
    let mut x = at.x;
    for ch in message.chars() {
        surface.set_cell(x, at.y, ch, Color::Black, color);
        x = x.saturating_add(1);
    }
}

/// Fill one double-width logical cell relative to `origin`.
fn fill_cell_pair<S: Surface + ?Sized>(surface: &mut S, origin: Point, p: Pixel) {
    let x = origin.x.saturating_add(CELL_COLUMNS.saturating_mul(p.x));
    let y = origin.y.saturating_add(p.y);
    for dx in 0..CELL_COLUMNS {
        surface.set_cell(x.saturating_add(dx), y, ' ', p.color, p.color);
    }
}

/// Draw a board pixel. Pixels outside the board extent are dropped.
pub fn draw_board_pixel<S: Surface + ?Sized>(surface: &mut S, geometry: &Geometry, p: Pixel) {
    if geometry.contains_board(&p) {
        fill_cell_pair(surface, geometry.board_origin, p);
    }
}

/// Draw a next-piece preview pixel. Pixels outside the 4x4 preview are dropped.
pub fn draw_preview_pixel<S: Surface + ?Sized>(surface: &mut S, geometry: &Geometry, p: Pixel) {
    if geometry.contains_preview(&p) {
        fill_cell_pair(surface, geometry.preview_origin, p);
    }
}

/// Reset every board cell to the background color.
pub fn clear_board<S: Surface + ?Sized>(surface: &mut S, geometry: &Geometry) {
    for x in 0..geometry.board_width {
        for y in 0..geometry.board_height {
            draw_board_pixel(surface, geometry, Pixel::new(x, y, Color::Default));
        }
    }
}

/// Reset every preview cell to the background color.
pub fn clear_preview<S: Surface + ?Sized>(surface: &mut S, geometry: &Geometry) {
    for x in 0..PREVIEW_SIZE {
        for y in 0..PREVIEW_SIZE {
            draw_preview_pixel(surface, geometry, Pixel::new(x, y, Color::Default));
        }
    }
}
