//! Key mapping from terminal events to move commands.

use crate::types::MoveCommand;
use crossterm::event::{KeyCode, KeyEvent};

/// Map a key press to a move. Unmapped keys yield `None`.
pub fn move_for_key(key: KeyEvent) -> Option<MoveCommand> {
    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(MoveCommand::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(MoveCommand::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(MoveCommand::Down),
        KeyCode::Char(' ') => Some(MoveCommand::Drop),

        KeyCode::Char('z') | KeyCode::Char('q') => Some(MoveCommand::RotateLeft),
        KeyCode::Up | KeyCode::Char('x') | KeyCode::Char('w') => Some(MoveCommand::RotateRight),

        _ => None,
    }
}
