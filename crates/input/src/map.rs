//! Key mapping from terminal events to game commands.

use crate::cursor::{Cursor, Direction};
use crate::types::{GameAction, GridSize};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key asks for, before board context is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    /// Flip the card under the cursor.
    Flip,
    Restart,
    Shuffle,
    SizeUp,
    SizeDown,
    ToggleEmoji,
}

impl Command {
    /// Resolve against the cursor and the size selected for the next start.
    /// Cursor moves return `None` after updating `cursor`.
    pub fn into_action(
        self,
        cursor: &mut Cursor,
        board: GridSize,
        selected: GridSize,
    ) -> Option<GameAction> {
        match self {
            Command::Move(dir) => {
                cursor.step(dir, board);
                None
            }
            Command::Flip => Some(GameAction::Flip(cursor.index(board))),
            Command::Restart => Some(GameAction::Start),
            Command::Shuffle => Some(GameAction::Shuffle),
            Command::SizeUp => Some(GameAction::SetGridSize(selected.next())),
            Command::SizeDown => Some(GameAction::SetGridSize(selected.prev())),
            Command::ToggleEmoji => Some(GameAction::ToggleEmoji),
        }
    }
}

/// Map keyboard input to commands. Key releases are ignored.
pub fn handle_key_event(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Command::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Command::Move(Direction::Right))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Command::Move(Direction::Down))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Command::Move(Direction::Up))
        }

        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Flip),

        // Board
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Shuffle),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Command::SizeUp),
        KeyCode::Char('-') | KeyCode::Char('_') => Some(Command::SizeDown),
        KeyCode::Char('e') | KeyCode::Char('E') => Some(Command::ToggleEmoji),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
