//! Terminal input module (engine-facing).
//!
//! Independent of any rendering code. It maps `crossterm` key events into
//! [`Command`]s and tracks the keyboard [`Cursor`] over the card grid.
//! Commands that need board context (the cursor position, the selected size)
//! become [`crate::types::GameAction`]s through [`Command::into_action`].

pub mod cursor;
pub mod map;

pub use tui_memory_types as types;

pub use cursor::{Cursor, Direction};
pub use map::{handle_key_event, should_quit, Command};
