//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids
//! widget toolkits and renders into a simple framebuffer that is flushed to
//! the terminal with crossterm.
//!
//! - [`fb`]: cells, styles and a framebuffer aware of double-width glyphs
//! - [`game_view`]: snapshot to framebuffer, plus mouse hit-testing
//! - [`renderer`]: raw-mode terminal output with diff encoding

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_memory_core as core;
pub use tui_memory_types as types;

pub use fb::{text_width, Cell, CellStyle, FrameBuffer, Rgb, CONTINUATION};
pub use game_view::{status_line, BoardLayout, CardLayout, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
