//! TUI Memory (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as
//! `tui_memory::{core,engine,input,records,term,types}` and adds the
//! runtime [`config`], [`logging`] and frame [`clock`] used by the binary.

pub mod clock;
pub mod config;
pub mod logging;

pub use tui_memory_core as core;
pub use tui_memory_engine as engine;
pub use tui_memory_input as input;
pub use tui_memory_records as records;
pub use tui_memory_term as term;
pub use tui_memory_types as types;

pub use config::{AppConfig, ConfigError};
