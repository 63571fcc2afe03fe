//! Game controller module - drives sessions from front-end events
//!
//! The engine sits between the pure rules in `core` and whatever front-end
//! renders the game. It owns the current session, deals new boards,
//! schedules delayed resolutions, stores best records and emits completion
//! notices.
//!
//! # Example
//!
//! ```
//! use tui_memory_engine::{ControllerConfig, GameController};
//! use tui_memory_records::{BestRecords, MemoryStore};
//! use tui_memory_types::GameAction;
//!
//! let records = BestRecords::new(MemoryStore::new());
//! let mut game = GameController::with_seed(ControllerConfig::default(), records, 7);
//!
//! game.apply_action(GameAction::Flip(0));
//! game.apply_action(GameAction::Flip(1));
//! game.tick(1000);
//!
//! assert_eq!(game.snapshot().moves, 1);
//! ```

pub mod controller;

pub use tui_memory_core as core;
pub use tui_memory_records as records;
pub use tui_memory_types as types;

pub use controller::{CompletionNotice, ControllerConfig, GameController};
