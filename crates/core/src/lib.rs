//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the rules of the memory game: dealing, picking,
//! matching and timing. It has **no dependencies** on terminals, files or
//! clocks, making it:
//!
//! - **Deterministic**: the same seeded RNG deals the same board
//! - **Testable**: every rule is exercised without a renderer
//! - **Portable**: usable from a terminal, a GUI or a headless harness
//!
//! # Module Structure
//!
//! - [`deck`]: face generation and Fisher-Yates shuffling
//! - [`session`]: the pick/match state machine for one dealt board
//! - [`timer`]: tick-driven stopwatch
//! - [`snapshot`]: observable state handed to renderers
//!
//! # Game Rules
//!
//! - Cards are dealt face down, two per face id
//! - The player flips one card, then a second one; the second flip counts a move
//! - A pair stays visible for 400ms (match) or 700ms (mismatch) before it is
//!   applied, and no third card can be flipped meanwhile
//! - The clock starts at the first flip and stops when the last pair is found
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use tui_memory_core::{PickOutcome, Resolution, Session};
//! use tui_memory_types::{FaceStyle, GridSize};
//!
//! let mut rng = StdRng::seed_from_u64(12345);
//! let size = GridSize::try_from(2u8).unwrap();
//! let mut session = Session::deal(size, FaceStyle::Emoji, 1, &mut rng);
//!
//! assert_eq!(session.pick(0), PickOutcome::First);
//! if let PickOutcome::Second(pending) = session.pick(1) {
//!     // The caller waits `pending.delay_ms()` before applying it.
//!     let resolution = session.resolve(&pending);
//!     assert_ne!(resolution, Resolution::Stale);
//! }
//! assert_eq!(session.moves(), 1);
//! ```
//!
//! # Timing
//!
//! Nothing here reads a clock. Call [`Session::tick`](session::Session::tick)
//! every frame with the elapsed milliseconds.

pub mod deck;
pub mod session;
pub mod snapshot;
pub mod timer;

pub use tui_memory_types as types;

// Re-export commonly used types for convenience
pub use deck::{build_deck, generate_faces, shuffle, Card, DeckError};
pub use session::{
    CompletedRun, MatchOutcome, PendingResolution, PickOutcome, PickRejection, Resolution, Session,
};
pub use snapshot::{CardSnapshot, GameSnapshot};
pub use timer::Stopwatch;
