//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no I/O, making them usable in any context
//! (session logic, record persistence, terminal rendering).
//!
//! # Board Dimensions
//!
//! Boards are square, N×N, with N even so every card has a partner:
//!
//! - **Supported sizes**: 2, 4, 6, 8, 10, 12, 16
//! - **Total cards**: N²
//! - **Pairs**: N² / 2
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `MATCH_RESOLVE_MS` | 400 | Delay before a matching pair is marked matched |
//! | `MISMATCH_RESOLVE_MS` | 700 | Delay before a mismatched pair flips back |
//! | `COMPLETION_NOTICE_MS` | 200 | Delay between the final match and the completion notice |
//!
//! # Examples
//!
//! ```
//! use tui_memory_types::{BestRecord, GameAction, GridSize};
//!
//! let size = GridSize::try_from(4u8).unwrap();
//! assert_eq!(size.total_cards(), 16);
//! assert_eq!(size.pairs_total(), 8);
//!
//! // Odd sizes can never be paired up.
//! assert!(GridSize::try_from(5u8).is_err());
//!
//! // Lower time wins, moves break ties.
//! let fast = BestRecord::new(125, 20);
//! let slow = BestRecord::new(130, 10);
//! assert!(fast.is_better_than(&slow));
//!
//! assert_eq!(GameAction::Shuffle.as_str(), "shuffle");
//! ```

use std::fmt;

use thiserror::Error;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Visual pause before a matching pair is marked matched.
pub const MATCH_RESOLVE_MS: u32 = 400;

/// Visual pause before a mismatched pair flips back face down.
pub const MISMATCH_RESOLVE_MS: u32 = 700;

/// Pause between the final match and the completion notice.
pub const COMPLETION_NOTICE_MS: u32 = 200;

/// Board dimensions offered by the size selector.
pub const SUPPORTED_GRID_SIZES: [u8; 7] = [2, 4, 6, 8, 10, 12, 16];

/// Grid size used when nothing else is configured.
pub const DEFAULT_GRID_SIZE: u8 = 4;

/// Largest grid that still uses emoji faces; bigger boards fall back to colors.
pub const DEFAULT_EMOJI_MAX_GRID: u8 = 8;

/// Emoji faces, indexed by face id (wrapping when a board needs more).
///
/// Every glyph is a single code point that terminals draw two columns wide.
pub const EMOJI_PALETTE: [char; 59] = [
    '🐶', '🐱', '🦊', '🐻', '🐼', '🐨', '🐯', '🦁', '🐮', '🐷', '🐸', '🐵', '🐔', '🐧', '🐦',
    '🦉', '🦄', '🐝', '🐛', '🦋', '🐌', '🐢', '🐍', '🐙', '🦀', '🦞', '🦑', '🦐', '🌵', '🌸',
    '🌞', '⭐', '🍎', '🍌', '🍇', '🍓', '🍒', '🍉', '🍍', '🍔', '🍕', '🍣', '🍩', '🍪', '☕',
    '🍺', '⚽', '🎲', '🎯', '🎵', '🎮', '🚗', '🚁', '🚀', '🛸', '🏰', '🎁', '🎈', '🎭',
];


/// Rejected grid dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridSizeError {
    #[error("grid size {0} is odd; cards must pair up")]
    Odd(u8),
    #[error("grid size {0} is not supported")]
    Unsupported(u8),
}

/// Board dimension N of an N×N board.
///
/// Only values from [`SUPPORTED_GRID_SIZES`] can be constructed, so every
/// `GridSize` is even and at least 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridSize(u8);

impl GridSize {
    pub fn n(self) -> u8 {
        self.0
    }

    pub fn total_cards(self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }

    pub fn pairs_total(self) -> usize {
        self.total_cards() / 2
    }

    /// Next larger supported size (saturates at the largest).
    pub fn next(self) -> Self {
        SUPPORTED_GRID_SIZES
            .iter()
            .copied()
            .find(|&n| n > self.0)
            .map(Self)
            .unwrap_or(self)
    }

    /// Next smaller supported size (saturates at the smallest).
    pub fn prev(self) -> Self {
        SUPPORTED_GRID_SIZES
            .iter()
            .rev()
            .copied()
            .find(|&n| n < self.0)
            .map(Self)
            .unwrap_or(self)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(DEFAULT_GRID_SIZE)
    }
}

impl TryFrom<u8> for GridSize {
    type Error = GridSizeError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        if n % 2 != 0 {
            return Err(GridSizeError::Odd(n));
        }
        if !SUPPORTED_GRID_SIZES.contains(&n) {
            return Err(GridSizeError::Unsupported(n));
        }
        Ok(Self(n))
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

/// HSL color with hue in degrees and saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl Hsl {
    pub const fn new(h: u16, s: u8, l: u8) -> Self {
        Self { h, s, l }
    }

    /// Convert to 8-bit RGB channels.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = (self.h % 360) as f32 / 60.0;
        let s = self.s.min(100) as f32 / 100.0;
        let l = self.l.min(100) as f32 / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({} {}% {}%)", self.h, self.s, self.l)
    }
}

/// How faces are drawn for a whole deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceStyle {
    Emoji,
    Color,
}

impl FaceStyle {
    /// Pick the style for a board.
    ///
    /// Emoji is only honored up to `emoji_max_grid`; larger boards always
    /// get colors.
    pub fn select(use_emoji: bool, size: GridSize, emoji_max_grid: u8) -> Self {
        if use_emoji && size.n() <= emoji_max_grid {
            FaceStyle::Emoji
        } else {
            FaceStyle::Color
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceStyle::Emoji => "emoji",
            FaceStyle::Color => "color",
        }
    }
}

/// Visible value of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceValue {
    Emoji(char),
    Color(Hsl),
}

/// A card face. Two faces with the same `id` form a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    pub id: u32,
    pub value: FaceValue,
}

impl Face {
    pub fn style(&self) -> FaceStyle {
        match self.value {
            FaceValue::Emoji(_) => FaceStyle::Emoji,
            FaceValue::Color(_) => FaceStyle::Color,
        }
    }

    /// Pairs are decided by id, never by value or position.
    pub fn pairs_with(&self, other: &Face) -> bool {
        self.id == other.id
    }
}

/// Best completed run for one grid size.
///
/// Field order makes the derived ordering lexicographic: time first, then
/// moves. Smaller is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BestRecord {
    /// Elapsed time in tenths of a second.
    pub time_tenths: u32,
    pub moves: u32,
}

impl BestRecord {
    pub const fn new(time_tenths: u32, moves: u32) -> Self {
        Self { time_tenths, moves }
    }

    pub fn is_better_than(&self, other: &BestRecord) -> bool {
        self < other
    }

    /// Time as a one-decimal seconds string, e.g. `"12.3"`.
    pub fn time_display(&self) -> String {
        format_tenths(self.time_tenths)
    }
}

/// Format tenths of a second as seconds with one decimal.
pub fn format_tenths(tenths: u32) -> String {
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Where a session is in its pick cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// No card picked.
    #[default]
    Idle,
    /// One card flipped, waiting for the second.
    OnePicked,
    /// Two cards flipped, outcome pending.
    Resolving,
    /// All pairs found.
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::OnePicked => "onePicked",
            Phase::Resolving => "resolving",
            Phase::Complete => "complete",
        }
    }
}

/// Game actions that front-ends apply to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Start a fresh session with the configured size.
    Start,
    /// Re-deal the board (same as start).
    Shuffle,
    /// Flip the card at the given board index.
    Flip(usize),
    /// Select a grid size for the next start.
    SetGridSize(GridSize),
    /// Toggle the emoji preference for the next start.
    ToggleEmoji,
}

impl GameAction {
    /// Stable name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Start => "start",
            GameAction::Shuffle => "shuffle",
            GameAction::Flip(_) => "flip",
            GameAction::SetGridSize(_) => "setGridSize",
            GameAction::ToggleEmoji => "toggleEmoji",
        }
    }
}
