use crate::deck::Card;
use crate::types::{format_tenths, BestRecord, Face, GridSize, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardSnapshot {
    pub face: Face,
    pub flipped: bool,
    pub matched: bool,
}

impl CardSnapshot {
    pub fn face_up(&self) -> bool {
        self.flipped || self.matched
    }
}

impl From<&Card> for CardSnapshot {
    fn from(value: &Card) -> Self {
        Self {
            face: value.face,
            flipped: value.flipped,
            matched: value.matched,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Size of the board being played.
    pub size: GridSize,
    /// Size that the next start will deal (may differ until then).
    pub selected_size: GridSize,
    pub use_emoji: bool,
    pub generation: u32,
    pub phase: Phase,
    pub locked: bool,
    pub cards: Vec<CardSnapshot>,
    pub moves: u32,
    pub found: u32,
    pub pairs_total: u32,
    pub elapsed_tenths: u32,
    pub timer_running: bool,
    pub best: Option<BestRecord>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.size = GridSize::default();
        self.selected_size = GridSize::default();
        self.use_emoji = true;
        self.generation = 0;
        self.phase = Phase::Idle;
        self.locked = false;
        self.cards.clear();
        self.moves = 0;
        self.found = 0;
        self.pairs_total = 0;
        self.elapsed_tenths = 0;
        self.timer_running = false;
        self.best = None;
    }

    /// Elapsed time as shown on the status line, e.g. `"12.3"`.
    pub fn elapsed_display(&self) -> String {
        format_tenths(self.elapsed_tenths)
    }

    /// `"found / total"` progress label.
    pub fn found_display(&self) -> String {
        format!("{} / {}", self.found, self.pairs_total)
    }

    pub fn complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn accepts_picks(&self) -> bool {
        !self.locked && !self.complete()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            size: GridSize::default(),
            selected_size: GridSize::default(),
            use_emoji: true,
            generation: 0,
            phase: Phase::Idle,
            locked: false,
            cards: Vec::new(),
            moves: 0,
            found: 0,
            pairs_total: 0,
            elapsed_tenths: 0,
            timer_running: false,
            best: None,
        };
        s.clear();
        s
    }
}
