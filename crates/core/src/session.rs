//! Session module - the pick/match state machine
//!
//! A [`Session`] owns one dealt board and everything that changes while it is
//! played: flipped/matched flags, the two pick slots, move and found counters,
//! the input lock and the stopwatch.
//!
//! Resolving a pair is split in two steps. [`Session::pick`] flips the second
//! card, locks input and hands back a [`PendingResolution`]; the caller applies
//! it with [`Session::resolve`] once the visual delay has passed. Every
//! pending resolution carries the session's generation, so one created for an
//! earlier deal is recognised as stale and dropped.

use rand::Rng;

use crate::deck::{build_deck, validate_deck, Card, DeckError};
use crate::snapshot::{CardSnapshot, GameSnapshot};
use crate::timer::Stopwatch;
use crate::types::{FaceStyle, GridSize, Phase, MATCH_RESOLVE_MS, MISMATCH_RESOLVE_MS};

/// Why a pick was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickRejection {
    OutOfRange,
    Locked,
    AlreadyFlipped,
    AlreadyMatched,
    Complete,
}

/// Result of [`Session::pick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Nothing changed.
    Ignored(PickRejection),
    /// First card of a pair flipped.
    First,
    /// Second card flipped; input is locked until the resolution is applied.
    Second(PendingResolution),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Match,
    Mismatch,
}

/// A decided but not yet applied pair outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    pub generation: u32,
    pub first: usize,
    pub second: usize,
    pub outcome: MatchOutcome,
}

impl PendingResolution {
    /// How long the pair stays visible before the outcome is applied.
    pub fn delay_ms(&self) -> u32 {
        match self.outcome {
            MatchOutcome::Match => MATCH_RESOLVE_MS,
            MatchOutcome::Mismatch => MISMATCH_RESOLVE_MS,
        }
    }
}

/// Final numbers of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedRun {
    pub size: GridSize,
    pub time_tenths: u32,
    pub moves: u32,
}

/// Result of [`Session::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The resolution belongs to another deal or was already applied.
    Stale,
    /// Pair kept face up; `found` is the new found count.
    Matched { found: u32 },
    /// Pair turned back face down.
    Mismatched,
    /// The last pair was found.
    Completed(CompletedRun),
}

#[derive(Debug, Clone)]
pub struct Session {
    size: GridSize,
    cards: Vec<Card>,
    first: Option<usize>,
    second: Option<usize>,
    moves: u32,
    found: u32,
    locked: bool,
    phase: Phase,
    /// Identifies this deal; bumped by the owner on every start.
    generation: u32,
    stopwatch: Stopwatch,
}

impl Session {
    /// Deal a fresh shuffled board.
    pub fn deal<R: Rng + ?Sized>(
        size: GridSize,
        style: FaceStyle,
        generation: u32,
        rng: &mut R,
    ) -> Self {
        let cards = build_deck(size.pairs_total(), style, rng);
        Self::from_cards(size, cards, generation)
    }

    /// Start a session over a prepared deck.
    pub fn with_cards(size: GridSize, cards: Vec<Card>, generation: u32) -> Result<Self, DeckError> {
        validate_deck(size, &cards)?;
        Ok(Self::from_cards(size, cards, generation))
    }

    fn from_cards(size: GridSize, mut cards: Vec<Card>, generation: u32) -> Self {
        for card in &mut cards {
            card.flipped = false;
            card.matched = false;
        }

        Self {
            size,
            cards,
            first: None,
            second: None,
            moves: 0,
            found: 0,
            locked: false,
            phase: Phase::Idle,
            generation,
            stopwatch: Stopwatch::new(),
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn found(&self) -> u32 {
        self.found
    }

    pub fn pairs_total(&self) -> u32 {
        self.size.pairs_total() as u32
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    /// Indices of the currently picked, unresolved cards.
    pub fn picks(&self) -> (Option<usize>, Option<usize>) {
        (self.first, self.second)
    }

    /// Flip the card at `index` if the rules allow it.
    pub fn pick(&mut self, index: usize) -> PickOutcome {
        if self.phase == Phase::Complete {
            return PickOutcome::Ignored(PickRejection::Complete);
        }
        if self.locked {
            return PickOutcome::Ignored(PickRejection::Locked);
        }

        let Some(card) = self.cards.get_mut(index) else {
            return PickOutcome::Ignored(PickRejection::OutOfRange);
        };
        if card.matched {
            return PickOutcome::Ignored(PickRejection::AlreadyMatched);
        }
        if card.flipped {
            return PickOutcome::Ignored(PickRejection::AlreadyFlipped);
        }

        card.flipped = true;

        let Some(first) = self.first else {
            self.first = Some(index);
            self.phase = Phase::OnePicked;
            // The clock runs from the first pick of the session, not from the deal.
            if self.moves == 0 && self.found == 0 && !self.stopwatch.is_running() {
                self.stopwatch.start();
            }
            return PickOutcome::First;
        };

        self.second = Some(index);
        self.moves += 1;
        self.locked = true;
        self.phase = Phase::Resolving;

        let outcome = if self.cards[first].face.pairs_with(&self.cards[index].face) {
            MatchOutcome::Match
        } else {
            MatchOutcome::Mismatch
        };

        PickOutcome::Second(PendingResolution {
            generation: self.generation,
            first,
            second: index,
            outcome,
        })
    }

    /// Apply a pending pair outcome.
    pub fn resolve(&mut self, pending: &PendingResolution) -> Resolution {
        if pending.generation != self.generation
            || self.phase != Phase::Resolving
            || self.first != Some(pending.first)
            || self.second != Some(pending.second)
        {
            return Resolution::Stale;
        }

        let (a, b) = (pending.first, pending.second);
        let resolution = match pending.outcome {
            MatchOutcome::Match => {
                self.cards[a].matched = true;
                self.cards[b].matched = true;
                self.found += 1;
                Resolution::Matched { found: self.found }
            }
            MatchOutcome::Mismatch => {
                self.cards[a].flipped = false;
                self.cards[b].flipped = false;
                Resolution::Mismatched
            }
        };

        self.first = None;
        self.second = None;
        self.locked = false;

        if self.found == self.pairs_total() {
            self.stopwatch.stop();
            self.phase = Phase::Complete;
            return Resolution::Completed(CompletedRun {
                size: self.size,
                time_tenths: self.stopwatch.elapsed_tenths(),
                moves: self.moves,
            });
        }

        self.phase = Phase::Idle;
        resolution
    }

    /// Advance the stopwatch. Returns true when the displayed time changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.stopwatch.advance(elapsed_ms)
    }

    /// Write the observable state into `out`, reusing its card buffer.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.size = self.size;
        out.selected_size = self.size;
        out.generation = self.generation;
        out.phase = self.phase;
        out.locked = self.locked;
        out.moves = self.moves;
        out.found = self.found;
        out.pairs_total = self.pairs_total();
        out.elapsed_tenths = self.stopwatch.elapsed_tenths();
        out.timer_running = self.stopwatch.is_running();

        out.cards.clear();
        out.cards.extend(self.cards.iter().map(CardSnapshot::from));
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
