//! Deck module - face generation and shuffling
//!
//! Builds `pairs_total` distinct faces, duplicates each into two cards and
//! shuffles the result with Fisher-Yates. All randomness comes from the
//! caller's `rand::Rng`, so a seeded generator reproduces the same deck.

use rand::Rng;
use thiserror::Error;

use crate::types::{Face, FaceStyle, FaceValue, GridSize, Hsl, EMOJI_PALETTE};

/// A positional slot on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub face: Face,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    /// A face-down, unmatched card.
    pub fn new(face: Face) -> Self {
        Self {
            face,
            flipped: false,
            matched: false,
        }
    }

    /// Whether the face should currently be visible.
    pub fn face_up(&self) -> bool {
        self.flipped || self.matched
    }
}

/// A deck that does not fit its board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck has {actual} cards, board {size} needs {expected}")]
    WrongLength {
        size: GridSize,
        expected: usize,
        actual: usize,
    },
    #[error("face id {id} appears {count} times, expected exactly 2")]
    Unpaired { id: u32, count: usize },
}

/// Random color: any hue, saturation 60-79%, lightness 45-54%.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Hsl {
    let h = rng.random_range(0..360u16);
    let s = 60 + rng.random_range(0..20u8);
    let l = 45 + rng.random_range(0..10u8);
    Hsl::new(h, s, l)
}

/// Generate `pairs_total` faces with ids `0..pairs_total`.
///
/// Emoji faces take the palette entry at their id (wrapping); color faces
/// each get a fresh random color.
pub fn generate_faces<R: Rng + ?Sized>(
    pairs_total: usize,
    style: FaceStyle,
    rng: &mut R,
) -> Vec<Face> {
    (0..pairs_total)
        .map(|i| {
            let value = match style {
                FaceStyle::Emoji => FaceValue::Emoji(EMOJI_PALETTE[i % EMOJI_PALETTE.len()]),
                FaceStyle::Color => FaceValue::Color(random_color(rng)),
            };
            Face {
                id: i as u32,
                value,
            }
        })
        .collect()
}

/// Shuffle a slice using Fisher-Yates.
pub fn shuffle<T, R: Rng + ?Sized>(slice: &mut [T], rng: &mut R) {
    for i in (1..slice.len()).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// Build a shuffled deck of `2 * pairs_total` face-down cards.
pub fn build_deck<R: Rng + ?Sized>(pairs_total: usize, style: FaceStyle, rng: &mut R) -> Vec<Card> {
    let faces = generate_faces(pairs_total, style, rng);

    let mut deck = Vec::with_capacity(pairs_total * 2);
    for face in faces {
        deck.push(Card::new(face));
        deck.push(Card::new(face));
    }

    shuffle(&mut deck, rng);
    deck
}

/// Check that `cards` fill a board of `size` with exactly two cards per id.
pub fn validate_deck(size: GridSize, cards: &[Card]) -> Result<(), DeckError> {
    let expected = size.total_cards();
    if cards.len() != expected {
        return Err(DeckError::WrongLength {
            size,
            expected,
            actual: cards.len(),
        });
    }

    let mut counts = vec![0usize; size.pairs_total()];
    for card in cards {
        let id = card.face.id;
        match counts.get_mut(id as usize) {
            Some(count) => *count += 1,
            None => return Err(DeckError::Unpaired { id, count: 1 }),
        }
    }

    if let Some((id, &count)) = counts.iter().enumerate().find(|(_, &c)| c != 2) {
        return Err(DeckError::Unpaired {
            id: id as u32,
            count,
        });
    }

    Ok(())
}
