//! Keyboard selection over an N x N board.

use crate::types::GridSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Highlighted card position, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: u8,
    pub col: u8,
}

impl Cursor {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Move one cell, wrapping around the edges of the board.
    pub fn step(&mut self, dir: Direction, size: GridSize) {
        let n = size.n();
        match dir {
            Direction::Up => self.row = if self.row == 0 { n - 1 } else { self.row - 1 },
            Direction::Down => self.row = (self.row + 1) % n,
            Direction::Left => self.col = if self.col == 0 { n - 1 } else { self.col - 1 },
            Direction::Right => self.col = (self.col + 1) % n,
        }
    }

    /// Pull the cursor back inside a (possibly smaller) board.
    pub fn clamp(&mut self, size: GridSize) {
        let max = size.n() - 1;
        self.row = self.row.min(max);
        self.col = self.col.min(max);
    }

    /// Board index under the cursor.
    pub fn index(&self, size: GridSize) -> usize {
        self.row as usize * size.n() as usize + self.col as usize
    }

    /// Cursor for a board index (mouse clicks).
    pub fn from_index(index: usize, size: GridSize) -> Self {
        let n = size.n() as usize;
        Self {
            row: (index / n) as u8,
            col: (index % n) as u8,
        }
    }
}
