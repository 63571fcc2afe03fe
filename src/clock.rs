//! Wall-clock to game-time bridge for the main loop.
//!
//! The loop polls for input with a timeout and then asks the clock whether
//! a frame is due. A due frame reports every whole millisecond that passed
//! since the last one, however late it fires, and keeps the sub-millisecond
//! remainder for the next frame.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    frame: Duration,
    /// Wall time already credited to the game.
    credited: Instant,
}

impl FrameClock {
    pub fn new(frame: Duration) -> Self {
        Self::starting_at(Instant::now(), frame)
    }

    pub fn starting_at(now: Instant, frame: Duration) -> Self {
        Self {
            frame,
            credited: now,
        }
    }

    /// How long the loop may block waiting for input.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.frame
            .checked_sub(now.saturating_duration_since(self.credited))
            .unwrap_or(Duration::ZERO)
    }

    /// Milliseconds to feed the game, or `None` if a frame is not due yet.
    pub fn due(&mut self, now: Instant) -> Option<u32> {
        let elapsed = now.saturating_duration_since(self.credited);
        if elapsed < self.frame {
            return None;
        }
        let ms = u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX);
        self.credited += Duration::from_millis(ms as u64);
        Some(ms)
    }
}
