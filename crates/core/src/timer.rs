//! Session stopwatch driven by fixed-timestep ticks.
//!
//! The stopwatch never reads a clock itself. Front-ends measure real time
//! and feed it in through [`Stopwatch::advance`], which keeps sessions
//! deterministic under test.

use crate::types::format_tenths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stopwatch {
    running: bool,
    elapsed_ms: u64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting. Has no effect if already running.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Freeze the elapsed time.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and clear back to zero.
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_ms = 0;
    }

    /// Add elapsed time if running. Returns true when the displayed value changed.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if !self.running {
            return false;
        }
        let before = self.elapsed_tenths();
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms as u64);
        self.elapsed_tenths() != before
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Elapsed time rounded to tenths of a second.
    pub fn elapsed_tenths(&self) -> u32 {
        ((self.elapsed_ms + 50) / 100).min(u32::MAX as u64) as u32
    }

    /// Elapsed seconds with one decimal, e.g. `"3.4"`.
    pub fn display(&self) -> String {
        format_tenths(self.elapsed_tenths())
    }
}
