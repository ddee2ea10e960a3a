//! Intro Tagline
//!
//! A short sequence of taglines shown under the title after startup, one
//! per interval, stopping on the last one.

use std::time::Duration;

/// Taglines in display order
pub const TAGLINES: [&str; 3] = [
    "Crafted. Clean. Connected.",
    "Minimal. Smart. Fast.",
    "Built with ⚡ by Nava | 2025",
];

/// Frame-driven tagline sequencer
#[derive(Clone, Debug)]
pub struct TaglineRotator {
    interval: Duration,
    elapsed: Duration,
    shown: usize,
}

impl TaglineRotator {
    /// Create a rotator that advances every `interval`
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            shown: 0,
        }
    }

    /// Whether every tagline has been shown
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.shown >= TAGLINES.len()
    }

    /// Advance the clock; returns the newest tagline due, if any
    ///
    /// A large `delta` that spans several intervals yields only the latest.
    pub fn update(&mut self, delta: Duration) -> Option<&'static str> {
        if self.is_finished() {
            return None;
        }

        self.elapsed += delta;
        let mut due = None;
        while !self.is_finished() && self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            due = Some(TAGLINES[self.shown]);
            self.shown += 1;
        }
        due
    }
}
