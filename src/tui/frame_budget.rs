//! Frame pacing for the render loop.
//!
//! The loop draws once, then waits for input for whatever is left of the
//! frame. A slow frame simply gets a zero wait.

use std::time::{Duration, Instant};

/// Per-frame time budget derived from a target frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBudget {
    frame: Duration,
}

impl FrameBudget {
    /// Budget for `fps` frames per second. Zero is treated as one.
    #[must_use]
    pub fn from_fps(fps: u32) -> Self {
        Self {
            frame: Duration::from_secs(1) / fps.max(1),
        }
    }

    /// Length of one frame.
    #[must_use]
    pub const fn frame(&self) -> Duration {
        self.frame
    }

    /// Time left in a frame that began at `start`.
    #[must_use]
    pub fn remaining(&self, start: Instant) -> Duration {
        self.remaining_after(start.elapsed())
    }

    /// Time left once `elapsed` of the frame has been spent.
    #[must_use]
    pub const fn remaining_after(&self, elapsed: Duration) -> Duration {
        self.frame.saturating_sub(elapsed)
    }
}

impl Default for FrameBudget {
    fn default() -> Self {
        Self::from_fps(60)
    }
}
