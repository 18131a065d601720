//! Frame timing statistics.

use std::time::Duration;

/// Number of recent frames averaged for the FPS readout.
pub const STATS_WINDOW: usize = 20;

/// Rolling frame-time statistics.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    /// Ring of recent frame times in seconds.
    window: [f64; STATS_WINDOW],
    /// Next slot to overwrite.
    cursor: usize,
    /// Filled slots (saturates at `STATS_WINDOW`).
    samples: usize,
    /// Frames recorded.
    frames: u64,
    /// Sum of every recorded frame time.
    elapsed: Duration,
}

impl FrameStats {
    /// Empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the time between two frame starts.
    pub fn record(&mut self, frame_time: Duration) {
        self.window[self.cursor] = frame_time.as_secs_f64();
        self.cursor = (self.cursor + 1) % STATS_WINDOW;
        self.samples = (self.samples + 1).min(STATS_WINDOW);
        self.frames += 1;
        self.elapsed += frame_time;
    }

    /// Frames recorded so far.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Total recorded time.
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Average frames per second over the recent window, or `0.0` before
    /// any time has been recorded.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f64 {
        let total: f64 = self.window[..self.samples].iter().sum();
        if total > 0.0 {
            self.samples as f64 / total
        } else {
            0.0
        }
    }
}
