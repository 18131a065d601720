//! Frame pacing: Hold a fixed frame rate with a coarse sleep followed by a
//! short spin.
//!
//! OS sleeps overshoot by up to a scheduler quantum, so the pacer sleeps
//! until `margin` before the frame boundary and busy-waits the rest.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Default time left to spin after the coarse sleep.
pub const DEFAULT_SPIN_MARGIN: Duration = Duration::from_micros(500);

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    /// Time since the clock's origin.
    fn now(&self) -> Duration;

    /// Suspend the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    #[inline]
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Deterministic clock for tests and offline rendering.
///
/// Time only moves when slept on, advanced explicitly, or read: every
/// [`now`](Clock::now) call returns the current time and then moves it
/// forward by `tick`, so spin loops terminate.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    tick: Duration,
    slept: Cell<Duration>,
}

impl ManualClock {
    /// Clock starting at zero that advances `tick` per reading.
    pub fn new(tick: Duration) -> Self {
        Self {
            now: Cell::new(Duration::ZERO),
            tick,
            slept: Cell::new(Duration::ZERO),
        }
    }

    /// Move time forward without sleeping.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Current time, without ticking.
    pub fn peek(&self) -> Duration {
        self.now.get()
    }

    /// Total time passed to `sleep`.
    pub fn slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.tick);
        now
    }

    fn sleep(&self, duration: Duration) {
        self.slept.set(self.slept.get() + duration);
        self.advance(duration);
    }
}

/// Keeps successive frames `1 / target_fps` apart.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    margin: Duration,
    frame_start: Duration,
}

impl FramePacer {
    /// Pacer for `target_fps` frames per second.
    ///
    /// `target_fps` must be non-zero; the engine validates this.
    pub fn new(target_fps: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            margin: DEFAULT_SPIN_MARGIN,
            frame_start: Duration::ZERO,
        }
    }

    /// Set how long before the boundary the coarse sleep ends.
    #[must_use]
    pub const fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    /// Time between frame starts.
    #[inline]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Spin margin.
    #[inline]
    pub const fn margin(&self) -> Duration {
        self.margin
    }

    /// Start time of the current frame.
    #[inline]
    pub const fn frame_start(&self) -> Duration {
        self.frame_start
    }

    /// Mark the start of the first frame.
    pub fn start<C: Clock + ?Sized>(&mut self, clock: &C) {
        self.frame_start = clock.now();
    }

    /// Block until the next frame boundary and make it the new frame start.
    ///
    /// A frame that overran by less than one interval keeps the original
    /// cadence so the following frames catch up. An overrun of a whole
    /// interval or more restarts the cadence from now.
    pub fn hold<C: Clock + ?Sized>(&mut self, clock: &C) -> Duration {
        let target = self.frame_start + self.interval;
        let now = clock.now();

        if now < target {
            let remaining = target - now;
            if remaining > self.margin {
                clock.sleep(remaining - self.margin);
            }
            while clock.now() < target {
                std::hint::spin_loop();
            }
            self.frame_start = target;
        } else if now - target >= self.interval {
            tracing::debug!(behind = ?(now - target), "frame pacer resynchronised");
            self.frame_start = now;
        } else {
            self.frame_start = target;
        }

        self.frame_start
    }
}
