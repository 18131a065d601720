//! Animator trait and the built-in fractal animation.
//!
//! An animator owns its own parameters and elapsed time. The engine clears
//! the frame, then hands it to [`Animator::step`] once per frame.

mod mandelbrot;

use crate::buffer::FrameBuffer;
use std::time::Duration;

pub use mandelbrot::{glyph_index, zoom_ease, MandelbrotAnimator, MandelbrotConfig, DEFAULT_PALETTE};

/// Per-frame state update that draws into a [`FrameBuffer`].
pub trait Animator {
    /// Called once before the first frame with the buffer the animator will
    /// draw into.
    fn init(&mut self, buffer: &FrameBuffer);

    /// Advance by `delta` and draw the new frame.
    ///
    /// The buffer has just been cleared.
    fn step(&mut self, delta: Duration, buffer: &mut FrameBuffer);
}

impl<A: Animator + ?Sized> Animator for Box<A> {
    fn init(&mut self, buffer: &FrameBuffer) {
        (**self).init(buffer);
    }

    fn step(&mut self, delta: Duration, buffer: &mut FrameBuffer) {
        (**self).step(delta, buffer);
    }
}
