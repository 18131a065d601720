//! Zooming, optionally rotating Mandelbrot animation rendered with an ASCII
//! density ramp.

use super::Animator;
use crate::buffer::FrameBuffer;
use crate::error::{Error, Result};
use crate::fractal::sample;
use std::f64::consts::PI;
use std::time::Duration;

/// Glyphs ordered from densest to lightest.
pub const DEFAULT_PALETTE: &str =
    "$@B%8&WM#*oahkbdpqwmZO0QLCJUYXzcvunxrjft/\\|()1{}[]?-_+~<>i!lI;:,\"^`'. ";

/// Parameters of the Mandelbrot animation. Fixed once the animator is built.
#[derive(Debug, Clone, PartialEq)]
pub struct MandelbrotConfig {
    /// Length of one zoom-in/zoom-out cycle in seconds.
    pub period: f64,
    /// Point the zoom converges on, as `(real, imaginary)`.
    pub center: (f64, f64),
    /// Real-axis half-width when fully zoomed out.
    pub zoom_out_half_width: f64,
    /// Real-axis half-width when fully zoomed in.
    pub zoom_in_half_width: f64,
    /// Rotation about the center when fully zoomed in, in degrees.
    pub rotation_min_deg: f64,
    /// Rotation about the center when fully zoomed out, in degrees.
    pub rotation_max_deg: f64,
    /// Height-to-width ratio of a terminal cell.
    pub glyph_aspect: f64,
    /// Escape-time iteration budget.
    pub max_iterations: u32,
    /// Printable ASCII glyphs (space included) from densest to lightest.
    pub palette: String,
}

impl Default for MandelbrotConfig {
    fn default() -> Self {
        Self {
            period: 30.0,
            center: (-0.7457, 0.1127),
            zoom_out_half_width: 2.0,
            zoom_in_half_width: 0.00001,
            rotation_min_deg: 0.0,
            rotation_max_deg: 0.0,
            glyph_aspect: 2.0,
            max_iterations: 100,
            palette: DEFAULT_PALETTE.to_string(),
        }
    }
}

/// Zoom progress at `elapsed` seconds: `sin⁴(π·elapsed/period)`.
///
/// Zero at every period boundary, one at each half period, smooth and
/// symmetric in between.
#[inline]
pub fn zoom_ease(elapsed: f64, period: f64) -> f64 {
    (PI * elapsed / period).sin().powi(4)
}

/// Map a normalized sample onto a palette of `len` glyphs.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn glyph_index(sample: f64, len: usize) -> usize {
    let last = len.saturating_sub(1);
    let scaled = sample.clamp(0.0, 1.0) * (last as f64 + 0.1);
    (scaled as usize).min(last)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Relative position of cell `i` of `n` across the window, in `[0, 1]`.
#[inline]
#[allow(clippy::cast_precision_loss)]
fn relative(i: usize, n: usize) -> f64 {
    if n <= 1 {
        0.5
    } else {
        i as f64 / (n - 1) as f64
    }
}

/// Animator that renders the Mandelbrot set zooming towards a fixed point.
#[derive(Debug, Clone)]
pub struct MandelbrotAnimator {
    config: MandelbrotConfig,
    palette: Vec<u8>,
    elapsed: f64,
}

impl MandelbrotAnimator {
    /// Build an animator from validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIterations`] for a budget below 2,
    /// [`Error::InvalidPeriod`] for a non-positive or non-finite period and
    /// [`Error::EmptyPalette`] for an empty palette and
    /// [`Error::InvalidPalette`] for a palette holding anything other than
    /// printable ASCII or space.
    pub fn new(config: MandelbrotConfig) -> Result<Self> {
        if config.max_iterations < 2 {
            return Err(Error::InvalidIterations(config.max_iterations));
        }
        if !(config.period.is_finite() && config.period > 0.0) {
            return Err(Error::InvalidPeriod(config.period));
        }
        if config.palette.is_empty() {
            return Err(Error::EmptyPalette);
        }
        if let Some(byte) = config
            .palette
            .bytes()
            .find(|&b| !(b.is_ascii_graphic() || b == b' '))
        {
            return Err(Error::InvalidPalette(byte));
        }

        let palette = config.palette.as_bytes().to_vec();
        Ok(Self {
            config,
            palette,
            elapsed: 0.0,
        })
    }

    /// The animation parameters.
    pub const fn config(&self) -> &MandelbrotConfig {
        &self.config
    }

    /// Seconds of animation time accumulated so far.
    pub const fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current zoom progress.
    pub fn ease(&self) -> f64 {
        zoom_ease(self.elapsed, self.config.period)
    }

    /// Draw the frame for the current elapsed time.
    #[allow(clippy::cast_precision_loss)]
    pub fn render(&self, buffer: &mut FrameBuffer) {
        let cfg = &self.config;
        let (width, height) = buffer.size();
        let t = self.ease();

        let half_w = lerp(cfg.zoom_out_half_width, cfg.zoom_in_half_width, t);
        let aspect = width as f64 / height as f64;
        let half_h = half_w / aspect * cfg.glyph_aspect;

        // Zoomed out pairs with the maximum rotation, zoomed in with the minimum.
        let angle = lerp(cfg.rotation_max_deg, cfg.rotation_min_deg, t).to_radians();
        let (sin, cos) = angle.sin_cos();
        let (cx, cy) = cfg.center;

        for y in 0..height {
            let im = lerp(cy - half_h, cy + half_h, relative(y, height));
            for x in 0..width {
                let re = lerp(cx - half_w, cx + half_w, relative(x, width));

                // Rotate about the zoom center.
                let (dx, dy) = (re - cx, im - cy);
                let re = cx + dx * cos - dy * sin;
                let im = cy + dx * sin + dy * cos;

                let s = sample(re, im, cfg.max_iterations);
                let glyph = self.palette[glyph_index(s, self.palette.len())];
                buffer.set_cell(x, y, glyph);
            }
        }
    }
}

impl Animator for MandelbrotAnimator {
    fn init(&mut self, buffer: &FrameBuffer) {
        self.elapsed = 0.0;
        tracing::debug!(
            width = buffer.width(),
            height = buffer.height(),
            period = self.config.period,
            "mandelbrot animator initialised"
        );
    }

    fn step(&mut self, delta: Duration, buffer: &mut FrameBuffer) {
        self.elapsed += delta.as_secs_f64();
        self.render(buffer);
    }
}
