//! Escape-time sampler for the Mandelbrot set.

/// Squared escape radius for `z ← z² + c`.
pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// One point to sample on the complex plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleParams {
    /// Real component of `c`.
    pub real: f64,
    /// Imaginary component of `c`.
    pub imaginary: f64,
    /// Iteration budget. Must be at least 2.
    pub max_iterations: u32,
}

impl SampleParams {
    /// Create sample parameters for `c = real + imaginary·i`.
    #[inline]
    pub const fn new(real: f64, imaginary: f64, max_iterations: u32) -> Self {
        Self {
            real,
            imaginary,
            max_iterations,
        }
    }

    /// Run the escape-time iteration for these parameters.
    #[inline]
    pub fn sample(self) -> f64 {
        sample(self.real, self.imaginary, self.max_iterations)
    }
}

/// Normalized escape time of `c = (real, imaginary)`.
///
/// Iterates `z ← z² + c` from `z₀ = 0` and returns `n / (max_iterations - 1)`,
/// where `n` counts the iterations up to and including the one whose result
/// left the escape radius. Points that survive the whole budget return
/// exactly `1.0`, so the result is always in `(0, 1]`.
///
/// `max_iterations` must be at least 2; callers validate this up front.
#[inline]
pub fn sample(real: f64, imaginary: f64, max_iterations: u32) -> f64 {
    debug_assert!(max_iterations >= 2, "iteration budget must be at least 2");
    let last = max_iterations.saturating_sub(1).max(1);

    let (mut zr, mut zi) = (0.0_f64, 0.0_f64);
    for n in 1..=last {
        let next_r = zr * zr - zi * zi + real;
        let next_i = 2.0 * zr * zi + imaginary;
        zr = next_r;
        zi = next_i;

        if zr * zr + zi * zi > ESCAPE_RADIUS_SQUARED {
            return f64::from(n) / f64::from(last);
        }
    }

    1.0
}
