//! Error types shared across the engine.
//!
//! Configuration errors are returned from constructors and stop the loop
//! before it starts. I/O errors from the output sink end the loop.

use std::fmt;
use std::io;

/// Errors produced by the engine and its components.
#[derive(Debug)]
pub enum Error {
    /// A frame buffer was requested with a zero dimension.
    InvalidDimensions {
        /// Requested drawable width.
        width: usize,
        /// Requested drawable height.
        height: usize,
    },
    /// The escape-time iteration budget is below 2.
    InvalidIterations(u32),
    /// An animation period is not a positive, finite number of seconds.
    InvalidPeriod(f64),
    /// The glyph palette has no characters.
    EmptyPalette,
    /// The glyph palette holds a byte that is not printable ASCII or space.
    InvalidPalette(u8),
    /// The target frame rate is zero.
    InvalidFrameRate(u32),
    /// Writing to the terminal failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "frame dimensions must be non-zero (got {width}x{height})")
            }
            Self::InvalidIterations(n) => {
                write!(f, "iteration budget must be at least 2 (got {n})")
            }
            Self::InvalidPeriod(p) => {
                write!(f, "animation period must be positive and finite (got {p})")
            }
            Self::EmptyPalette => write!(f, "glyph palette must not be empty"),
            Self::InvalidPalette(byte) => {
                write!(f, "glyph palette must be printable ASCII (found byte {byte:#04x})")
            }
            Self::InvalidFrameRate(fps) => {
                write!(f, "target frame rate must be greater than zero (got {fps})")
            }
            Self::Io(e) => write!(f, "terminal I/O failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
