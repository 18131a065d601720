//! Buffer module: The character frame buffer.
//!
//! This module contains:
//! - [`FrameBuffer`]: A bordered grid of ASCII cells in terminal byte order

mod frame;

pub use frame::{FrameBuffer, BLANK, LINE_TERMINATOR};
