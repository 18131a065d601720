//! # ASCII Engine
//!
//! A fixed-rate ASCII-art animation engine for the terminal.
//!
//! Each frame the engine clears a bordered character grid, collects raw
//! mouse input, lets an [`Animator`] draw into the grid, flushes the whole
//! grid to an [`OutputSink`] in one write, then holds the frame boundary
//! with a sleep-then-spin pacer.
//!
//! ## Core Concepts
//!
//! - **Flat frame buffer**: Borders and line terminators live in the buffer,
//!   so a frame is written as-is
//! - **In-place redraw**: Every frame starts with cursor-home, never scrolls
//! - **Hybrid pacing**: Coarse sleep plus a short spin for sub-millisecond
//!   frame accuracy
//! - **Bounded input**: Mouse reports are collected with a timeout and
//!   decoded with a last-known-good policy
//!
//! ## Example
//!
//! ```rust,no_run
//! use ascii_engine::{AnsiOutput, Engine, EngineConfig, MandelbrotAnimator, MandelbrotConfig};
//!
//! let animator = MandelbrotAnimator::new(MandelbrotConfig::default())?;
//! let mut engine = Engine::new(EngineConfig::default(), AnsiOutput::stdout(), animator)?;
//! engine.run_frames(600)?;
//! # Ok::<(), ascii_engine::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod animator;
pub mod buffer;
pub mod engine;
pub mod error;
pub mod fractal;
pub mod input;
pub mod terminal;

// Re-exports for convenience
pub use animator::{Animator, MandelbrotAnimator, MandelbrotConfig};
pub use buffer::FrameBuffer;
pub use engine::{Clock, Engine, EngineConfig, FramePacer, FrameStats, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use fractal::{sample, SampleParams};
pub use input::{InputSource, MouseDecoder, MouseEvent, MouseEventKind, TerminalInput};
pub use terminal::{AnsiOutput, NullOutput, OutputSink, TerminalMode};
