//! Engine module: The fixed-rate render loop.
//!
//! ```text
//!  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//!  │ Clearing │──▶│ Updating │──▶│ Flushing │──▶│  Pacing  │──┐
//!  └──────────┘   └──────────┘   └──────────┘   └──────────┘  │
//!       ▲          input poll     OutputSink     sleep + spin │
//!       └─────────────────────────────────────────────────────┘
//! ```

#[allow(clippy::module_inception)]
mod engine;
mod hud;
mod pacer;
mod stats;

pub use engine::{Engine, EngineConfig};
pub use hud::draw_hud;
pub use pacer::{Clock, FramePacer, ManualClock, SystemClock, DEFAULT_SPIN_MARGIN};
pub use stats::{FrameStats, STATS_WINDOW};
