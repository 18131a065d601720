//! Terminal module: Output sinks and terminal mode management.

mod mode;
mod output;

pub use mode::{TerminalMode, DISABLE_MOUSE_TRACKING, ENABLE_MOUSE_TRACKING};
pub use output::{AnsiOutput, NullOutput, OutputSink};
