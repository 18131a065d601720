//! Mouse Probe: An empty frame that reports decoded SGR mouse events.
//!
//! Move the pointer, click and release inside the border; the overlay
//! shows the last event in drawable coordinates.
//!
//! Press 'q' or Ctrl-C to quit.

use ascii_engine::{
    AnsiOutput, Animator, Engine, EngineConfig, FrameBuffer, TerminalInput, TerminalMode,
};
use std::time::Duration;

/// Draws nothing; the engine's overlay does the work.
struct Blank;

impl Animator for Blank {
    fn init(&mut self, _buffer: &FrameBuffer) {}

    fn step(&mut self, _delta: Duration, _buffer: &mut FrameBuffer) {}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig {
        width: 60,
        height: 16,
        border_char: b'#',
        target_fps: 30,
        ..EngineConfig::default()
    };

    let _mode = TerminalMode::enable()?;
    let input = TerminalInput::stdio(config.probe_timeout)?;
    // Raw mode disables output post-processing.
    let output = AnsiOutput::stdout().with_crlf(true);

    let mut engine = Engine::new(config, output, Blank)?.with_input(input);
    engine.run()?;

    Ok(())
}
