//! Mandelbrot Demo: A zooming ASCII Mandelbrot set at a fixed frame rate.
//!
//! The frame is sized to the terminal. Mouse events are shown in the
//! overlay in the bottom-left corner.
//!
//! Press 'q' or Ctrl-C to quit.
//!
//! Environment:
//! - `ASCII_ENGINE_FPS`: target frame rate (default 60)
//! - `ASCII_ENGINE_LOG`: write logs to this file (filter via `RUST_LOG`)

use ascii_engine::{
    AnsiOutput, Engine, EngineConfig, MandelbrotAnimator, MandelbrotConfig, TerminalInput,
    TerminalMode,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn init_logging() -> Result<(), Box<dyn Error>> {
    if let Ok(path) = std::env::var("ASCII_ENGINE_LOG") {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .init();
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;

    let target_fps = std::env::var("ASCII_ENGINE_FPS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(60);

    // Leave room for the border, the terminator column and one spare row.
    let (cols, rows) = crossterm::terminal::size()?;
    let config = EngineConfig {
        width: usize::from(cols).saturating_sub(3).max(1),
        height: usize::from(rows).saturating_sub(3).max(1),
        target_fps,
        ..EngineConfig::default()
    };

    let animator = MandelbrotAnimator::new(MandelbrotConfig {
        rotation_max_deg: 360.0,
        ..MandelbrotConfig::default()
    })?;

    let _mode = TerminalMode::enable()?;
    let input = TerminalInput::stdio(config.probe_timeout)?;
    // Raw mode disables output post-processing.
    let output = AnsiOutput::stdout().with_crlf(true);

    let mut engine = Engine::new(config, output, animator)?.with_input(input);
    engine.run()?;

    Ok(())
}
