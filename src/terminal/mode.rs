//! `TerminalMode`: Raw mode and SGR mouse tracking for the lifetime of a
//! guard value.

use crossterm::{cursor, execute, terminal};
use std::io::{self, Write};

/// Any-event tracking, urxvt extended coordinates and SGR encoding.
pub const ENABLE_MOUSE_TRACKING: &[u8] = b"\x1b[?1003h\x1b[?1015h\x1b[?1006h";

/// Inverse of [`ENABLE_MOUSE_TRACKING`].
pub const DISABLE_MOUSE_TRACKING: &[u8] = b"\x1b[?1006l\x1b[?1015l\x1b[?1003l";

/// Guard that puts the terminal into raw mode with mouse tracking and
/// restores it on drop.
pub struct TerminalMode<W: Write> {
    out: W,
    raw: bool,
}

impl TerminalMode<io::Stdout> {
    /// Enable raw mode and mouse tracking on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be entered or the setup
    /// sequences cannot be written.
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Self::setup(io::stdout(), true)
    }
}

impl<W: Write> TerminalMode<W> {
    /// Emit mouse tracking setup to `out` without touching the TTY line
    /// discipline.
    ///
    /// # Errors
    ///
    /// Returns an error if the setup sequences cannot be written.
    pub fn with_writer(out: W) -> io::Result<Self> {
        Self::setup(out, false)
    }

    fn setup(mut out: W, raw: bool) -> io::Result<Self> {
        out.write_all(ENABLE_MOUSE_TRACKING)?;
        execute!(out, cursor::Hide)?;
        tracing::debug!(raw, "terminal mode enabled");
        Ok(Self { out, raw })
    }

    /// Get a reference to the underlying writer.
    pub const fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Drop for TerminalMode<W> {
    fn drop(&mut self) {
        let _ = self.out.write_all(DISABLE_MOUSE_TRACKING);
        let _ = execute!(self.out, cursor::Show);
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
        tracing::debug!("terminal mode restored");
    }
}
