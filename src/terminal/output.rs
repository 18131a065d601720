//! Output sinks: Where finished frames go.
//!
//! A sink is opened once before the loop, written once per frame and closed
//! once at shutdown. [`AnsiOutput`] drives a real terminal; [`NullOutput`]
//! only records what it was given.

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// A byte destination with an open/write/close lifecycle.
pub trait OutputSink {
    /// Prepare the destination. Called once before the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written.
    fn open(&mut self) -> io::Result<()>;

    /// Emit one frame so it overwrites the previous one in place.
    ///
    /// The bytes have reached the destination when this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written.
    fn write(&mut self, frame: &[u8]) -> io::Result<()>;

    /// Tear down the destination. Called once at shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written.
    fn close(&mut self) -> io::Result<()>;
}

/// ANSI terminal sink.
///
/// Every frame is preceded by a cursor-home sequence and emitted with a
/// single `write_all` followed by a flush.
pub struct AnsiOutput<W: Write> {
    writer: W,
    /// Expand `\n` to `\r\n` (raw mode disables output post-processing).
    crlf: bool,
    /// Pre-allocated frame staging buffer.
    staging: Vec<u8>,
}

impl AnsiOutput<io::Stdout> {
    /// Sink writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AnsiOutput<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            crlf: false,
            staging: Vec::with_capacity(16 * 1024),
        }
    }

    /// Translate line feeds to carriage return + line feed.
    #[must_use]
    pub fn with_crlf(mut self, crlf: bool) -> Self {
        self.crlf = crlf;
        self
    }

    /// Get a reference to the underlying writer.
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        queue!(self.writer, Clear(ClearType::All), MoveTo(0, 0))?;
        self.writer.flush()
    }
}

impl<W: Write> OutputSink for AnsiOutput<W> {
    fn open(&mut self) -> io::Result<()> {
        tracing::debug!("opening ANSI output");
        self.clear_screen()
    }

    fn write(&mut self, frame: &[u8]) -> io::Result<()> {
        self.staging.clear();
        queue!(self.staging, MoveTo(0, 0))?;

        if self.crlf {
            for &byte in frame {
                if byte == b'\n' {
                    self.staging.push(b'\r');
                }
                self.staging.push(byte);
            }
        } else {
            self.staging.extend_from_slice(frame);
        }

        self.writer.write_all(&self.staging)?;
        self.writer.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        tracing::debug!("closing ANSI output");
        self.clear_screen()
    }
}

/// Sink that records frames instead of writing them anywhere.
#[derive(Debug, Default, Clone)]
pub struct NullOutput {
    opened: bool,
    closed: bool,
    frames: u64,
    last_frame: Vec<u8>,
}

impl NullOutput {
    /// Create an unopened sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `open` was called.
    pub const fn is_opened(&self) -> bool {
        self.opened
    }

    /// Whether `close` was called.
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of frames written.
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Bytes of the most recent frame.
    pub fn last_frame(&self) -> &[u8] {
        &self.last_frame
    }
}

impl OutputSink for NullOutput {
    fn open(&mut self) -> io::Result<()> {
        self.opened = true;
        Ok(())
    }

    fn write(&mut self, frame: &[u8]) -> io::Result<()> {
        self.frames += 1;
        self.last_frame.clear();
        self.last_frame.extend_from_slice(frame);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn open(&mut self) -> io::Result<()> {
        (**self).open()
    }

    fn write(&mut self, frame: &[u8]) -> io::Result<()> {
        (**self).write(frame)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &[u8] = b"\x1b[1;1H";

    #[test]
    fn test_write_homes_cursor_first() {
        let mut out = AnsiOutput::new(Vec::new());
        out.write(b"ab\n").unwrap();
        out.write(b"cd\n").unwrap();

        let bytes = out.into_inner();
        let parts: [&[u8]; 4] = [HOME, b"ab\n", HOME, b"cd\n"];
        assert_eq!(bytes, parts.concat());
    }

    #[test]
    fn test_write_crlf() {
        let mut out = AnsiOutput::new(Vec::new()).with_crlf(true);
        out.write(b"**\n**\n").unwrap();
        assert_eq!(out.get_ref()[HOME.len()..], b"**\r\n**\r\n"[..]);
    }

    #[test]
    fn test_open_close_clear_screen() {
        let mut out = AnsiOutput::new(Vec::new());
        out.open().unwrap();
        let opened = out.get_ref().clone();
        assert!(opened.starts_with(b"\x1b[2J"));
        assert!(opened.ends_with(HOME));

        out.close().unwrap();
        assert_eq!(out.get_ref().len(), opened.len() * 2);
    }

    #[test]
    fn test_null_output_lifecycle() {
        let mut sink = NullOutput::new();
        assert!(!sink.is_opened());

        sink.open().unwrap();
        sink.write(b"frame one").unwrap();
        sink.write(b"frame two").unwrap();
        sink.close().unwrap();

        assert!(sink.is_opened() && sink.is_closed());
        assert_eq!(sink.frames(), 2);
        assert_eq!(sink.last_frame(), b"frame two");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_propagates() {
        let mut out = AnsiOutput::new(BrokenPipe);
        let err = out.write(b"x\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
