//! Input Reader: Dedicated thread for reading raw terminal bytes.
//!
//! Reading stdin blocks, so a small actor thread owns the reader and
//! forwards whatever arrives over a crossbeam channel. The engine loop then
//! collects bytes with a bounded timeout and never hangs on a silent
//! terminal.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Device Status Report request; the terminal answers `ESC [ row ; col R`.
pub const CURSOR_POSITION_REQUEST: &[u8] = b"\x1b[6n";

/// Final byte of the cursor position reply.
pub const CURSOR_POSITION_TERMINATOR: u8 = b'R';

/// A source of raw input bytes, polled once per frame.
pub trait InputSource {
    /// Collect the raw bytes that arrived since the last poll.
    ///
    /// Implementations must return within a bounded time even when the
    /// terminal sends nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a probe request cannot be written.
    fn poll(&mut self) -> io::Result<Vec<u8>>;
}

/// Reader actor that forwards raw byte chunks.
pub struct InputReader {
    /// Handle to the reader thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputReader {
    /// Spawn the reader thread.
    ///
    /// The thread exits on end of input, on a read error, when the receiver
    /// is dropped, or after [`shutdown`](Self::shutdown) once its current
    /// read returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn<R>(reader: R, sender: Sender<Vec<u8>>) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("ascii-engine-input".to_string())
            .spawn(move || Self::run_loop(reader, &sender, &shutdown_clone))?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the reader thread to stop after its current read.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Signal shutdown and wait for the reader thread to finish.
    ///
    /// Blocks until the thread's current read returns.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop<R: Read>(mut reader: R, sender: &Sender<Vec<u8>>, shutdown: &AtomicBool) {
        let mut buf = [0u8; 256];

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if sender.send(buf[..n].to_vec()).is_err() {
                        // Receiver dropped, exit
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::debug!(error = %e, "input reader stopped");
                    break;
                }
            }
        }
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        // The thread may be parked in a blocking read; it is detached rather
        // than joined.
        self.shutdown();
    }
}

/// Whether `bytes` holds a complete `ESC [ row ; col R` reply.
fn contains_position_reply(bytes: &[u8]) -> bool {
    (0..bytes.len())
        .any(|i| bytes[i..].starts_with(b"\x1b[") && is_position_reply(&bytes[i + 2..]))
}

fn is_position_reply(rest: &[u8]) -> bool {
    let row = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if row == 0 || rest.get(row) != Some(&b';') {
        return false;
    }
    let rest = &rest[row + 1..];
    let col = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    col > 0 && rest.get(col) == Some(&CURSOR_POSITION_TERMINATOR)
}

/// Terminal input collected by probing the cursor position each frame.
///
/// Every poll writes [`CURSOR_POSITION_REQUEST`] and gathers bytes until a
/// complete position reply arrives or `timeout` elapses. A bare `R` keypress
/// does not end the poll. Mouse reports queued ahead
/// of the reply come back in the same chunk.
pub struct TerminalInput<W: Write> {
    requests: W,
    rx: Receiver<Vec<u8>>,
    timeout: Duration,
    warned: bool,
    _reader: InputReader,
}

impl TerminalInput<io::Stdout> {
    /// Probe via stdout and read replies from stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn stdio(timeout: Duration) -> io::Result<Self> {
        Self::new(io::stdin(), io::stdout(), timeout)
    }
}

impl<W: Write> TerminalInput<W> {
    /// Read replies from `reader` and write probe requests to `requests`.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn new<R>(reader: R, requests: W, timeout: Duration) -> io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let (tx, rx) = bounded(64);
        let reader = InputReader::spawn(reader, tx)?;

        Ok(Self {
            requests,
            rx,
            timeout,
            warned: false,
            _reader: reader,
        })
    }

    /// The writer probe requests go to.
    pub const fn requests(&self) -> &W {
        &self.requests
    }
}

impl<W: Write> InputSource for TerminalInput<W> {
    fn poll(&mut self) -> io::Result<Vec<u8>> {
        self.requests.write_all(CURSOR_POSITION_REQUEST)?;
        self.requests.flush()?;

        let deadline = Instant::now() + self.timeout;
        let mut collected = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(chunk) => {
                    collected.extend_from_slice(&chunk);
                    if contains_position_reply(&collected) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.warned {
                        tracing::trace!(timeout = ?self.timeout, "cursor position probe timed out");
                    } else {
                        tracing::warn!(
                            timeout = ?self.timeout,
                            "terminal did not answer the cursor position probe"
                        );
                        self.warned = true;
                    }
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(collected)
    }
}
