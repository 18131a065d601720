//! Engine: Owns the frame buffer, sink, animator, input and clock, and
//! drives the Clearing → Updating → Flushing → Pacing cycle.

use super::hud::draw_hud;
use super::pacer::{Clock, FramePacer, SystemClock, DEFAULT_SPIN_MARGIN};
use super::stats::FrameStats;
use crate::animator::Animator;
use crate::buffer::FrameBuffer;
use crate::error::{Error, Result};
use crate::input::{InputSource, MouseDecoder, MouseEvent, DEFAULT_OFFSET};
use crate::terminal::OutputSink;
use std::time::Duration;

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Drawable width in columns.
    pub width: usize,
    /// Drawable height in rows.
    pub height: usize,
    /// Byte used for the frame border.
    pub border_char: u8,
    /// Target frames per second.
    pub target_fps: u32,
    /// Time left to spin after the pacer's coarse sleep.
    pub spin_margin: Duration,
    /// Longest wait for the terminal to answer an input probe.
    pub probe_timeout: Duration,
    /// Shift from terminal cell coordinates to drawable coordinates.
    pub mouse_offset: (i32, i32),
    /// Whether to draw the statistics overlay.
    pub show_hud: bool,
    /// Raw input bytes that stop the loop.
    pub quit_keys: Vec<u8>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 50,
            border_char: b'*',
            target_fps: 60,
            spin_margin: DEFAULT_SPIN_MARGIN,
            probe_timeout: Duration::from_millis(50),
            mouse_offset: DEFAULT_OFFSET,
            show_hud: true,
            quit_keys: vec![0x03, b'q'],
        }
    }
}

/// The main render loop.
///
/// The engine is the only mutator of its [`FrameBuffer`]; the animator
/// borrows it for the duration of each step.
pub struct Engine<S: OutputSink, C: Clock = SystemClock> {
    /// Configuration.
    config: EngineConfig,
    /// Frame being composed.
    buffer: FrameBuffer,
    /// Destination for finished frames.
    sink: S,
    /// Per-frame payload.
    animator: Box<dyn Animator>,
    /// Raw input, if attached.
    input: Option<Box<dyn InputSource>>,
    /// Mouse state (last good event).
    decoder: MouseDecoder,
    /// Frame timing.
    pacer: FramePacer,
    clock: C,
    last_frame_start: Option<Duration>,
    stats: FrameStats,
    frame_count: u64,
    /// Whether the engine is running.
    running: bool,
}

impl<S: OutputSink> Engine<S, SystemClock> {
    /// Create an engine driven by the wall clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero frame rate or zero
    /// dimensions.
    pub fn new<A>(config: EngineConfig, sink: S, animator: A) -> Result<Self>
    where
        A: Animator + 'static,
    {
        Self::with_clock(config, sink, animator, SystemClock::new())
    }
}

impl<S: OutputSink, C: Clock> Engine<S, C> {
    /// Create an engine driven by a custom clock.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero frame rate or zero
    /// dimensions.
    pub fn with_clock<A>(config: EngineConfig, sink: S, animator: A, clock: C) -> Result<Self>
    where
        A: Animator + 'static,
    {
        if config.target_fps == 0 {
            return Err(Error::InvalidFrameRate(config.target_fps));
        }

        let buffer = FrameBuffer::new(config.width, config.height, config.border_char)?;
        let pacer = FramePacer::new(config.target_fps).with_margin(config.spin_margin);
        let decoder = MouseDecoder::with_offset(config.mouse_offset);

        let mut animator: Box<dyn Animator> = Box::new(animator);
        animator.init(&buffer);

        Ok(Self {
            config,
            buffer,
            sink,
            animator,
            input: None,
            decoder,
            pacer,
            clock,
            last_frame_start: None,
            stats: FrameStats::new(),
            frame_count: 0,
            running: false,
        })
    }

    /// Attach a raw input source polled once per frame.
    #[must_use]
    pub fn with_input<I>(mut self, input: I) -> Self
    where
        I: InputSource + 'static,
    {
        self.input = Some(Box::new(input));
        self
    }

    /// Get the configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get a reference to the frame buffer.
    pub const fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Get a reference to the sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a reference to the clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Frame timing statistics.
    pub const fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// The most recent decoded mouse event.
    pub const fn last_mouse(&self) -> Option<&MouseEvent> {
        self.decoder.last()
    }

    /// Frames flushed since creation.
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Check if the engine is running.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Stop after the current frame.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Consume the engine, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run one clear → input → step → flush cycle without pacing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the input probe or the sink fails.
    pub fn frame(&mut self) -> Result<()> {
        let now = self.clock.now();
        let delta = match self.last_frame_start {
            Some(previous) => {
                let delta = now.saturating_sub(previous);
                self.stats.record(delta);
                delta
            }
            None => Duration::ZERO,
        };
        self.last_frame_start = Some(now);

        self.buffer.clear();
        self.poll_input()?;
        self.animator.step(delta, &mut self.buffer);

        if self.config.show_hud {
            draw_hud(&mut self.buffer, &self.stats, self.decoder.last());
        }

        self.sink.write(self.buffer.snapshot())?;
        self.frame_count += 1;

        tracing::trace!(frame = self.frame_count, delta = ?delta, "frame flushed");
        Ok(())
    }

    fn poll_input(&mut self) -> Result<()> {
        let Some(input) = self.input.as_mut() else {
            return Ok(());
        };

        let raw = input.poll()?;
        if raw.iter().any(|b| self.config.quit_keys.contains(b)) {
            tracing::info!("quit key received");
            self.running = false;
        }
        self.decoder.update(&raw);
        Ok(())
    }

    /// Run until a quit key arrives or [`stop`](Self::stop) is called.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from the sink or input.
    pub fn run(&mut self) -> Result<()> {
        self.run_while(|_, _| true)
    }

    /// Run for `duration` of clock time.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from the sink or input.
    pub fn run_for(&mut self, duration: Duration) -> Result<()> {
        self.run_while(|elapsed, _| elapsed < duration)
    }

    /// Run exactly `frames` frames (fewer if a quit key arrives).
    ///
    /// # Errors
    ///
    /// Returns the first I/O error from the sink or input.
    pub fn run_frames(&mut self, frames: u64) -> Result<()> {
        self.run_while(|_, done| done < frames)
    }

    /// Open the sink, loop while `keep_going(elapsed, frames_done)` holds,
    /// then close the sink.
    ///
    /// The sink is closed even when a frame fails; the frame error wins.
    fn run_while<F>(&mut self, mut keep_going: F) -> Result<()>
    where
        F: FnMut(Duration, u64) -> bool,
    {
        self.sink.open()?;
        tracing::info!(
            width = self.config.width,
            height = self.config.height,
            fps = self.config.target_fps,
            "engine started"
        );

        self.running = true;
        // Idle time between runs is not animation time.
        self.last_frame_start = None;
        self.pacer.start(&self.clock);
        let started = self.pacer.frame_start();
        let mut done = 0u64;

        let result = loop {
            if !self.running {
                break Ok(());
            }
            let elapsed = self.clock.now().saturating_sub(started);
            if !keep_going(elapsed, done) {
                break Ok(());
            }
            if let Err(e) = self.frame() {
                tracing::error!(error = %e, "frame failed");
                break Err(e);
            }
            done += 1;
            self.pacer.hold(&self.clock);
        };

        self.running = false;
        let closed = self.sink.close();
        tracing::info!(frames = done, "engine stopped");

        result?;
        closed?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ManualClock;
    use crate::input::MouseEventKind;
    use crate::terminal::NullOutput;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;
    use std::rc::Rc;

    /// Writes its frame number into cell (0, 0).
    struct Counter {
        steps: u8,
        deltas: Vec<Duration>,
    }

    impl Animator for Counter {
        fn init(&mut self, _buffer: &FrameBuffer) {}

        fn step(&mut self, delta: Duration, buffer: &mut FrameBuffer) {
            self.steps += 1;
            self.deltas.push(delta);
            buffer.set_cell(0, 0, b'0' + self.steps % 10);
        }
    }

    struct Scripted(VecDeque<Vec<u8>>);

    impl InputSource for Scripted {
        fn poll(&mut self) -> io::Result<Vec<u8>> {
            Ok(self.0.pop_front().unwrap_or_default())
        }
    }

    fn config() -> EngineConfig {
        EngineConfig {
            width: 8,
            height: 4,
            show_hud: false,
            target_fps: 50,
            ..EngineConfig::default()
        }
    }

    fn counter() -> Counter {
        Counter {
            steps: 0,
            deltas: Vec::new(),
        }
    }

    #[test]
    fn test_rejects_zero_fps() {
        let cfg = EngineConfig {
            target_fps: 0,
            ..config()
        };
        assert!(matches!(
            Engine::new(cfg, NullOutput::new(), counter()),
            Err(Error::InvalidFrameRate(0))
        ));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        let cfg = EngineConfig {
            width: 0,
            ..config()
        };
        assert!(matches!(
            Engine::new(cfg, NullOutput::new(), counter()),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_run_frames_lifecycle() {
        let clock = ManualClock::new(Duration::from_micros(10));
        let mut engine = Engine::with_clock(config(), NullOutput::new(), counter(), clock).unwrap();
        engine.run_frames(3).unwrap();

        assert_eq!(engine.frame_count(), 3);
        assert!(!engine.is_running());
        let sink = engine.sink();
        assert!(sink.is_opened() && sink.is_closed());
        assert_eq!(sink.frames(), 3);
        assert_eq!(sink.last_frame().len(), 11 * 6);
        assert_eq!(sink.last_frame()[12], b'3');
    }

    #[test]
    fn test_frame_clears_previous_content() {
        struct OneShot(bool);
        impl Animator for OneShot {
            fn init(&mut self, _buffer: &FrameBuffer) {}
            fn step(&mut self, _delta: Duration, buffer: &mut FrameBuffer) {
                if !self.0 {
                    buffer.set_cell(2, 2, b'X');
                    self.0 = true;
                }
            }
        }

        let clock = ManualClock::new(Duration::from_micros(10));
        let mut engine = Engine::with_clock(config(), NullOutput::new(), OneShot(false), clock).unwrap();
        engine.frame().unwrap();
        assert_eq!(engine.buffer().get(2, 2), b'X');
        engine.frame().unwrap();
        assert_eq!(engine.buffer().get(2, 2), b' ');
    }

    #[test]
    fn test_input_decoded_and_quit() {
        let script = VecDeque::from(vec![
            b"\x1b[<35;10;10M\x1b[1;1R".to_vec(),
            b"\x1b[<0;5".to_vec(),
            b"q\x1b[1;1R".to_vec(),
            b"\x1b[<0;5;7M".to_vec(),
        ]);
        let clock = ManualClock::new(Duration::from_micros(10));
        let mut engine = Engine::with_clock(config(), NullOutput::new(), counter(), clock)
            .unwrap()
            .with_input(Scripted(script));

        engine.run_frames(10).unwrap();

        // Stopped on the third frame; the truncated report kept the move.
        assert_eq!(engine.frame_count(), 3);
        let last = engine.last_mouse().unwrap();
        assert_eq!((last.kind, last.x, last.y), (MouseEventKind::Moved, 8, 8));
        assert!(engine.sink().is_closed());
    }

    #[test]
    fn test_hud_drawn_when_enabled() {
        let cfg = EngineConfig {
            width: 20,
            height: 6,
            show_hud: true,
            ..config()
        };
        let clock = ManualClock::new(Duration::from_micros(10));
        let mut engine = Engine::with_clock(cfg, NullOutput::new(), counter(), clock).unwrap();
        engine.run_frames(2).unwrap();
        assert_eq!(engine.buffer().get(0, 5), b'+');
        assert_eq!(engine.buffer().get(15, 5), b'+');
    }

    #[test]
    fn test_rerun_starts_with_zero_delta() {
        struct Recorder(Rc<RefCell<Vec<Duration>>>);
        impl Animator for Recorder {
            fn init(&mut self, _buffer: &FrameBuffer) {}
            fn step(&mut self, delta: Duration, _buffer: &mut FrameBuffer) {
                self.0.borrow_mut().push(delta);
            }
        }

        let deltas = Rc::new(RefCell::new(Vec::new()));
        let clock = ManualClock::new(Duration::from_micros(10));
        let mut engine =
            Engine::with_clock(config(), NullOutput::new(), Recorder(deltas.clone()), clock)
                .unwrap();

        engine.run_frames(2).unwrap();
        engine.clock().advance(Duration::from_secs(5));
        engine.run_frames(2).unwrap();

        let deltas = deltas.borrow();
        assert_eq!(deltas.len(), 4);
        assert_eq!(deltas[0], Duration::ZERO);
        assert_eq!(deltas[2], Duration::ZERO);
        assert!(deltas[3] < Duration::from_secs(1));
    }

    struct FailingSink;

    impl OutputSink for FailingSink {
        fn open(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn write(&mut self, _frame: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
        }

        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_error_stops_loop() {
        let clock = ManualClock::new(Duration::from_micros(10));
        let mut engine = Engine::with_clock(config(), FailingSink, counter(), clock).unwrap();
        let err = engine.run_frames(5).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
        assert_eq!(engine.frame_count(), 0);
    }
}
