//! Input module: Raw terminal input collection and mouse decoding.
//!
//! - [`InputReader`]: Thread forwarding raw stdin chunks over a channel
//! - [`TerminalInput`]: Per-frame cursor-position probe with a bounded wait
//! - [`MouseDecoder`]: SGR mouse report parser with last-known-good state

mod mouse;
mod reader;

pub use mouse::{
    decode, DecodeError, MouseDecoder, MouseEvent, MouseEventKind, MouseModifiers,
    BUTTON_MOVED, BUTTON_PRIMARY, DEFAULT_OFFSET,
};
pub use reader::{
    InputReader, InputSource, TerminalInput, CURSOR_POSITION_REQUEST,
    CURSOR_POSITION_TERMINATOR,
};
