//! SGR mouse report decoding.
//!
//! With any-event tracking (`?1003`) and SGR encoding (`?1006`) enabled the
//! terminal reports the pointer as `ESC [ < btn ; col ; row (M|m)`.
//! Coordinates are 1-based and include the frame border, so the decoder
//! shifts them by a calibration offset into drawable space.

use bitflags::bitflags;
use std::fmt;

/// SGR button code for motion with no button held.
pub const BUTTON_MOVED: u16 = 35;

/// SGR button code for the primary button.
pub const BUTTON_PRIMARY: u16 = 0;

/// Offset aligning 1-based, border-inclusive terminal cells with drawable
/// cell `(0, 0)`.
pub const DEFAULT_OFFSET: (i32, i32) = (-2, -2);

const ESC: u8 = 0x1b;

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Pointer moved with no button held.
    Moved,
    /// Primary button pressed.
    Pressed,
    /// Primary button released.
    Released,
    /// Any other button code.
    Unknown,
}

bitflags! {
    /// Modifier keys encoded in the SGR button code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseModifiers: u8 {
        /// Shift held.
        const SHIFT = 0b0000_0001;
        /// Alt/Meta held.
        const ALT = 0b0000_0010;
        /// Control held.
        const CTRL = 0b0000_0100;
    }
}

impl MouseModifiers {
    /// Extract modifier bits from a raw SGR button code.
    pub fn from_button_code(code: u16) -> Self {
        let mut mods = Self::empty();
        if code & 4 != 0 {
            mods |= Self::SHIFT;
        }
        if code & 8 != 0 {
            mods |= Self::ALT;
        }
        if code & 16 != 0 {
            mods |= Self::CTRL;
        }
        mods
    }
}

/// A decoded pointer event in drawable-cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Event classification.
    pub kind: MouseEventKind,
    /// Column in drawable space (may be negative over the border).
    pub x: i32,
    /// Row in drawable space (may be negative over the border).
    pub y: i32,
    /// Raw SGR button code.
    pub button: u16,
    /// Modifier keys held.
    pub modifiers: MouseModifiers,
}

impl fmt::Display for MouseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MouseEventKind::Moved => write!(f, "MOUSE MOVED TO {},{}", self.x, self.y),
            MouseEventKind::Pressed => write!(f, "MOUSE CLICK ON {},{}", self.x, self.y),
            MouseEventKind::Released => write!(f, "MOUSE UP ON {},{}", self.x, self.y),
            MouseEventKind::Unknown => {
                write!(f, "MOUSE BUTTON {} AT {},{}", self.button, self.x, self.y)
            }
        }
    }
}

/// Why a captured sequence was not a mouse report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No `[` introducer.
    MissingIntroducer,
    /// No `M`/`m` terminator after the introducer.
    MissingTerminator,
    /// Expected `btn;col;row`.
    FieldCount(usize),
    /// A field was not a decimal number.
    InvalidNumber(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIntroducer => write!(f, "no CSI introducer"),
            Self::MissingTerminator => write!(f, "no M/m terminator"),
            Self::FieldCount(n) => write!(f, "expected 3 fields, found {n}"),
            Self::InvalidNumber(field) => write!(f, "field {field:?} is not a number"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode one SGR mouse report.
///
/// Everything up to and including the first `[` is discarded. The first
/// `M` or `m` after it terminates the report (`m` means release). The body
/// is split on `;` and a leading `<` is stripped from the button field.
///
/// # Errors
///
/// Returns a [`DecodeError`] describing the first structural problem found.
pub fn decode(raw: &[u8], offset: (i32, i32)) -> Result<MouseEvent, DecodeError> {
    let start = raw
        .iter()
        .position(|&b| b == b'[')
        .ok_or(DecodeError::MissingIntroducer)?;
    let rest = &raw[start + 1..];

    let end = rest
        .iter()
        .position(|&b| b == b'M' || b == b'm')
        .ok_or(DecodeError::MissingTerminator)?;
    let released = rest[end] == b'm';

    let body = std::str::from_utf8(&rest[..end])
        .map_err(|_| DecodeError::InvalidNumber(String::from_utf8_lossy(&rest[..end]).into()))?;

    let fields: Vec<&str> = body.split(';').collect();
    let [button, col, row] = &fields[..] else {
        return Err(DecodeError::FieldCount(fields.len()));
    };

    let button: u16 = parse_field(button.trim_start_matches('<'))?;
    let col: i32 = parse_field(col)?;
    let row: i32 = parse_field(row)?;

    let kind = match button {
        BUTTON_MOVED => MouseEventKind::Moved,
        BUTTON_PRIMARY if released => MouseEventKind::Released,
        BUTTON_PRIMARY => MouseEventKind::Pressed,
        _ => MouseEventKind::Unknown,
    };

    Ok(MouseEvent {
        kind,
        x: col + offset.0,
        y: row + offset.1,
        button,
        modifiers: MouseModifiers::from_button_code(button),
    })
}

fn parse_field<T: std::str::FromStr>(field: &str) -> Result<T, DecodeError> {
    field
        .parse()
        .map_err(|_| DecodeError::InvalidNumber(field.to_string()))
}

/// Stateful decoder that remembers the last good event.
#[derive(Debug, Clone)]
pub struct MouseDecoder {
    offset: (i32, i32),
    last: Option<MouseEvent>,
}

impl Default for MouseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseDecoder {
    /// Create a decoder with the default calibration offset.
    pub const fn new() -> Self {
        Self::with_offset(DEFAULT_OFFSET)
    }

    /// Create a decoder with a custom calibration offset.
    pub const fn with_offset(offset: (i32, i32)) -> Self {
        Self { offset, last: None }
    }

    /// The most recent successfully decoded event.
    #[inline]
    pub const fn last(&self) -> Option<&MouseEvent> {
        self.last.as_ref()
    }

    /// Decode a single report, replacing the stored event on success.
    ///
    /// # Errors
    ///
    /// On failure the stored event is left untouched and the error returned.
    pub fn decode(&mut self, raw: &[u8]) -> Result<MouseEvent, DecodeError> {
        let event = decode(raw, self.offset)?;
        self.last = Some(event);
        Ok(event)
    }

    /// Feed a captured chunk that may hold several queued reports and a
    /// cursor position reply.
    ///
    /// Each `ESC`-separated segment is decoded in order; the last good
    /// report wins. Segments that are not mouse reports are dropped.
    pub fn update(&mut self, raw: &[u8]) -> Option<&MouseEvent> {
        for segment in raw.split(|&b| b == ESC).filter(|s| !s.is_empty()) {
            if let Err(e) = self.decode(segment) {
                tracing::trace!(
                    error = %e,
                    segment = %String::from_utf8_lossy(segment),
                    "discarded input segment"
                );
            }
        }
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: MouseEventKind, x: i32, y: i32, button: u16) -> MouseEvent {
        MouseEvent {
            kind,
            x,
            y,
            button,
            modifiers: MouseModifiers::empty(),
        }
    }

    #[test]
    fn test_decode_press_release_move() {
        let offset = DEFAULT_OFFSET;
        assert_eq!(
            decode(b"\x1b[<0;5;7M", offset),
            Ok(event(MouseEventKind::Pressed, 3, 5, 0))
        );
        assert_eq!(
            decode(b"\x1b[<0;5;7m", offset),
            Ok(event(MouseEventKind::Released, 3, 5, 0))
        );
        assert_eq!(
            decode(b"\x1b[<35;10;10M", offset),
            Ok(event(MouseEventKind::Moved, 8, 8, 35))
        );
    }

    #[test]
    fn test_decode_unknown_button() {
        let ev = decode(b"\x1b[<2;1;1M", (0, 0)).unwrap();
        assert_eq!(ev.kind, MouseEventKind::Unknown);
        assert_eq!(ev.button, 2);
        assert_eq!((ev.x, ev.y), (1, 1));
    }

    #[test]
    fn test_decode_modifiers() {
        let ev = decode(b"\x1b[<20;3;4M", (0, 0)).unwrap();
        assert_eq!(ev.kind, MouseEventKind::Unknown);
        assert_eq!(ev.modifiers, MouseModifiers::SHIFT | MouseModifiers::CTRL);
    }

    #[test]
    fn test_decode_discards_leading_framing() {
        let ev = decode(b"junk\x1b[<35;4;4M", DEFAULT_OFFSET).unwrap();
        assert_eq!((ev.kind, ev.x, ev.y), (MouseEventKind::Moved, 2, 2));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode(b"<0;5;7M", (0, 0)), Err(DecodeError::MissingIntroducer));
        assert_eq!(decode(b"\x1b[<0;5", (0, 0)), Err(DecodeError::MissingTerminator));
        assert_eq!(decode(b"\x1b[<0;5M", (0, 0)), Err(DecodeError::FieldCount(2)));
        assert_eq!(
            decode(b"\x1b[<0;x;7M", (0, 0)),
            Err(DecodeError::InvalidNumber("x".to_string()))
        );
    }

    #[test]
    fn test_decoder_keeps_last_good() {
        let mut decoder = MouseDecoder::new();
        assert!(decoder.last().is_none());

        decoder.update(b"\x1b[<0;5;7M");
        let good = *decoder.last().unwrap();

        let garbage: [&[u8]; 5] = [b"\x1b[<0;5", b"\x1b[<a;b;cM", b"\x1b[", b"", b"zzz"];
        for garbage in garbage {
            decoder.update(garbage);
            assert_eq!(decoder.last(), Some(&good));
        }
    }

    #[test]
    fn test_decoder_last_report_wins() {
        let mut decoder = MouseDecoder::new();
        let chunk = b"\x1b[<35;10;10M\x1b[<0;12;6M\x1b[<0;12;6m\x1b[51;1R";
        let last = decoder.update(chunk).copied().unwrap();
        assert_eq!(last, event(MouseEventKind::Released, 10, 4, 0));
    }

    #[test]
    fn test_cursor_report_alone_is_ignored() {
        let mut decoder = MouseDecoder::new();
        assert!(decoder.update(b"\x1b[24;80R").is_none());
    }

    #[test]
    fn test_display() {
        let ev = event(MouseEventKind::Pressed, 3, 5, 0);
        assert_eq!(ev.to_string(), "MOUSE CLICK ON 3,5");
    }
}
