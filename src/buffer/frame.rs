//! `FrameBuffer`: A bordered grid of ASCII cells, laid out exactly as it is
//! written to the terminal.
//!
//! The backing storage is one contiguous `Vec<u8>` in row-major order.
//! Every row holds a border cell, `width` drawable cells, a second border
//! cell and a line terminator; the first and last rows are all border.
//!
//! ```text
//!   ┌──────── width + 3 ────────┐
//!   * * * * * * * * * * * * * * \n
//!   *  drawable (0,0) ...     * \n
//!   *  ...                    * \n   height + 2 rows
//!   *           (w-1,h-1)     * \n
//!   * * * * * * * * * * * * * * \n
//! ```

use crate::error::{Error, Result};

/// Byte written into every drawable cell by [`FrameBuffer::clear`].
pub const BLANK: u8 = b' ';

/// Byte terminating every row.
pub const LINE_TERMINATOR: u8 = b'\n';

/// A grid of single-byte cells with a one-cell border and a terminator column.
///
/// Drawable coordinates `(x, y)` are offset by one in each axis to land
/// inside the border: `index = (y + 1) * stride + (x + 1)` where
/// `stride = width + 3`.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Contiguous cell storage (row-major, borders and terminators included).
    cells: Vec<u8>,
    /// Drawable width in columns.
    width: usize,
    /// Drawable height in rows.
    height: usize,
    /// Byte used for the border ring.
    border: u8,
}

impl FrameBuffer {
    /// Create a new cleared buffer with the given drawable dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `width` or `height` is zero or
    /// the framed size does not fit in memory addressing.
    pub fn new(width: usize, height: usize, border: u8) -> Result<Self> {
        let invalid = Error::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let Some(len) = width
            .checked_add(3)
            .zip(height.checked_add(2))
            .and_then(|(stride, rows)| stride.checked_mul(rows))
            .filter(|&len| isize::try_from(len).is_ok())
        else {
            return Err(invalid);
        };

        let mut buffer = Self {
            cells: vec![BLANK; len],
            width,
            height,
            border,
        };
        buffer.clear();
        Ok(buffer)
    }

    /// Drawable width in columns.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Drawable height in rows.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Drawable extent as `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The border byte.
    #[inline]
    pub const fn border(&self) -> u8 {
        self.border
    }

    /// Bytes per row, terminator included.
    #[inline]
    pub const fn stride(&self) -> usize {
        self.width + 3
    }

    /// Total number of bytes in a frame.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false` once constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of a drawable cell, saturating out-of-range coordinates onto
    /// the last drawable column/row.
    #[inline]
    fn index_of(&self, x: usize, y: usize) -> usize {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        (y + 1) * self.stride() + (x + 1)
    }

    /// Reset the border ring, terminators and blank drawable area.
    pub fn clear(&mut self) {
        let stride = self.stride();
        let width = self.width;
        let last_row = self.height + 1;
        let border = self.border;

        for (y, row) in self.cells.chunks_exact_mut(stride).enumerate() {
            if y == 0 || y == last_row {
                row.fill(border);
            } else {
                row[0] = border;
                row[1..=width].fill(BLANK);
                row[stride - 2] = border;
            }
            row[stride - 1] = LINE_TERMINATOR;
        }
    }

    /// Write one drawable cell.
    ///
    /// Coordinates past the right or bottom edge are clamped onto the last
    /// drawable column or row; this never panics.
    #[inline]
    pub fn set_cell(&mut self, x: usize, y: usize, ch: u8) {
        let idx = self.index_of(x, y);
        self.cells[idx] = ch;
    }

    /// Read one drawable cell (same clamping as [`set_cell`](Self::set_cell)).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[self.index_of(x, y)]
    }

    /// Write `text` starting at `(x, y)`.
    ///
    /// Text wraps back to column `x` on the next row when it reaches the
    /// right edge and is cut off at the bottom edge. Returns the number of
    /// bytes written.
    pub fn write_text(&mut self, x: usize, y: usize, text: &str) -> usize {
        if x >= self.width {
            return 0;
        }

        let mut col = x;
        let mut row = y;
        let mut written = 0;

        for byte in text.bytes() {
            if col >= self.width {
                col = x;
                row += 1;
            }
            if row >= self.height {
                break;
            }
            self.set_cell(col, row, byte);
            col += 1;
            written += 1;
        }

        written
    }

    /// The full frame, borders and terminators included, ready for a
    /// single write.
    #[inline]
    pub fn snapshot(&self) -> &[u8] {
        &self.cells
    }

    /// Iterate over the rows of the frame, terminators included.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.cells.chunks_exact(self.stride())
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("border", &char::from(self.border))
            .field("bytes", &self.cells.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_frame_shape(buffer: &FrameBuffer) {
        let (w, h) = buffer.size();
        let border = buffer.border();
        let rows: Vec<&[u8]> = buffer.rows().collect();
        assert_eq!(rows.len(), h + 2);

        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), w + 3);
            assert_eq!(row[w + 2], LINE_TERMINATOR);
            assert_eq!(row[0], border);
            assert_eq!(row[w + 1], border);
            if y == 0 || y == h + 1 {
                assert!(row[..=w + 1].iter().all(|&b| b == border));
            }
        }
    }

    #[test]
    fn test_buffer_new() {
        let buffer = FrameBuffer::new(160, 50, b'*').unwrap();
        assert_eq!(buffer.size(), (160, 50));
        assert_eq!(buffer.len(), 163 * 52);
        assert_frame_shape(&buffer);
    }

    #[test]
    fn test_buffer_zero_dimensions() {
        assert!(matches!(
            FrameBuffer::new(0, 24, b'*'),
            Err(Error::InvalidDimensions { width: 0, height: 24 })
        ));
        assert!(FrameBuffer::new(80, 0, b'*').is_err());
    }

    #[test]
    fn test_buffer_oversized_dimensions() {
        assert!(matches!(
            FrameBuffer::new(usize::MAX, 1, b'*'),
            Err(Error::InvalidDimensions { width: usize::MAX, height: 1 })
        ));
        assert!(FrameBuffer::new(usize::MAX / 4, usize::MAX / 4, b'*').is_err());
        assert!(FrameBuffer::new(usize::MAX / 2, 2, b'*').is_err());
    }

    #[test]
    fn test_buffer_clear_shape_small_sizes() {
        for (w, h) in [(1, 1), (1, 4), (5, 1), (7, 3)] {
            let mut buffer = FrameBuffer::new(w, h, b'#').unwrap();
            buffer.set_cell(0, 0, b'X');
            buffer.clear();
            assert_frame_shape(&buffer);
            assert_eq!(buffer.get(0, 0), BLANK);
        }
    }

    #[test]
    fn test_buffer_set_cell_offsets_into_border() {
        let mut buffer = FrameBuffer::new(4, 2, b'*').unwrap();
        buffer.set_cell(0, 0, b'A');
        buffer.set_cell(3, 1, b'B');

        let expected: &[u8] = b"******\n\
                               *A   *\n\
                               *   B*\n\
                               ******\n";
        assert_eq!(buffer.snapshot(), expected);
    }

    #[test]
    fn test_buffer_set_cell_clamps() {
        let mut buffer = FrameBuffer::new(10, 5, b'*').unwrap();
        buffer.set_cell(50, 2, b'X');
        assert_eq!(buffer.get(9, 2), b'X');

        buffer.set_cell(3, 99, b'Y');
        assert_eq!(buffer.get(3, 4), b'Y');

        buffer.set_cell(usize::MAX, usize::MAX, b'Z');
        assert_eq!(buffer.get(9, 4), b'Z');
        assert_frame_shape(&buffer);
    }

    #[test]
    fn test_buffer_write_text_wraps() {
        let mut buffer = FrameBuffer::new(6, 3, b'*').unwrap();
        let written = buffer.write_text(2, 0, "abcdefghijklmno");

        // Four columns per row from x = 2, three rows available.
        assert_eq!(written, 12);
        assert_eq!(buffer.get(2, 0), b'a');
        assert_eq!(buffer.get(5, 0), b'd');
        assert_eq!(buffer.get(2, 1), b'e');
        assert_eq!(buffer.get(5, 2), b'l');
        assert_eq!(buffer.get(0, 1), BLANK);
        assert_frame_shape(&buffer);
    }

    #[test]
    fn test_buffer_write_text_off_screen() {
        let mut buffer = FrameBuffer::new(6, 3, b'*').unwrap();
        assert_eq!(buffer.write_text(6, 0, "abc"), 0);
        assert_eq!(buffer.write_text(0, 3, "abc"), 0);
    }
}
