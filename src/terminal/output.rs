//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use super::Rgb;
use std::io::Write;

/// Pre-allocated buffer for building a frame of ANSI escape sequences.
///
/// A whole frame is accumulated here, then flushed in a single `write()`
/// so the terminal never shows a half-drawn grid.
#[derive(Debug)]
pub struct OutputBuffer {
    data: Vec<u8>,
    /// Last background written, to skip redundant color sequences.
    bg: Option<Rgb>,
    /// Last foreground written.
    fg: Option<Rgb>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            bg: None,
            fg: None,
        }
    }

    /// Create a buffer sized for a full-screen frame (64KB).
    pub fn new() -> Self {
        Self::with_capacity(65536)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
        self.bg = None;
        self.fg = None;
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write `count` spaces.
    #[inline]
    pub fn write_spaces(&mut self, count: usize) {
        self.data.resize(self.data.len() + count, b' ');
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H; writing into a Vec cannot fail.
        let _ = write!(
            self.data,
            "\x1b[{};{}H",
            u32::from(y) + 1,
            u32::from(x) + 1
        );
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Set foreground color (true color), skipped if already active.
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        if self.fg != Some(color) {
            let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
            self.fg = Some(color);
        }
    }

    /// Set background color (true color), skipped if already active.
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        if self.bg != Some(color) {
            let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
            self.bg = Some(color);
        }
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
        self.bg = None;
        self.fg = None;
    }

    /// Clear the entire screen.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
