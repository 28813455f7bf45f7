//! Terminal: Raw-mode setup, ANSI output, and grid placement.
//!
//! This module contains:
//! - [`TerminalGuard`]: Enters raw mode and restores the terminal on drop
//! - [`OutputBuffer`]: Frame accumulator flushed in one write
//! - [`Viewport`]: Scales and centers a grid in the available area
//! - [`color`]: The drawing palette

pub mod color;
mod output;
mod viewport;

pub use color::Rgb;
pub use output::OutputBuffer;
pub use viewport::Viewport;

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;

/// Owns the terminal while an interactive session runs.
///
/// Dropping the guard (including during a panic unwind) leaves raw mode,
/// the alternate screen, and keyboard enhancement.
#[derive(Debug)]
pub struct TerminalGuard {
    alternate_screen: bool,
    keyboard_enhanced: bool,
}

impl TerminalGuard {
    /// Enter raw mode, hide the cursor, and optionally switch to the
    /// alternate screen.
    ///
    /// Keyboard enhancement is requested when the terminal supports it, so
    /// key repeat and release events can be told apart from presses.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails.
    pub fn enter(alternate_screen: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        // From here on a failure must still undo raw mode; the guard does it.
        let mut guard = Self {
            alternate_screen: false,
            keyboard_enhanced: false,
        };

        let mut stdout = io::stdout();
        if alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
            guard.alternate_screen = true;
        }
        execute!(stdout, cursor::Hide)?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
            guard.keyboard_enhanced = true;
        }

        log::debug!(
            "terminal ready (alternate screen: {}, keyboard enhancement: {})",
            guard.alternate_screen,
            guard.keyboard_enhanced
        );
        Ok(guard)
    }

    /// Whether the terminal reports key repeat and release events.
    pub const fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Current terminal size in columns and rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be queried.
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        if self.keyboard_enhanced {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout, cursor::Show);
        if self.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
        log::debug!("terminal restored");
    }
}
