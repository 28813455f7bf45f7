//! Keymap: Key presses to session actions, and key-repeat debouncing.

use super::messages::{KeyCode, KeyModifiers};
use std::time::{Duration, Instant};

/// A command the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Leave the session.
    Quit,
    /// Start or stop continuous stepping.
    TogglePlay,
    /// Compute and record one generation.
    Step,
    /// Move one generation back.
    Back,
    /// Move one generation forward.
    Forward,
    /// Prompt for a path and save the current generation.
    Save,
    /// Prompt for new dimensions and restart history.
    Resize,
}

/// Map a key press to an action.
///
/// Letters are case-insensitive. Ctrl+C always quits; any other
/// Ctrl/Alt combination is ignored.
pub fn action_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.control && matches!(code, KeyCode::Char('c' | 'C')) {
        return Some(Action::Quit);
    }
    if modifiers.has_command() {
        return None;
    }

    match code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Left => Some(Action::Back),
        KeyCode::Right => Some(Action::Forward),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(Action::Quit),
            ' ' => Some(Action::TogglePlay),
            'n' => Some(Action::Step),
            'b' => Some(Action::Back),
            'f' => Some(Action::Forward),
            's' => Some(Action::Save),
            'r' => Some(Action::Resize),
            _ => None,
        },
        _ => None,
    }
}

/// Help text listing every binding.
pub const HELP: &str =
    "space play/pause  n step  b/\u{2190} back  f/\u{2192} forward  s save  r resize  q quit";

/// Default window for [`Debouncer`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Collapses an auto-repeat stream of the same key into one press.
///
/// Terminals without keyboard enhancement report held keys as a stream of
/// presses. A press of the same key within `window` of the previous one is
/// dropped, and the window slides with every dropped press, so the stream
/// stays collapsed for as long as the key is held.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    last: Option<(KeyCode, Instant)>,
}

impl Debouncer {
    /// Create a debouncer with the given window.
    pub const fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Whether a press of `code` at `now` should be delivered.
    pub fn accept(&mut self, code: KeyCode, now: Instant) -> bool {
        let repeat = matches!(
            self.last,
            Some((last_code, at)) if last_code == code && now.saturating_duration_since(at) < self.window
        );
        self.last = Some((code, now));
        !repeat
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap() {
        let none = KeyModifiers::NONE;
        assert_eq!(action_for(KeyCode::Char('q'), none), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Esc, none), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Char(' '), none), Some(Action::TogglePlay));
        assert_eq!(action_for(KeyCode::Char('N'), none), Some(Action::Step));
        assert_eq!(action_for(KeyCode::Char('b'), none), Some(Action::Back));
        assert_eq!(action_for(KeyCode::Left, none), Some(Action::Back));
        assert_eq!(action_for(KeyCode::Char('f'), none), Some(Action::Forward));
        assert_eq!(action_for(KeyCode::Right, none), Some(Action::Forward));
        assert_eq!(action_for(KeyCode::Char('s'), none), Some(Action::Save));
        assert_eq!(action_for(KeyCode::Char('r'), none), Some(Action::Resize));
        assert_eq!(action_for(KeyCode::Char('x'), none), None);
        assert_eq!(action_for(KeyCode::Enter, none), None);
    }

    #[test]
    fn test_keymap_modifiers() {
        assert_eq!(
            action_for(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
        assert_eq!(action_for(KeyCode::Char('s'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn test_debouncer_collapses_repeats() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        let n = KeyCode::Char('n');

        assert!(debouncer.accept(n, t0));
        // Auto-repeat at 30 ms intervals is swallowed for as long as it lasts.
        for i in 1..20 {
            assert!(!debouncer.accept(n, t0 + Duration::from_millis(30 * i)));
        }
        // A pause longer than the window is a new press.
        assert!(debouncer.accept(n, t0 + Duration::from_millis(30 * 19 + 150)));
    }

    #[test]
    fn test_debouncer_other_key_passes() {
        let mut debouncer = Debouncer::default();
        let t0 = Instant::now();
        assert!(debouncer.accept(KeyCode::Char('n'), t0));
        assert!(debouncer.accept(KeyCode::Char('b'), t0 + Duration::from_millis(5)));
        assert!(debouncer.accept(KeyCode::Char('n'), t0 + Duration::from_millis(10)));
    }
}
