//! Prompt: Single-line text entry on the status line.

use crate::actor::{KeyCode, KeyModifiers};

/// What a submitted prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Path to save the current generation to.
    SavePath,
    /// New grid dimensions, `width height`.
    Dimensions,
}

impl PromptKind {
    /// Label shown before the input.
    pub const fn label(self) -> &'static str {
        match self {
            Self::SavePath => "save to",
            Self::Dimensions => "size (width height)",
        }
    }
}

/// Result of feeding a key to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Still editing.
    Pending,
    /// Enter was pressed; carries the text.
    Submit(String),
    /// Esc was pressed.
    Cancel,
}

/// A single-line editor with a cursor.
#[derive(Debug, Clone)]
pub struct Prompt {
    kind: PromptKind,
    /// Current text content.
    content: String,
    /// Cursor position (byte offset, always on a char boundary).
    cursor: usize,
}

impl Prompt {
    /// Create a prompt prefilled with `initial`, cursor at the end.
    pub fn new(kind: PromptKind, initial: &str) -> Self {
        Self {
            kind,
            content: initial.to_string(),
            cursor: initial.len(),
        }
    }

    /// What the prompt is for.
    pub const fn kind(&self) -> PromptKind {
        self.kind
    }

    /// Get the current text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Feed a key press.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> PromptOutcome {
        match code {
            KeyCode::Enter => return PromptOutcome::Submit(self.content.clone()),
            KeyCode::Esc => return PromptOutcome::Cancel,
            KeyCode::Char(c) if !modifiers.has_command() && !c.is_control() => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor_left(),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.content.len(),
            _ => {}
        }
        PromptOutcome::Pending
    }

    /// Status line text, with a bar marking the cursor.
    pub fn display(&self) -> String {
        let (before, after) = self.content.split_at(self.cursor);
        format!("{}: {before}\u{258f}{after}   [enter] ok  [esc] cancel", self.kind.label())
    }

    fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    fn backspace(&mut self) {
        if let Some((prev, _)) = self.content[..self.cursor].char_indices().last() {
            self.content.remove(prev);
            self.cursor = prev;
        }
    }

    /// Delete the character at the cursor.
    fn delete(&mut self) {
        if self.cursor < self.content.len() {
            self.content.remove(self.cursor);
        }
    }

    fn cursor_left(&mut self) {
        self.cursor = self.content[..self.cursor]
            .char_indices()
            .last()
            .map_or(0, |(i, _)| i);
    }

    fn cursor_right(&mut self) {
        if let Some(c) = self.content[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(prompt: &mut Prompt, code: KeyCode) -> PromptOutcome {
        prompt.handle_key(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_prompt_editing() {
        let mut prompt = Prompt::new(PromptKind::SavePath, "out.txt");
        press(&mut prompt, KeyCode::Backspace);
        press(&mut prompt, KeyCode::Backspace);
        press(&mut prompt, KeyCode::Backspace);
        press(&mut prompt, KeyCode::Char('l'));
        press(&mut prompt, KeyCode::Char('i'));
        press(&mut prompt, KeyCode::Char('f'));
        press(&mut prompt, KeyCode::Char('e'));
        assert_eq!(
            press(&mut prompt, KeyCode::Enter),
            PromptOutcome::Submit("out.life".to_string())
        );
    }

    #[test]
    fn test_prompt_cursor_and_multibyte() {
        let mut prompt = Prompt::new(PromptKind::SavePath, "é");
        press(&mut prompt, KeyCode::Home);
        press(&mut prompt, KeyCode::Char('a'));
        press(&mut prompt, KeyCode::Right);
        press(&mut prompt, KeyCode::Char('b'));
        assert_eq!(prompt.content(), "aéb");
        press(&mut prompt, KeyCode::Left);
        press(&mut prompt, KeyCode::Backspace);
        assert_eq!(prompt.content(), "ab");
        press(&mut prompt, KeyCode::Delete);
        assert_eq!(prompt.content(), "a");
    }

    #[test]
    fn test_prompt_cancel_and_modifiers() {
        let mut prompt = Prompt::new(PromptKind::Dimensions, "10 10");
        prompt.handle_key(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert_eq!(prompt.content(), "10 10");
        assert_eq!(press(&mut prompt, KeyCode::Esc), PromptOutcome::Cancel);
    }

    #[test]
    fn test_prompt_display_marks_cursor() {
        let mut prompt = Prompt::new(PromptKind::Dimensions, "8 6");
        press(&mut prompt, KeyCode::Left);
        assert!(prompt.display().starts_with("size (width height): 8 \u{258f}6"));
    }
}
