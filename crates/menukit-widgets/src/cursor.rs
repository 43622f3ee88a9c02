#![forbid(unsafe_code)]

//! Grapheme-aware single-line edit buffer.
//!
//! The cursor index counts grapheme clusters, not bytes or chars, so a
//! combining sequence or emoji is stepped over and deleted as one unit.

use menukit_core::event::{KeyCode, KeyEvent, Modifiers};
use unicode_segmentation::UnicodeSegmentation;

/// Text plus a cursor, embedded by text inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextCursor {
    value: String,
    /// Grapheme index in `0..=grapheme_count()`.
    cursor: usize,
    max_length: Option<usize>,
}

impl TextCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value`, cursor at the end.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.set_value(value);
        self
    }

    /// Limit the text to `max` graphemes.
    pub fn with_max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Replace the text, moving the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.grapheme_count();
    }

    pub fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    /// Text before the cursor, used to place the caret.
    pub fn before_cursor(&self) -> &str {
        &self.value[..self.grapheme_byte_offset(self.cursor)]
    }

    /// Apply an editing key. Returns `true` if text or cursor changed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(Modifiers::CTRL);
        match key.code {
            KeyCode::Char(c) if !ctrl => self.insert_char(c),
            KeyCode::Backspace => self.delete_back(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_to(0),
            KeyCode::End => self.move_to(self.grapheme_count()),
            _ => false,
        }
    }

    /// Whether `key` is an editing key this buffer consumes.
    pub fn captures(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(_) => !key.ctrl(),
            KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End => true,
            _ => false,
        }
    }

    fn insert_char(&mut self, c: char) -> bool {
        if let Some(max) = self.max_length
            && self.grapheme_count() >= max
        {
            return false;
        }
        let before = self.grapheme_count();
        let byte_offset = self.grapheme_byte_offset(self.cursor);
        self.value.insert(byte_offset, c);
        // A combining mark merges into the previous cluster.
        if self.grapheme_count() > before {
            self.cursor += 1;
        }
        true
    }

    fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.grapheme_byte_offset(self.cursor - 1);
        let end = self.grapheme_byte_offset(self.cursor);
        self.value.drain(start..end);
        self.cursor -= 1;
        true
    }

    fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.grapheme_count() {
            return false;
        }
        let start = self.grapheme_byte_offset(self.cursor);
        let end = self.grapheme_byte_offset(self.cursor + 1);
        self.value.drain(start..end);
        true
    }

    fn move_left(&mut self) -> bool {
        self.cursor > 0 && self.move_to(self.cursor - 1)
    }

    fn move_right(&mut self) -> bool {
        self.move_to((self.cursor + 1).min(self.grapheme_count()))
    }

    fn move_to(&mut self, index: usize) -> bool {
        let changed = self.cursor != index;
        self.cursor = index;
        changed
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }
}
