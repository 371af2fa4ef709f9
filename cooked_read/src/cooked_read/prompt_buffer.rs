// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Point, WideString, is_leading_surrogate, is_trailing_surrogate,
            next_code_point, next_word_start, prev_code_point, prev_word_start};

/// The line being composed. The insertion index is a UTF-16 offset that always sits on
/// a code point boundary, never between the two halves of a surrogate pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptBuffer {
    text: WideString,
    insertion_index: usize,
    /// Screen cell where the first unit of the prompt is echoed.
    origin: Point,
}

impl PromptBuffer {
    #[must_use]
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    /// Start with `initial_data` already typed and the cursor after it.
    #[must_use]
    pub fn with_initial_data(origin: Point, initial_data: &[u16]) -> Self {
        let mut it = Self::new(origin);
        it.replace_all(initial_data);
        it
    }

    #[must_use]
    pub fn text(&self) -> &WideString { &self.text }

    #[must_use]
    pub fn len(&self) -> usize { self.text.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.text.is_empty() }

    #[must_use]
    pub fn insertion_index(&self) -> usize { self.insertion_index }

    #[must_use]
    pub fn origin(&self) -> Point { self.origin }

    pub fn set_origin(&mut self, origin: Point) { self.origin = origin; }

    #[must_use]
    pub fn is_at_end(&self) -> bool { self.insertion_index == self.text.len() }

    /// Clamp to the text and snap back to the start of a surrogate pair.
    pub fn set_insertion_index(&mut self, index: usize) {
        let mut index = index.min(self.text.len());
        if index > 0
            && index < self.text.len()
            && is_trailing_surrogate(self.text[index])
            && is_leading_surrogate(self.text[index - 1])
        {
            index -= 1;
        }
        self.insertion_index = index;
    }

    pub fn move_left(&mut self) {
        self.insertion_index = prev_code_point(&self.text, self.insertion_index);
    }

    pub fn move_right(&mut self) {
        self.insertion_index = next_code_point(&self.text, self.insertion_index);
    }

    pub fn move_word_left(&mut self) {
        let index = prev_word_start(&self.text, self.insertion_index);
        self.set_insertion_index(index);
    }

    pub fn move_word_right(&mut self) {
        let index = next_word_start(&self.text, self.insertion_index);
        self.set_insertion_index(index);
    }

    pub fn move_home(&mut self) { self.insertion_index = 0; }

    pub fn move_end(&mut self) { self.insertion_index = self.text.len(); }

    /// Insert at the cursor and move the cursor past the inserted units.
    pub fn insert(&mut self, units: &[u16]) {
        let at = self.insertion_index;
        self.text.splice(at..at, units.iter().copied());
        self.insertion_index = at + units.len();
    }

    /// Replace the code point under the cursor (if any) with `units`.
    pub fn overwrite(&mut self, units: &[u16]) {
        let at = self.insertion_index;
        let end = next_code_point(&self.text, at);
        self.replace_range(at, end - at, units);
    }

    /// Replace up to `count` units starting at `start` with `units`, leaving the cursor
    /// right after them. `count` is clamped to the end of the text.
    pub fn replace_range(&mut self, start: usize, count: usize, units: &[u16]) {
        let start = start.min(self.text.len());
        let end = start.saturating_add(count).min(self.text.len());
        self.text.splice(start..end, units.iter().copied());
        self.set_insertion_index(start + units.len());
    }

    /// Replace the whole text. The cursor goes to the end.
    pub fn replace_all(&mut self, units: &[u16]) {
        self.text = WideString::from(units);
        self.insertion_index = self.text.len();
    }

    /// Remove `start..end` and put the cursor at `start`.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let end = end.min(self.text.len());
        let start = start.min(end);
        self.text.drain(start..end);
        self.set_insertion_index(start);
    }

    /// Backspace: remove the code point before the cursor.
    pub fn delete_before_cursor(&mut self) -> bool {
        if self.insertion_index == 0 {
            return false;
        }
        let start = prev_code_point(&self.text, self.insertion_index);
        self.delete_range(start, self.insertion_index);
        true
    }

    /// Delete key: remove the code point under the cursor.
    pub fn delete_at_cursor(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        let end = next_code_point(&self.text, self.insertion_index);
        self.delete_range(self.insertion_index, end);
        true
    }

    /// Remove the word before the cursor, like Ctrl+Backspace.
    pub fn delete_word_before_cursor(&mut self) -> bool {
        let start = prev_word_start(&self.text, self.insertion_index);
        if start == self.insertion_index {
            return false;
        }
        self.delete_range(start, self.insertion_index);
        true
    }

    pub fn delete_to_start(&mut self) { self.delete_range(0, self.insertion_index); }

    pub fn delete_to_end(&mut self) { self.text.truncate(self.insertion_index); }

    pub fn clear(&mut self) {
        self.text.clear();
        self.insertion_index = 0;
    }

    pub fn take_text(&mut self) -> WideString {
        self.insertion_index = 0;
        std::mem::take(&mut self.text)
    }
}
