// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! UTF-16 text, the unit the prompt, the history, and the event queue all agree on.
//!
//! Indices into a [`WideString`] are code-unit offsets. Every helper that moves an index
//! (by code point or by word) lands on a code-point boundary, so a surrogate pair is
//! never split.

use std::{fmt::{Debug, Display, Formatter},
          ops::{Deref, DerefMut}};

use unicode_width::UnicodeWidthChar;

pub const UNICODE_NULL: u16 = 0x00;
pub const UNICODE_CTRL_C: u16 = 0x03;
pub const UNICODE_BACKSPACE: u16 = 0x08;
pub const UNICODE_TAB: u16 = 0x09;
pub const UNICODE_LINEFEED: u16 = 0x0A;
pub const UNICODE_CARRIAGERETURN: u16 = 0x0D;
pub const UNICODE_CTRL_Z: u16 = 0x1A;
pub const UNICODE_ESCAPE: u16 = 0x1B;
pub const UNICODE_SPACE: u16 = 0x20;
pub const UNICODE_DEL: u16 = 0x7F;

/// Owned sequence of UTF-16 code units. May hold unpaired surrogates; conversion to
/// [`String`] is lossy.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct WideString {
    units: Vec<u16>,
}

impl WideString {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn from_units(units: impl Into<Vec<u16>>) -> Self {
        Self {
            units: units.into(),
        }
    }

    #[must_use]
    pub fn as_units(&self) -> &[u16] { &self.units }

    #[must_use]
    pub fn into_units(self) -> Vec<u16> { self.units }

    #[must_use]
    pub fn to_string_lossy(&self) -> String { String::from_utf16_lossy(&self.units) }

    /// Number of bytes this text occupies once transcoded for an ANSI (DBCS) client.
    #[must_use]
    pub fn ansi_len(&self) -> usize {
        self.units
            .iter()
            .map(|&unit| if is_fullwidth_unit(unit) { 2 } else { 1 })
            .sum()
    }

    #[must_use]
    pub fn starts_with_units(&self, prefix: &[u16]) -> bool {
        self.units.starts_with(prefix)
    }
}

impl Deref for WideString {
    type Target = Vec<u16>;
    fn deref(&self) -> &Self::Target { &self.units }
}

impl DerefMut for WideString {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.units }
}

impl From<&str> for WideString {
    fn from(value: &str) -> Self {
        Self {
            units: value.encode_utf16().collect(),
        }
    }
}

impl From<String> for WideString {
    fn from(value: String) -> Self { Self::from(value.as_str()) }
}

impl From<&[u16]> for WideString {
    fn from(value: &[u16]) -> Self { Self::from_units(value) }
}

impl From<Vec<u16>> for WideString {
    fn from(value: Vec<u16>) -> Self { Self::from_units(value) }
}

impl Display for WideString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

impl Debug for WideString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_string_lossy())
    }
}

#[must_use]
pub fn is_leading_surrogate(unit: u16) -> bool { (0xD800..=0xDBFF).contains(&unit) }

#[must_use]
pub fn is_trailing_surrogate(unit: u16) -> bool { (0xDC00..=0xDFFF).contains(&unit) }

/// East-Asian fullwidth glyph: one code unit that occupies two display cells (and two
/// bytes for an ANSI client).
#[must_use]
pub fn is_fullwidth_unit(unit: u16) -> bool {
    char::from_u32(u32::from(unit)).is_some_and(is_fullwidth_char)
}

#[must_use]
pub fn is_fullwidth_char(ch: char) -> bool { ch.width() == Some(2) }

fn is_word_delimiter(unit: u16) -> bool {
    char::from_u32(u32::from(unit)).is_some_and(char::is_whitespace)
}

/// Index of the code point before `index`. Steps over a whole surrogate pair.
#[must_use]
pub fn prev_code_point(text: &[u16], index: usize) -> usize {
    let index = index.min(text.len());
    if index == 0 {
        return 0;
    }
    let it = index - 1;
    if it > 0 && is_trailing_surrogate(text[it]) && is_leading_surrogate(text[it - 1]) {
        it - 1
    } else {
        it
    }
}

/// Index of the code point after `index`. Steps over a whole surrogate pair.
#[must_use]
pub fn next_code_point(text: &[u16], index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    if is_leading_surrogate(text[index])
        && index + 1 < text.len()
        && is_trailing_surrogate(text[index + 1])
    {
        index + 2
    } else {
        index + 1
    }
}

/// Start of the word before `index`, skipping any whitespace in between.
#[must_use]
pub fn prev_word_start(text: &[u16], index: usize) -> usize {
    let mut it = index.min(text.len());
    while it > 0 && is_word_delimiter(text[it - 1]) {
        it -= 1;
    }
    while it > 0 && !is_word_delimiter(text[it - 1]) {
        it -= 1;
    }
    it
}

/// Start of the word after `index`. Lands on the end of the text when there is none.
#[must_use]
pub fn next_word_start(text: &[u16], index: usize) -> usize {
    let mut it = index.min(text.len());
    while it < text.len() && !is_word_delimiter(text[it]) {
        it += 1;
    }
    while it < text.len() && is_word_delimiter(text[it]) {
        it += 1;
    }
    it
}

/// Find `needle` in `text` starting at `from`.
#[must_use]
pub fn find_unit(text: &[u16], needle: u16, from: usize) -> Option<usize> {
    text.get(from..)?
        .iter()
        .position(|&unit| unit == needle)
        .map(|offset| from + offset)
}
