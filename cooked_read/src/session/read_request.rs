// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{ControlKeyState, InlineString, ProcessId, WideString, is_fullwidth_unit,
            is_leading_surrogate};

/// Room a client has for one line when it doesn't say otherwise, in UTF-16 units.
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 4096;

/// A client's "read console line" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub owner: ProcessId,
    /// Picks the command history. Matched case-insensitively.
    pub exe_name: InlineString,
    /// Bit `n` set means control char `n` (below `0x20`) completes the read at once.
    pub ctrl_wakeup_mask: u32,
    /// Text the prompt starts with, as if already typed.
    pub initial_data: WideString,
    /// `false` for ANSI callers, whose lengths are in bytes.
    pub is_unicode: bool,
    /// Most units (bytes for ANSI callers) one response may carry. The rest of a longer
    /// line is handed out by later reads.
    pub buffer_capacity: usize,
}

impl ReadRequest {
    #[must_use]
    pub fn new(owner: ProcessId, exe_name: &str) -> Self {
        Self {
            owner,
            exe_name: exe_name.into(),
            ctrl_wakeup_mask: 0,
            initial_data: WideString::new(),
            is_unicode: true,
            buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
        }
    }

    #[must_use]
    pub fn with_ctrl_wakeup_mask(mut self, ctrl_wakeup_mask: u32) -> Self {
        self.ctrl_wakeup_mask = ctrl_wakeup_mask;
        self
    }

    #[must_use]
    pub fn with_initial_data(mut self, initial_data: impl Into<WideString>) -> Self {
        self.initial_data = initial_data.into();
        self
    }

    #[must_use]
    pub fn with_ansi(mut self) -> Self {
        self.is_unicode = false;
        self
    }

    #[must_use]
    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity.max(1);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    pub line: WideString,
    /// Modifiers held when the line completed.
    pub control_key_state: ControlKeyState,
    /// Length of `line` in UTF-16 units, or in bytes for ANSI callers.
    pub length: usize,
}

impl ReadResponse {
    #[must_use]
    pub fn to_string_lossy(&self) -> String { self.line.to_string_lossy() }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    Completed(ReadResponse),
    /// No line yet. The read is parked in the session and finishes on a later write.
    WouldBlock,
}

/// How many units of `text` fit in `capacity`. Fullwidth units cost two for ANSI
/// callers, and a surrogate pair is never split (unless nothing else would fit).
#[must_use]
pub fn fit_to_capacity(text: &[u16], capacity: usize, is_unicode: bool) -> usize {
    let mut used = 0;
    let mut end = 0;
    for &unit in text {
        let cost = if !is_unicode && is_fullwidth_unit(unit) { 2 } else { 1 };
        if used + cost > capacity {
            break;
        }
        used += cost;
        end += 1;
    }
    if end > 1 && end < text.len() && is_leading_surrogate(text[end - 1]) {
        end -= 1;
    }
    // Always make progress, even with a one byte buffer and a fullwidth glyph.
    end.max(1).min(text.len())
}
