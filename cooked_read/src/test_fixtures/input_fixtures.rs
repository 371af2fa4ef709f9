// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommandHistory, ControlKeyState, HistoryId, InputEvent, KeyEvent, VirtualKey,
            WideString};

/// Key down for a BMP character.
pub fn key_char(ch: char) -> InputEvent {
    let mut units = [0; 2];
    let unit = ch.encode_utf16(&mut units)[0];
    InputEvent::Key(KeyEvent::from_char(unit))
}

/// Key down for a non character key.
pub fn key_vk(vk: VirtualKey, control_key_state: ControlKeyState) -> InputEvent {
    InputEvent::Key(KeyEvent::from_virtual_key(vk, control_key_state))
}

/// Key down for a key that has both a virtual key and a character, like Enter or
/// Escape.
pub fn key_vk_with(vk: VirtualKey, control_key_state: ControlKeyState, ch: char) -> InputEvent {
    let mut units = [0; 2];
    let unit = ch.encode_utf16(&mut units)[0];
    InputEvent::Key(KeyEvent::from_virtual_key(vk, control_key_state).with_char(unit))
}

/// One key down per UTF-16 unit of `text`.
pub fn typed(text: &str) -> Vec<InputEvent> {
    text.encode_utf16()
        .map(|unit| InputEvent::Key(KeyEvent::from_char(unit)))
        .collect()
}

pub fn history_with(lines: &[&str]) -> CommandHistory {
    let mut history = CommandHistory::new(HistoryId(0), "test.exe", lines.len().max(50));
    for line in lines {
        history.add(&WideString::from(*line), false).unwrap();
    }
    history
}
