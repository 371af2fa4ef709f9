// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::{ControlKeyState, MouseEventFlags, Point, Size, VirtualKey, is_fullwidth_unit};

/// One record from the input producer. Events are plain values; the
/// [`crate::InputEventQueue`] owns them exclusively while they are queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    WindowBufferSize(Size),
    Menu(MenuEvent),
    Focus(FocusEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key_down: bool,
    pub repeat_count: u16,
    pub virtual_key_code: VirtualKey,
    pub virtual_scan_code: u16,
    /// UTF-16 code unit, `0` for keys that produce no character.
    pub unicode_char: u16,
    pub control_key_state: ControlKeyState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseEvent {
    pub position: Point,
    pub button_state: u32,
    pub control_key_state: ControlKeyState,
    pub event_flags: MouseEventFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEvent {
    pub command_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusEvent {
    pub set_focus: bool,
}

impl KeyEvent {
    /// Key down for a character key with no virtual key information.
    #[must_use]
    pub fn from_char(unicode_char: u16) -> Self {
        Self {
            key_down: true,
            repeat_count: 1,
            virtual_key_code: VirtualKey::NONE,
            virtual_scan_code: 0,
            unicode_char,
            control_key_state: ControlKeyState::empty(),
        }
    }

    /// Key down for a key that produces no character (arrows, function keys).
    #[must_use]
    pub fn from_virtual_key(
        virtual_key_code: VirtualKey,
        control_key_state: ControlKeyState,
    ) -> Self {
        Self {
            key_down: true,
            repeat_count: 1,
            virtual_key_code,
            virtual_scan_code: 0,
            unicode_char: 0,
            control_key_state,
        }
    }

    #[must_use]
    pub fn with_char(mut self, unicode_char: u16) -> Self {
        self.unicode_char = unicode_char;
        self
    }

    #[must_use]
    pub fn with_repeat_count(mut self, repeat_count: u16) -> Self {
        self.repeat_count = repeat_count;
        self
    }

    #[must_use]
    pub fn key_up(mut self) -> Self {
        self.key_down = false;
        self
    }

    #[must_use]
    pub fn is_fullwidth(&self) -> bool { is_fullwidth_unit(self.unicode_char) }

    /// Two key events describe the same keystroke (all fields except the repeat count).
    #[must_use]
    pub fn is_same_keystroke(&self, other: &Self) -> bool {
        self.key_down == other.key_down
            && self.virtual_key_code == other.virtual_key_code
            && self.virtual_scan_code == other.virtual_scan_code
            && self.unicode_char == other.unicode_char
            && self.control_key_state == other.control_key_state
    }
}

impl MouseEvent {
    #[must_use]
    pub fn is_move(&self) -> bool { self.event_flags.contains(MouseEventFlags::MOUSE_MOVED) }
}

impl InputEvent {
    #[must_use]
    pub fn is_key(&self) -> bool { matches!(self, InputEvent::Key(_)) }

    #[must_use]
    pub fn as_key(&self) -> Option<&KeyEvent> {
        match self {
            InputEvent::Key(key) => Some(key),
            _ => None,
        }
    }
}

impl From<KeyEvent> for InputEvent {
    fn from(value: KeyEvent) -> Self { InputEvent::Key(value) }
}

impl From<MouseEvent> for InputEvent {
    fn from(value: MouseEvent) -> Self { InputEvent::Mouse(value) }
}
