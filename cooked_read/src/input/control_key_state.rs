// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier and lock keys held when an input event was generated. The bit values
    /// match the console API so they can be handed back to clients unchanged.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ControlKeyState: u32 {
        const RIGHT_ALT_PRESSED  = 0x0001;
        const LEFT_ALT_PRESSED   = 0x0002;
        const RIGHT_CTRL_PRESSED = 0x0004;
        const LEFT_CTRL_PRESSED  = 0x0008;
        const SHIFT_PRESSED      = 0x0010;
        const NUMLOCK_ON         = 0x0020;
        const SCROLLLOCK_ON      = 0x0040;
        const CAPSLOCK_ON        = 0x0080;
        const ENHANCED_KEY       = 0x0100;
    }
}

impl ControlKeyState {
    pub const ALT_PRESSED: Self = Self::RIGHT_ALT_PRESSED.union(Self::LEFT_ALT_PRESSED);
    pub const CTRL_PRESSED: Self = Self::RIGHT_CTRL_PRESSED.union(Self::LEFT_CTRL_PRESSED);

    #[must_use]
    pub fn is_ctrl_pressed(self) -> bool { self.intersects(Self::CTRL_PRESSED) }

    #[must_use]
    pub fn is_alt_pressed(self) -> bool { self.intersects(Self::ALT_PRESSED) }

    #[must_use]
    pub fn is_shift_pressed(self) -> bool { self.contains(Self::SHIFT_PRESSED) }
}

bitflags! {
    /// What kind of mouse event a [`crate::MouseEvent`] is. Empty means a button press
    /// or release.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MouseEventFlags: u32 {
        const MOUSE_MOVED    = 0x0001;
        const DOUBLE_CLICK   = 0x0002;
        const MOUSE_WHEELED  = 0x0004;
        const MOUSE_HWHEELED = 0x0008;
    }
}
