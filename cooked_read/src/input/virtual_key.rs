// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

/// Virtual key code as reported by the keyboard driver. Only the codes the line editor
/// reacts to have names.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    pub const NONE: Self = Self(0x00);
    /// Ctrl+Break.
    pub const CANCEL: Self = Self(0x03);
    pub const BACK: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const RETURN: Self = Self(0x0D);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const MENU: Self = Self(0x12);
    pub const PAUSE: Self = Self(0x13);
    pub const CAPITAL: Self = Self(0x14);
    pub const ESCAPE: Self = Self(0x1B);
    pub const SPACE: Self = Self(0x20);
    pub const PRIOR: Self = Self(0x21);
    pub const NEXT: Self = Self(0x22);
    pub const END: Self = Self(0x23);
    pub const HOME: Self = Self(0x24);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);
    pub const INSERT: Self = Self(0x2D);
    pub const DELETE: Self = Self(0x2E);
    pub const F1: Self = Self(0x70);
    pub const F2: Self = Self(0x71);
    pub const F3: Self = Self(0x72);
    pub const F4: Self = Self(0x73);
    pub const F5: Self = Self(0x74);
    pub const F6: Self = Self(0x75);
    pub const F7: Self = Self(0x76);
    pub const F8: Self = Self(0x77);
    pub const F9: Self = Self(0x78);
    pub const F10: Self = Self(0x79);
    pub const F11: Self = Self(0x7A);
    pub const F12: Self = Self(0x7B);
    pub const NUMLOCK: Self = Self(0x90);
    pub const SCROLL: Self = Self(0x91);

    /// Function key `F{n}` for `n` in `1..=12`.
    #[must_use]
    pub fn function_key(n: u8) -> Option<Self> {
        (1..=12)
            .contains(&n)
            .then(|| Self(Self::F1.0 + u16::from(n) - 1))
    }

    /// Keys that only change modifier or lock state and never produce input of their
    /// own.
    #[must_use]
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::SHIFT
                | Self::CONTROL
                | Self::MENU
                | Self::CAPITAL
                | Self::NUMLOCK
                | Self::SCROLL
        )
    }

    /// Letter keys share their virtual key code with the uppercase ASCII letter.
    #[must_use]
    pub fn from_ascii_letter(ch: char) -> Option<Self> {
        ch.is_ascii_alphanumeric()
            .then(|| Self(u16::from(ch.to_ascii_uppercase() as u8)))
    }
}

impl Debug for VirtualKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "VK({:#04x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_function_keys() {
        assert_eq2!(VirtualKey::function_key(1), Some(VirtualKey::F1));
        assert_eq2!(VirtualKey::function_key(9), Some(VirtualKey::F9));
        assert_eq2!(VirtualKey::function_key(12), Some(VirtualKey::F12));
        assert_eq2!(VirtualKey::function_key(0), None);
        assert_eq2!(VirtualKey::function_key(13), None);
    }

    #[test]
    fn test_letters() {
        assert_eq2!(VirtualKey::from_ascii_letter('c'), Some(VirtualKey(0x43)));
        assert_eq2!(VirtualKey::from_ascii_letter('7'), Some(VirtualKey(0x37)));
        assert_eq2!(VirtualKey::from_ascii_letter('!'), None);
    }
}
