// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Converts [`crossterm::event::Event`]s into console [`InputEvent`] records, so a
//! terminal can act as the input producer for an [`crate::InputEventQueue`].

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton,
                       MouseEventKind};

use crate::{ControlKeyState, FocusEvent, InlineVec, InputEvent, KeyEvent, MouseEvent,
            MouseEventFlags, UNICODE_BACKSPACE, UNICODE_CARRIAGERETURN, UNICODE_DEL,
            UNICODE_ESCAPE, UNICODE_TAB, VirtualKey, point, size};

const WHEEL_DELTA: u32 = 120;

/// A single crossterm event can expand into several records (a paste, or a character
/// outside the basic multilingual plane that needs a surrogate pair). Events with no
/// console counterpart produce nothing.
#[must_use]
pub fn input_events_from_crossterm(event: Event) -> InlineVec<InputEvent> {
    let mut acc = InlineVec::new();
    match event {
        Event::Key(key_event) => {
            let control_key_state = control_key_state_from(key_event.modifiers);
            let key_down = key_event.kind != KeyEventKind::Release;
            push_key_code(&mut acc, key_event.code, control_key_state, key_down);
        }
        Event::Mouse(mouse_event) => {
            acc.push(InputEvent::Mouse(mouse_event_from(mouse_event)));
        }
        Event::Resize(cols, rows) => {
            acc.push(InputEvent::WindowBufferSize(size(
                usize::from(cols),
                usize::from(rows),
            )));
        }
        Event::FocusGained => acc.push(InputEvent::Focus(FocusEvent { set_focus: true })),
        Event::FocusLost => acc.push(InputEvent::Focus(FocusEvent { set_focus: false })),
        Event::Paste(text) => {
            for ch in text.chars() {
                push_char(&mut acc, ch, ControlKeyState::empty(), true);
            }
        }
    }
    acc
}

fn control_key_state_from(modifiers: KeyModifiers) -> ControlKeyState {
    let mut it = ControlKeyState::empty();
    if modifiers.contains(KeyModifiers::SHIFT) {
        it |= ControlKeyState::SHIFT_PRESSED;
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        it |= ControlKeyState::LEFT_CTRL_PRESSED;
    }
    if modifiers.contains(KeyModifiers::ALT) {
        it |= ControlKeyState::LEFT_ALT_PRESSED;
    }
    it
}

fn push_key_code(
    acc: &mut InlineVec<InputEvent>,
    code: KeyCode,
    control_key_state: ControlKeyState,
    key_down: bool,
) {
    let (vk, unicode_char) = match code {
        KeyCode::Char(ch) => {
            push_char(acc, ch, control_key_state, key_down);
            return;
        }
        KeyCode::Enter => (VirtualKey::RETURN, UNICODE_CARRIAGERETURN),
        KeyCode::Backspace if control_key_state.is_ctrl_pressed() => {
            (VirtualKey::BACK, UNICODE_DEL)
        }
        KeyCode::Backspace => (VirtualKey::BACK, UNICODE_BACKSPACE),
        KeyCode::Tab => (VirtualKey::TAB, UNICODE_TAB),
        KeyCode::BackTab => (VirtualKey::TAB, UNICODE_TAB),
        KeyCode::Esc => (VirtualKey::ESCAPE, UNICODE_ESCAPE),
        KeyCode::Left => (VirtualKey::LEFT, 0),
        KeyCode::Right => (VirtualKey::RIGHT, 0),
        KeyCode::Up => (VirtualKey::UP, 0),
        KeyCode::Down => (VirtualKey::DOWN, 0),
        KeyCode::Home => (VirtualKey::HOME, 0),
        KeyCode::End => (VirtualKey::END, 0),
        KeyCode::PageUp => (VirtualKey::PRIOR, 0),
        KeyCode::PageDown => (VirtualKey::NEXT, 0),
        KeyCode::Insert => (VirtualKey::INSERT, 0),
        KeyCode::Delete => (VirtualKey::DELETE, 0),
        KeyCode::Pause => (VirtualKey::PAUSE, 0),
        KeyCode::F(n) => match VirtualKey::function_key(n) {
            Some(vk) => (vk, 0),
            None => return,
        },
        _ => return,
    };

    let control_key_state = if code == KeyCode::BackTab {
        control_key_state | ControlKeyState::SHIFT_PRESSED
    } else {
        control_key_state
    };

    let mut key = KeyEvent::from_virtual_key(vk, control_key_state).with_char(unicode_char);
    key.key_down = key_down;
    acc.push(InputEvent::Key(key));
}

fn push_char(
    acc: &mut InlineVec<InputEvent>,
    ch: char,
    control_key_state: ControlKeyState,
    key_down: bool,
) {
    let vk = VirtualKey::from_ascii_letter(ch).unwrap_or(VirtualKey::NONE);

    // Ctrl+letter produces the matching C0 control character.
    let is_ctrl_only =
        control_key_state.is_ctrl_pressed() && !control_key_state.is_alt_pressed();
    if is_ctrl_only && ch.is_ascii_alphabetic() {
        let unit = u16::from(ch.to_ascii_uppercase() as u8) & 0x1F;
        let mut key = KeyEvent::from_virtual_key(vk, control_key_state).with_char(unit);
        key.key_down = key_down;
        acc.push(InputEvent::Key(key));
        return;
    }

    let mut buffer = [0_u16; 2];
    for &unit in ch.encode_utf16(&mut buffer).iter() {
        let mut key = KeyEvent::from_virtual_key(vk, control_key_state).with_char(unit);
        key.key_down = key_down;
        acc.push(InputEvent::Key(key));
    }
}

fn mouse_event_from(mouse_event: crossterm::event::MouseEvent) -> MouseEvent {
    let button_bit = |button: MouseButton| match button {
        MouseButton::Left => 0x0001,
        MouseButton::Right => 0x0002,
        MouseButton::Middle => 0x0004,
    };
    let wheel_up = WHEEL_DELTA << 16;
    let wheel_down = WHEEL_DELTA.wrapping_neg() << 16;

    let (button_state, event_flags) = match mouse_event.kind {
        MouseEventKind::Down(button) => (button_bit(button), MouseEventFlags::empty()),
        MouseEventKind::Up(_) => (0, MouseEventFlags::empty()),
        MouseEventKind::Drag(button) => (button_bit(button), MouseEventFlags::MOUSE_MOVED),
        MouseEventKind::Moved => (0, MouseEventFlags::MOUSE_MOVED),
        MouseEventKind::ScrollUp => (wheel_up, MouseEventFlags::MOUSE_WHEELED),
        MouseEventKind::ScrollDown => (wheel_down, MouseEventFlags::MOUSE_WHEELED),
        MouseEventKind::ScrollRight => (wheel_up, MouseEventFlags::MOUSE_HWHEELED),
        MouseEventKind::ScrollLeft => (wheel_down, MouseEventFlags::MOUSE_HWHEELED),
    };

    MouseEvent {
        position: point(usize::from(mouse_event.column), usize::from(mouse_event.row)),
        button_state,
        control_key_state: control_key_state_from(mouse_event.modifiers),
        event_flags,
    }
}
