// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{PopupError, PopupInput, PopupKey, PopupOutcome};
use crate::{BoundedBuffer, CommandHistory, PromptBuffer, UNICODE_BACKSPACE,
            UNICODE_CARRIAGERETURN, VirtualKey};

/// Most digits the command number popup accepts.
pub const COMMAND_NUMBER_MAX_DIGITS: usize = 5;

/// Digits typed so far into the F9 "Enter command number" popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandNumberState {
    pub digits: BoundedBuffer<u16, COMMAND_NUMBER_MAX_DIGITS>,
}

impl CommandNumberState {
    /// The typed number. No digits parses as `0`, the oldest entry.
    #[must_use]
    pub fn value(&self) -> usize {
        self.digits.as_slice().iter().fold(0, |acc, &digit| {
            acc * 10 + usize::from(digit - u16::from(b'0'))
        })
    }

    #[must_use]
    pub fn digits_as_string(&self) -> String {
        String::from_utf16_lossy(self.digits.as_slice())
    }
}

fn is_ascii_digit(unit: u16) -> bool { (u16::from(b'0')..=u16::from(b'9')).contains(&unit) }

pub fn process_command_number(
    state: &mut CommandNumberState,
    input: PopupInput,
    prompt: &mut PromptBuffer,
    history: Option<&mut CommandHistory>,
) -> Result<PopupOutcome, PopupError> {
    match input.key {
        PopupKey::Special(VirtualKey::ESCAPE) => Ok(PopupOutcome::Cancelled),
        PopupKey::Special(_) => Ok(PopupOutcome::Continue),
        PopupKey::Char(UNICODE_CARRIAGERETURN) => {
            let history = history.ok_or(PopupError::HistoryUnavailable)?;
            let index = state.value();
            // Out of range numbers clamp to the newest entry.
            if let Some(entry) = history.retrieve_nth(index) {
                prompt.replace_all(entry);
            }
            Ok(PopupOutcome::Completed { submit_line: false })
        }
        PopupKey::Char(UNICODE_BACKSPACE) => {
            state.digits.pop();
            Ok(PopupOutcome::Continue)
        }
        PopupKey::Char(unit) if is_ascii_digit(unit) => {
            if !state.digits.try_push(unit) {
                tracing::debug!(
                    message = "command number popup is full, digit rejected",
                    digits = %state.digits_as_string()
                );
            }
            Ok(PopupOutcome::Continue)
        }
        PopupKey::Char(_) => Ok(PopupOutcome::Continue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ControlKeyState, assert_eq2, test_fixtures::history_with};

    fn feed(
        state: &mut CommandNumberState,
        text: &str,
        prompt: &mut PromptBuffer,
        history: &mut CommandHistory,
    ) -> PopupOutcome {
        let mut last = PopupOutcome::Continue;
        for unit in text.encode_utf16() {
            last = process_command_number(state, PopupInput::char(unit), prompt, Some(history))
                .unwrap();
        }
        last
    }

    #[test]
    fn test_empty_input_selects_oldest() {
        let mut history = history_with(&["a", "bb", "ccc"]);
        let mut prompt = PromptBuffer::default();
        let mut state = CommandNumberState::default();

        let outcome = feed(&mut state, "\r", &mut prompt, &mut history);

        assert_eq2!(outcome, PopupOutcome::Completed { submit_line: false });
        assert_eq2!(prompt.text().to_string_lossy(), "a");
        assert_eq2!(prompt.insertion_index(), 1);
        assert_eq2!(history.last_displayed(), Some(0));
    }

    #[test]
    fn test_number_past_newest_clamps() {
        let mut history = history_with(&["a", "bb", "ccc"]);
        let mut prompt = PromptBuffer::default();
        let mut state = CommandNumberState::default();

        feed(&mut state, "42\r", &mut prompt, &mut history);

        assert_eq2!(prompt.text().to_string_lossy(), "ccc");
        assert_eq2!(history.last_displayed(), Some(2));
    }

    #[test]
    fn test_digits_cap_and_non_digits_rejected() {
        let mut history = history_with(&["a"]);
        let mut prompt = PromptBuffer::default();
        let mut state = CommandNumberState::default();

        feed(&mut state, "12x34567", &mut prompt, &mut history);

        assert_eq2!(state.digits_as_string(), "12345");
        assert_eq2!(state.value(), 12345);
    }

    #[test]
    fn test_backspace_removes_last_digit() {
        let mut history = history_with(&["a", "bb", "ccc"]);
        let mut prompt = PromptBuffer::default();
        let mut state = CommandNumberState::default();

        feed(&mut state, "21\u{8}\r", &mut prompt, &mut history);

        assert_eq2!(prompt.text().to_string_lossy(), "ccc");
    }

    #[test]
    fn test_escape_cancels_without_touching_prompt() {
        let mut history = history_with(&["a", "bb"]);
        let mut prompt = PromptBuffer::default();
        prompt.replace_all(&[u16::from(b'z')]);
        let mut state = CommandNumberState::default();
        feed(&mut state, "1", &mut prompt, &mut history);

        let outcome = process_command_number(
            &mut state,
            PopupInput::special(VirtualKey::ESCAPE, ControlKeyState::empty()),
            &mut prompt,
            Some(&mut history),
        )
        .unwrap();

        assert_eq2!(outcome, PopupOutcome::Cancelled);
        assert_eq2!(prompt.text().to_string_lossy(), "z");
    }

    #[test]
    fn test_enter_without_history_is_an_error() {
        let mut prompt = PromptBuffer::default();
        let mut state = CommandNumberState::default();
        let result = process_command_number(
            &mut state,
            PopupInput::char(UNICODE_CARRIAGERETURN),
            &mut prompt,
            None,
        );
        assert_eq2!(result, Err(PopupError::HistoryUnavailable));
    }
}
