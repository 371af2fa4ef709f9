// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The two single keystroke popups: F2 copies text from the last command up to a
//! character, F4 deletes prompt text up to a character.

use super::{PopupError, PopupInput, PopupKey, PopupOutcome};
use crate::{CommandHistory, PromptBuffer, VirtualKey, find_unit};

/// Copy from the last command, starting at the insertion index, up to (not including)
/// the first `ch` found after the insertion index. The copied text overwrites the prompt
/// at the insertion index.
pub fn process_copy_to_char(
    input: PopupInput,
    prompt: &mut PromptBuffer,
    history: Option<&mut CommandHistory>,
) -> Result<PopupOutcome, PopupError> {
    let ch = match input.key {
        PopupKey::Special(VirtualKey::ESCAPE) => return Ok(PopupOutcome::Cancelled),
        PopupKey::Special(_) => return Ok(PopupOutcome::Continue),
        PopupKey::Char(ch) => ch,
    };

    let history = history.ok_or(PopupError::HistoryUnavailable)?;
    let Some(last_command) = history.last_command() else {
        return Ok(PopupOutcome::Completed { submit_line: false });
    };

    let cursor = prompt.insertion_index();
    if let Some(found) = find_unit(last_command, ch, cursor + 1) {
        let copied = &last_command[cursor..found];
        prompt.replace_range(cursor, copied.len(), copied);
    }

    Ok(PopupOutcome::Completed { submit_line: false })
}

/// Delete prompt text from the insertion index up to (not including) the first `ch` at
/// or after it, or to the end of the prompt when there is none.
#[must_use]
pub fn process_copy_from_char(input: PopupInput, prompt: &mut PromptBuffer) -> PopupOutcome {
    let ch = match input.key {
        PopupKey::Special(VirtualKey::ESCAPE) => return PopupOutcome::Cancelled,
        PopupKey::Special(_) => return PopupOutcome::Continue,
        PopupKey::Char(ch) => ch,
    };

    let cursor = prompt.insertion_index();
    let end = find_unit(prompt.text(), ch, cursor).unwrap_or(prompt.len());
    prompt.delete_range(cursor, end);

    PopupOutcome::Completed { submit_line: false }
}
