// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A [`Popup`] is a modal sub-editor drawn over the screen below the prompt. While one is
//! open, every keystroke goes to the top popup's [`Popup::process`] instead of the line
//! editor.
//!
//! Each popup moves through `Active -> (Completed | Cancelled)`:
//! - [`PopupOutcome::Completed`] means the popup already applied its effect to the
//!   prompt or the history.
//! - [`PopupOutcome::Cancelled`] means the prompt is unchanged.
//!
//! Either way the [`crate::PopupStack`] removes the popup and restores the screen cells
//! it covered.

use strum_macros::Display;

use super::{CommandListState, CommandNumberState, PopupError, process_command_list,
            process_command_number, process_copy_from_char, process_copy_to_char};
use crate::{CommandHistory, ControlKeyState, PromptBuffer, Rect, SavedRegion,
            VirtualKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PopupKindTag {
    CommandNumber,
    CommandList,
    CopyToChar,
    CopyFromChar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupKind {
    CommandNumber(CommandNumberState),
    CommandList(CommandListState),
    CopyToChar,
    CopyFromChar,
}

/// One keystroke as seen by a popup: either a character, or one of the special keys
/// popups react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKey {
    Char(u16),
    Special(VirtualKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupInput {
    pub key: PopupKey,
    pub modifiers: ControlKeyState,
}

impl PopupInput {
    #[must_use]
    pub fn char(unit: u16) -> Self {
        Self {
            key: PopupKey::Char(unit),
            modifiers: ControlKeyState::empty(),
        }
    }

    #[must_use]
    pub fn special(vk: VirtualKey, modifiers: ControlKeyState) -> Self {
        Self {
            key: PopupKey::Special(vk),
            modifiers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupOutcome {
    Continue,
    /// The effect is applied. `submit_line` asks the editor to complete the line as if
    /// Enter had been pressed at the prompt.
    Completed { submit_line: bool },
    Cancelled,
    SpawnChild(PopupKindTag),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub kind: PopupKind,
    /// Screen rectangle this popup draws into.
    pub region: Rect,
    /// Cells that were under `region` before the popup was drawn.
    pub backup: Option<SavedRegion>,
}

impl Popup {
    /// Create a popup of kind `tag`. The command list starts with the history's
    /// navigation cursor selected and shows at most `max_height` rows.
    #[must_use]
    pub fn new(tag: PopupKindTag, history: Option<&CommandHistory>, max_height: usize) -> Self {
        let kind = match tag {
            PopupKindTag::CommandNumber => PopupKind::CommandNumber(CommandNumberState::default()),
            PopupKindTag::CommandList => {
                PopupKind::CommandList(CommandListState::new(history, max_height))
            }
            PopupKindTag::CopyToChar => PopupKind::CopyToChar,
            PopupKindTag::CopyFromChar => PopupKind::CopyFromChar,
        };
        Self {
            kind,
            region: Rect::default(),
            backup: None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> PopupKindTag {
        match self.kind {
            PopupKind::CommandNumber(_) => PopupKindTag::CommandNumber,
            PopupKind::CommandList(_) => PopupKindTag::CommandList,
            PopupKind::CopyToChar => PopupKindTag::CopyToChar,
            PopupKind::CopyFromChar => PopupKindTag::CopyFromChar,
        }
    }

    /// Feed one keystroke to this popup.
    ///
    /// # Errors
    ///
    /// Returns [`PopupError::HistoryUnavailable`] if the popup needs a history and there
    /// is none. The prompt may be partially modified; the caller rolls it back.
    pub fn process(
        &mut self,
        input: PopupInput,
        prompt: &mut PromptBuffer,
        history: Option<&mut CommandHistory>,
    ) -> Result<PopupOutcome, PopupError> {
        match &mut self.kind {
            PopupKind::CommandNumber(state) => {
                process_command_number(state, input, prompt, history)
            }
            PopupKind::CommandList(state) => process_command_list(state, input, prompt, history),
            PopupKind::CopyToChar => process_copy_to_char(input, prompt, history),
            PopupKind::CopyFromChar => Ok(process_copy_from_char(input, prompt)),
        }
    }
}
