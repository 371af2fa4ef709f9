// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{PopupError, PopupInput, PopupKey, PopupKindTag, PopupOutcome};
use crate::{CommandHistory, PromptBuffer, UNICODE_CARRIAGERETURN, VirtualKey};

/// Rows shown by a command list popup when the screen doesn't say otherwise.
pub const COMMAND_LIST_DEFAULT_HEIGHT: usize = 10;

/// Scroll and selection state of the F7 history browser. Both indices point into the
/// owning [`CommandHistory`], index 0 being the oldest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandListState {
    pub selected: usize,
    /// First visible entry.
    pub top: usize,
    /// Visible rows, fixed when the popup opens.
    pub height: usize,
}

impl Default for CommandListState {
    fn default() -> Self {
        Self {
            selected: 0,
            top: 0,
            height: COMMAND_LIST_DEFAULT_HEIGHT,
        }
    }
}

impl CommandListState {
    /// Select the history's navigation cursor (or the newest entry) and center it.
    #[must_use]
    pub fn new(history: Option<&CommandHistory>, max_height: usize) -> Self {
        let count = history.map_or(0, CommandHistory::len);
        let newest = count.saturating_sub(1);
        let selected = history
            .and_then(CommandHistory::last_displayed)
            .unwrap_or(newest)
            .min(newest);
        let height = count.min(max_height).max(1);

        let mut it = Self {
            selected,
            top: selected.saturating_sub(height / 2),
            height,
        };
        it.scroll_into_view(count);
        it
    }

    /// Adjust `top` so `selected` is visible and the window never runs past the end.
    pub fn scroll_into_view(&mut self, count: usize) {
        if self.selected < self.top {
            self.top = self.selected;
        }
        if self.selected >= self.top + self.height {
            self.top = self.selected + 1 - self.height;
        }
        self.top = self.top.min(count.saturating_sub(self.height));
    }

    #[must_use]
    pub fn visible_range(&self, count: usize) -> std::ops::Range<usize> {
        self.top.min(count)..(self.top + self.height).min(count)
    }
}

pub fn process_command_list(
    state: &mut CommandListState,
    input: PopupInput,
    prompt: &mut PromptBuffer,
    history: Option<&mut CommandHistory>,
) -> Result<PopupOutcome, PopupError> {
    let history = history.ok_or(PopupError::HistoryUnavailable)?;
    if history.is_empty() {
        return Ok(PopupOutcome::Cancelled);
    }
    let newest = history.len() - 1;
    state.selected = state.selected.min(newest);

    match input.key {
        PopupKey::Char(UNICODE_CARRIAGERETURN) => {
            copy_selected(state, prompt, history);
            return Ok(PopupOutcome::Completed { submit_line: true });
        }
        PopupKey::Char(_) => return Ok(PopupOutcome::Continue),
        PopupKey::Special(vk) => match vk {
            VirtualKey::ESCAPE => return Ok(PopupOutcome::Cancelled),
            VirtualKey::F9 => {
                return Ok(PopupOutcome::SpawnChild(PopupKindTag::CommandNumber));
            }
            VirtualKey::LEFT | VirtualKey::RIGHT => {
                copy_selected(state, prompt, history);
                return Ok(PopupOutcome::Completed { submit_line: false });
            }
            VirtualKey::DELETE => {
                history.remove(state.selected);
                if history.is_empty() {
                    return Ok(PopupOutcome::Completed { submit_line: false });
                }
                state.selected = state.selected.min(history.len() - 1);
            }
            VirtualKey::UP => {
                if input.modifiers.is_shift_pressed() && state.selected > 0 {
                    swap_or_log(history, state.selected, state.selected - 1);
                }
                state.selected = state.selected.saturating_sub(1);
            }
            VirtualKey::DOWN => {
                if input.modifiers.is_shift_pressed() && state.selected < newest {
                    swap_or_log(history, state.selected, state.selected + 1);
                }
                state.selected = (state.selected + 1).min(newest);
            }
            VirtualKey::HOME => state.selected = 0,
            VirtualKey::END => state.selected = newest,
            VirtualKey::PRIOR => state.selected = state.selected.saturating_sub(state.height),
            VirtualKey::NEXT => state.selected = (state.selected + state.height).min(newest),
            _ => return Ok(PopupOutcome::Continue),
        },
    }

    state.scroll_into_view(history.len());
    Ok(PopupOutcome::Continue)
}

fn copy_selected(state: &CommandListState, prompt: &mut PromptBuffer, history: &mut CommandHistory) {
    if let Some(entry) = history.retrieve_nth(state.selected) {
        prompt.replace_all(entry);
    }
}

fn swap_or_log(history: &mut CommandHistory, index_a: usize, index_b: usize) {
    if let Err(error) = history.swap(index_a, index_b) {
        tracing::warn!(message = "history swap failed", ?error);
    }
}
