// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The line editing state machine behind a cooked read.
//!
//! ```text
//!                    ┌──────────────── Enter ────────────────▶ DoneWithCarriageReturn
//! Accumulating ──────┤
//!   ▲      │         └──── char in ctrl wakeup mask ─────────▶ DoneWithWakeupMask
//!   │      ▼
//!   └─ PopupStack (while any popup is open, every key goes to the top popup)
//! ```
//!
//! [`CookedLineEditor::read`] pulls one event at a time from the [`InputEventQueue`].
//! When the queue runs dry it returns [`ReadProgress::Pending`] with all partial state
//! kept in the editor, so the owning session can park it and call `read` again after
//! the next write.

use std::io;

use strum_macros::Display;

use super::{CookedReadError, DEVELOPMENT_MODE, PromptBuffer, PromptLayout,
            handle_command_line_key, is_command_line_editing_key, is_popup_key,
            render_prompt};
use crate::{CommandHistory, ControlKeyState, HistoryId, HistoryRegistry, InputEvent,
            InputEventQueue, InputModeFlags, KeyEvent, Point, PopupContext, PopupInput,
            PopupKey, PopupKindTag, PopupStack, PopupStackOutcome, QueueRead, ReadArgs,
            ScreenBuffer, SessionConfig, UNICODE_BACKSPACE, UNICODE_CARRIAGERETURN,
            UNICODE_DEL, UNICODE_LINEFEED, WideString, is_leading_surrogate,
            is_trailing_surrogate, ok, point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EditorState {
    Accumulating,
    DoneWithWakeupMask,
    DoneWithCarriageReturn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadProgress {
    /// The queue ran dry before the line completed.
    Pending,
    Done,
}

/// Borrows of session state the editor needs while it handles input.
#[derive(Debug)]
pub struct EditorContext<'a> {
    pub input_queue: &'a mut InputEventQueue,
    pub histories: &'a mut HistoryRegistry,
    pub screen: &'a mut dyn ScreenBuffer,
    pub config: &'a SessionConfig,
    pub input_mode: InputModeFlags,
    pub insert_mode: &'a mut bool,
}

impl EditorContext<'_> {
    pub fn history_mut(&mut self, id: Option<HistoryId>) -> Option<&mut CommandHistory> {
        id.and_then(|id| self.histories.get_mut(id))
    }

    #[must_use]
    pub fn history(&self, id: Option<HistoryId>) -> Option<&CommandHistory> {
        id.and_then(|id| self.histories.get(id))
    }

    #[must_use]
    pub fn is_echo(&self) -> bool { self.input_mode.contains(InputModeFlags::ECHO) }

    #[must_use]
    pub fn is_processed(&self) -> bool { self.input_mode.contains(InputModeFlags::PROCESSED) }
}

/// What a finished read hands back to its client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedLine {
    /// Ends with `"\r\n"` (processed input) or `"\r"` when completed by Enter.
    pub text: WideString,
    pub control_key_state: ControlKeyState,
    pub completed_by: EditorState,
}

#[derive(Debug)]
pub struct CookedLineEditor {
    pub(crate) prompt: PromptBuffer,
    pub(crate) popups: PopupStack,
    pub(crate) state: EditorState,
    pub(crate) history_id: Option<HistoryId>,
    pub(crate) ctrl_wakeup_mask: u32,
    pub(crate) control_key_state: ControlKeyState,
    /// A leading surrogate waiting for its trailing half.
    pub(crate) pending_lead_surrogate: Option<u16>,
    pub(crate) layout: PromptLayout,
    /// The prompt changed since it was last echoed.
    pub(crate) dirty: bool,
}

impl CookedLineEditor {
    #[must_use]
    pub fn new(
        origin: Point,
        initial_data: &[u16],
        ctrl_wakeup_mask: u32,
        history_id: Option<HistoryId>,
    ) -> Self {
        Self {
            prompt: PromptBuffer::with_initial_data(origin, initial_data),
            popups: PopupStack::new(),
            state: EditorState::Accumulating,
            history_id,
            ctrl_wakeup_mask,
            control_key_state: ControlKeyState::empty(),
            pending_lead_surrogate: None,
            layout: PromptLayout {
                cells: 0,
                cursor: origin,
                last_row: origin.row,
            },
            dirty: !initial_data.is_empty(),
        }
    }

    #[must_use]
    pub fn prompt(&self) -> &PromptBuffer { &self.prompt }

    #[must_use]
    pub fn popups(&self) -> &PopupStack { &self.popups }

    #[must_use]
    pub fn state(&self) -> EditorState { self.state }

    #[must_use]
    pub fn is_done(&self) -> bool { self.state != EditorState::Accumulating }

    #[must_use]
    pub fn history_id(&self) -> Option<HistoryId> { self.history_id }

    #[must_use]
    pub fn layout(&self) -> PromptLayout { self.layout }

    /// Consume input until the line completes or the queue runs dry.
    ///
    /// # Errors
    ///
    /// Returns [`CookedReadError::Fatal`] if the screen can't be written to.
    pub fn read(&mut self, ctx: &mut EditorContext<'_>) -> Result<ReadProgress, CookedReadError> {
        while !self.is_done() {
            match ctx.input_queue.read(ReadArgs::blocking(1)) {
                QueueRead::WouldBlock => {
                    self.flush_echo(ctx)?;
                    return Ok(ReadProgress::Pending);
                }
                QueueRead::Ready(batch) => {
                    for event in batch.events {
                        self.handle_event(event, ctx)?;
                    }
                }
            }
        }

        self.flush_echo(ctx)?;
        if self.state == EditorState::DoneWithCarriageReturn && ctx.is_echo() {
            let rows = ctx.screen.size().rows;
            let next_row = (self.layout.last_row + 1).min(rows.saturating_sub(1));
            ctx.screen.set_cursor_position(point(0, next_row))?;
        }

        tracing::debug!(
            message = "cooked read completed",
            state = %self.state,
            len = self.prompt.len(),
            control_key_state = ?self.control_key_state
        );
        Ok(ReadProgress::Done)
    }

    /// Apply one input event. Anything other than a key press is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CookedReadError::Fatal`] if the screen can't be written to.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
        ctx: &mut EditorContext<'_>,
    ) -> Result<(), CookedReadError> {
        let InputEvent::Key(key) = event else {
            return ok!();
        };
        if !key.key_down || (key.virtual_key_code.is_modifier() && key.unicode_char == 0) {
            return ok!();
        }

        DEVELOPMENT_MODE.then(|| {
            // % is Display, ? is Debug.
            tracing::debug!(
                message = "cooked read key",
                vk = ?key.virtual_key_code,
                unicode_char = key.unicode_char,
                control_key_state = ?key.control_key_state,
                popups = self.popups.len()
            );
        });

        if !self.popups.is_empty() {
            return self.handle_popup_key(&key, ctx);
        }
        if is_command_line_editing_key(&key) {
            return handle_command_line_key(self, &key, ctx);
        }
        if key.unicode_char != 0 {
            return self.handle_char(key.unicode_char, key.control_key_state, ctx);
        }
        ok!()
    }

    fn handle_popup_key(
        &mut self,
        key: &KeyEvent,
        ctx: &mut EditorContext<'_>,
    ) -> Result<(), CookedReadError> {
        let input = if is_popup_key(key) {
            PopupInput::special(key.virtual_key_code, key.control_key_state)
        } else if key.unicode_char != 0 {
            PopupInput {
                key: PopupKey::Char(key.unicode_char),
                modifiers: key.control_key_state,
            }
        } else {
            return ok!();
        };

        let outcome = {
            let mut popup_ctx = PopupContext {
                prompt: &mut self.prompt,
                history: self.history_id.and_then(|id| ctx.histories.get_mut(id)),
                screen: &mut *ctx.screen,
                anchor_row: self.layout.last_row + 1,
                max_height: ctx.config.popup_max_height,
            };
            self.popups.process(input, &mut popup_ctx)?
        };

        if let PopupStackOutcome::Closed { submit_line } = outcome {
            self.dirty = true;
            if submit_line {
                self.control_key_state = key.control_key_state;
                self.handle_carriage_return(ctx);
            }
        }
        ok!()
    }

    /// Handle a typed character: wakeup mask, Enter, the processed mode editing
    /// characters, then plain text.
    pub(crate) fn handle_char(
        &mut self,
        wch: u16,
        modifiers: ControlKeyState,
        ctx: &mut EditorContext<'_>,
    ) -> Result<(), CookedReadError> {
        if wch < 0x20 && self.ctrl_wakeup_mask & (1 << wch) != 0 {
            // The waking char is for the client only, so echo what is there and keep
            // the char itself off the screen.
            self.flush_echo(ctx)?;
            self.prompt.delete_to_end();
            self.prompt.insert(&[wch]);
            self.control_key_state = modifiers;
            self.transition(EditorState::DoneWithWakeupMask);
            return ok!();
        }

        if wch == UNICODE_CARRIAGERETURN {
            self.control_key_state = modifiers;
            self.handle_carriage_return(ctx);
            return ok!();
        }

        if ctx.is_processed() {
            if wch == UNICODE_BACKSPACE {
                self.dirty |= self.prompt.delete_before_cursor();
                return ok!();
            }
            if wch == UNICODE_DEL && modifiers.is_ctrl_pressed() {
                self.dirty |= self.prompt.delete_word_before_cursor();
                return ok!();
            }
        }

        if is_leading_surrogate(wch) {
            self.pending_lead_surrogate = Some(wch);
            return ok!();
        }

        match self.pending_lead_surrogate.take() {
            Some(lead) if is_trailing_surrogate(wch) => self.insert_units(&[lead, wch], ctx),
            _ if is_trailing_surrogate(wch) => {
                tracing::debug!(message = "dropped unpaired trailing surrogate", unit = wch);
            }
            _ => self.insert_units(&[wch], ctx),
        }
        ok!()
    }

    /// Insert or overwrite at the cursor depending on the insert mode.
    pub(crate) fn insert_units(&mut self, units: &[u16], ctx: &EditorContext<'_>) {
        if *ctx.insert_mode {
            self.prompt.insert(units);
        } else {
            self.prompt.overwrite(units);
        }
        self.dirty = true;
    }

    pub(crate) fn handle_carriage_return(&mut self, ctx: &mut EditorContext<'_>) {
        self.prompt.move_end();
        self.dirty = true;

        if ctx.is_echo() {
            let suppress_duplicates = ctx.config.suppress_duplicates;
            if let Some(history) = ctx.history_mut(self.history_id)
                && let Err(error) = history.add(self.prompt.text(), suppress_duplicates)
            {
                tracing::debug!(message = "line not added to history", ?error);
            }
        }

        self.transition(EditorState::DoneWithCarriageReturn);
    }

    /// Echo the prompt, then open a popup of kind `tag` below it.
    pub(crate) fn open_popup(
        &mut self,
        tag: PopupKindTag,
        ctx: &mut EditorContext<'_>,
    ) -> Result<(), CookedReadError> {
        self.flush_echo(ctx)?;
        let mut popup_ctx = PopupContext {
            prompt: &mut self.prompt,
            history: self.history_id.and_then(|id| ctx.histories.get_mut(id)),
            screen: &mut *ctx.screen,
            anchor_row: self.layout.last_row + 1,
            max_height: ctx.config.popup_max_height,
        };
        self.popups.push(tag, &mut popup_ctx)?;
        ok!()
    }

    /// Redraw the prompt if it changed and echo is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen can't be written to.
    pub fn flush_echo(&mut self, ctx: &mut EditorContext<'_>) -> io::Result<()> {
        if !self.dirty || !ctx.is_echo() {
            self.dirty = false;
            return Ok(());
        }
        self.layout = render_prompt(&self.prompt, ctx.screen, self.layout.cells)?;
        self.dirty = false;
        Ok(())
    }

    fn transition(&mut self, next: EditorState) {
        tracing::debug!(message = "cooked read state", from = %self.state, to = %next);
        self.state = next;
    }

    /// Tear down a read that won't complete. Open popups close without applying their
    /// effect and the typed text is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen under the popups can't be restored.
    pub fn cancel(&mut self, screen: &mut dyn ScreenBuffer) -> io::Result<()> {
        self.popups.close_all(screen)?;
        self.prompt.clear();
        self.pending_lead_surrogate = None;
        self.dirty = false;
        Ok(())
    }

    /// Hand the finished line over, with the line ending Enter adds.
    #[must_use]
    pub fn into_completed_line(mut self, input_mode: InputModeFlags) -> CompletedLine {
        let mut text = self.prompt.take_text();
        if self.state == EditorState::DoneWithCarriageReturn {
            text.push(UNICODE_CARRIAGERETURN);
            if input_mode.contains(InputModeFlags::PROCESSED) {
                text.push(UNICODE_LINEFEED);
            }
        }
        CompletedLine {
            text,
            control_key_state: self.control_key_state,
            completed_by: self.state,
        }
    }
}
