// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The per-console context that owns everything a cooked read touches: the input queue,
//! the history registry, the screen, and at most one parked read.
//!
//! A read that runs out of input is parked here as a [`CookedLineEditor`] value. It is
//! resumed by [`ConsoleSession::notify`], which every [`ConsoleSession::write_input`]
//! calls after queueing the new event. Resumption is an ordinary function call made by
//! the writer, under whatever lock guards the session.

use std::sync::Arc;

use crate::{CancelReason, ControlKeyState, CookedLineEditor, CookedReadError, EditorContext,
            HistoryRegistry, InputEvent, InputEventQueue, InputModeFlags, OffscreenBuffer,
            ProcessId, ReadProgress, ReadRequest, ReadResponse, ReadStatus, ScreenBuffer,
            SessionConfig, StdMutex, UNICODE_CTRL_C, VirtualKey, WideString,
            fit_to_capacity};

pub type SafeConsoleSession<S = OffscreenBuffer> = Arc<StdMutex<ConsoleSession<S>>>;

/// What the client of a parked read asked for, kept until the read finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadParams {
    pub owner: ProcessId,
    pub is_unicode: bool,
    pub buffer_capacity: usize,
}

impl From<&ReadRequest> for ReadParams {
    fn from(request: &ReadRequest) -> Self {
        Self {
            owner: request.owner,
            is_unicode: request.is_unicode,
            buffer_capacity: request.buffer_capacity,
        }
    }
}

#[derive(Debug)]
struct PendingRead {
    params: ReadParams,
    editor: CookedLineEditor,
}

/// Result of waking the parked read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeOutcome {
    /// No read was parked.
    Idle,
    /// The read consumed what was queued and is parked again.
    StillPending,
    /// The read finished. Collect it with [`ConsoleSession::take_finished_read`].
    Finished,
}

#[derive(Debug)]
pub struct ConsoleSession<S: ScreenBuffer = OffscreenBuffer> {
    input_queue: InputEventQueue,
    histories: HistoryRegistry,
    config: SessionConfig,
    screen: S,
    input_mode: InputModeFlags,
    insert_mode: bool,
    pending_read: Option<PendingRead>,
    finished_read: Option<(ProcessId, Result<ReadResponse, CookedReadError>)>,
    /// The part of a completed line that didn't fit the client's buffer.
    pending_input: Option<WideString>,
}

impl<S: ScreenBuffer> ConsoleSession<S> {
    #[must_use]
    pub fn new(config: SessionConfig, screen: S) -> Self {
        tracing::debug!(message = "console session created", ?config);
        Self {
            input_queue: InputEventQueue::new(),
            histories: HistoryRegistry::new(
                config.number_of_history_buffers,
                config.history_buffer_size,
            ),
            input_mode: config.input_mode,
            insert_mode: config.insert_mode,
            config,
            screen,
            pending_read: None,
            finished_read: None,
            pending_input: None,
        }
    }

    #[must_use]
    pub fn into_safe(self) -> SafeConsoleSession<S> { Arc::new(StdMutex::new(self)) }

    #[must_use]
    pub fn input_queue(&self) -> &InputEventQueue { &self.input_queue }

    #[must_use]
    pub fn histories(&self) -> &HistoryRegistry { &self.histories }

    pub fn histories_mut(&mut self) -> &mut HistoryRegistry { &mut self.histories }

    #[must_use]
    pub fn config(&self) -> &SessionConfig { &self.config }

    #[must_use]
    pub fn screen(&self) -> &S { &self.screen }

    pub fn screen_mut(&mut self) -> &mut S { &mut self.screen }

    #[must_use]
    pub fn input_mode(&self) -> InputModeFlags { self.input_mode }

    pub fn set_input_mode(&mut self, input_mode: InputModeFlags) { self.input_mode = input_mode; }

    #[must_use]
    pub fn insert_mode(&self) -> bool { self.insert_mode }

    #[must_use]
    pub fn has_pending_read(&self) -> bool { self.pending_read.is_some() }

    #[must_use]
    pub fn pending_read_editor(&self) -> Option<&CookedLineEditor> {
        self.pending_read.as_ref().map(|it| &it.editor)
    }

    #[must_use]
    pub fn pending_input_len(&self) -> usize { self.pending_input.as_ref().map_or(0, |it| it.len()) }

    /// Resize the history of `exe_name`, and mark it most recently used.
    pub fn set_number_of_commands(&mut self, exe_name: &str, commands: usize) -> bool {
        self.histories.set_number_of_commands(exe_name, commands)
    }

    /// Start a cooked read. Leftover text from a previous line that didn't fit is handed
    /// out first, without editing.
    ///
    /// # Errors
    ///
    /// - [`CookedReadError::ReadAlreadyPending`] if a read is already parked.
    /// - [`CookedReadError::Fatal`] if the screen can't be written to.
    pub fn read_console(&mut self, request: ReadRequest) -> Result<ReadStatus, CookedReadError> {
        if let Some(pending) = &self.pending_read {
            tracing::warn!(
                message = "read rejected, another read is parked",
                owner = %request.owner,
                parked_owner = %pending.params.owner
            );
            return Err(CookedReadError::ReadAlreadyPending { owner: request.owner });
        }

        let params = ReadParams::from(&request);

        if let Some(leftover) = self.pending_input.take() {
            tracing::debug!(message = "serving pending input", len = leftover.len());
            return Ok(ReadStatus::Completed(self.respond(
                leftover,
                ControlKeyState::empty(),
                params,
            )));
        }

        let history_id = self.histories.allocate(&request.exe_name, request.owner);
        let editor = CookedLineEditor::new(
            self.screen.cursor_position(),
            &request.initial_data,
            request.ctrl_wakeup_mask,
            history_id,
        );
        self.drive(editor, params)
    }

    /// Queue one event and resume the parked read. In processed mode Ctrl+C and
    /// Ctrl+Break are not queued; they cancel the parked read instead.
    pub fn write_input(&mut self, event: InputEvent) -> usize {
        if let Some(reason) = self.signal_for(&event) {
            if reason == CancelReason::CtrlBreak {
                self.input_queue.flush();
            }
            self.notify(Some(reason));
            return 1;
        }
        let written = self.input_queue.write(event);
        self.notify(None);
        written
    }

    /// Queue events exactly as given and resume the parked read. In processed mode the
    /// batch stops at the first Ctrl+C or Ctrl+Break: the events before it are queued
    /// and read, then the signal is applied as [`Self::write_input`] would, and the rest
    /// of the batch is dropped.
    pub fn write_input_bulk(&mut self, events: impl IntoIterator<Item = InputEvent>) -> usize {
        let mut batch = Vec::new();
        let mut signal = None;
        for event in events {
            if let Some(reason) = self.signal_for(&event) {
                signal = Some(reason);
                break;
            }
            batch.push(event);
        }

        let written = self.input_queue.write_bulk(batch);
        self.notify(None);

        let Some(reason) = signal else {
            return written;
        };
        if reason == CancelReason::CtrlBreak {
            self.input_queue.flush();
        }
        tracing::debug!(message = "signal in bulk write", %reason, queued = written);
        self.notify(Some(reason));
        written + 1
    }

    fn signal_for(&self, event: &InputEvent) -> Option<CancelReason> {
        let InputEvent::Key(key) = event else {
            return None;
        };
        if !key.key_down || !self.input_mode.contains(InputModeFlags::PROCESSED) {
            return None;
        }
        if key.virtual_key_code == VirtualKey::CANCEL {
            return Some(CancelReason::CtrlBreak);
        }
        (key.unicode_char == UNICODE_CTRL_C).then_some(CancelReason::CtrlC)
    }

    /// Wake the parked read. With `None` it picks up where it left off; with a reason it
    /// is cancelled, closing any popups without applying them and dropping the text.
    pub fn notify(&mut self, reason: Option<CancelReason>) -> WakeOutcome {
        let Some(PendingRead { params, mut editor }) = self.pending_read.take() else {
            return WakeOutcome::Idle;
        };

        if let Some(reason) = reason {
            tracing::debug!(message = "parked read cancelled", owner = %params.owner, %reason);
            let result = match editor.cancel(&mut self.screen) {
                Ok(()) => Err(CookedReadError::Cancelled(reason)),
                Err(error) => Err(CookedReadError::Fatal(error)),
            };
            self.finished_read = Some((params.owner, result));
            return WakeOutcome::Finished;
        }

        tracing::debug!(message = "parked read resumed", owner = %params.owner);
        match self.drive(editor, params) {
            Ok(ReadStatus::WouldBlock) => WakeOutcome::StillPending,
            Ok(ReadStatus::Completed(response)) => {
                self.finished_read = Some((params.owner, Ok(response)));
                WakeOutcome::Finished
            }
            Err(error) => {
                self.finished_read = Some((params.owner, Err(error)));
                WakeOutcome::Finished
            }
        }
    }

    /// Cancel the parked read, if any.
    pub fn cancel(&mut self, reason: CancelReason) -> WakeOutcome { self.notify(Some(reason)) }

    #[must_use]
    pub fn has_finished_read(&self) -> bool { self.finished_read.is_some() }

    /// The result of a read that finished after it was parked.
    pub fn take_finished_read(&mut self) -> Option<Result<ReadResponse, CookedReadError>> {
        self.finished_read.take().map(|(_, result)| result)
    }

    /// A client went away: cancel its parked read and detach it from its history.
    pub fn free_history(&mut self, owner: ProcessId) {
        if self
            .pending_read
            .as_ref()
            .is_some_and(|it| it.params.owner == owner)
        {
            self.notify(Some(CancelReason::HandleClosing));
        }
        self.histories.free(owner);
    }

    /// Session teardown.
    pub fn shutdown(&mut self) {
        self.notify(Some(CancelReason::ThreadDying));
        self.input_queue.flush();
        self.histories.clear();
        self.pending_input = None;
        tracing::debug!(message = "console session shut down");
    }

    fn drive(
        &mut self,
        mut editor: CookedLineEditor,
        params: ReadParams,
    ) -> Result<ReadStatus, CookedReadError> {
        let progress = {
            let mut ctx = EditorContext {
                input_queue: &mut self.input_queue,
                histories: &mut self.histories,
                screen: &mut self.screen,
                config: &self.config,
                input_mode: self.input_mode,
                insert_mode: &mut self.insert_mode,
            };
            editor.read(&mut ctx)
        };

        match progress {
            Ok(ReadProgress::Pending) => {
                tracing::debug!(
                    message = "read parked, waiting for input",
                    owner = %params.owner,
                    prompt_len = editor.prompt().len()
                );
                self.pending_read = Some(PendingRead { params, editor });
                Ok(ReadStatus::WouldBlock)
            }
            Ok(ReadProgress::Done) => {
                let completed = editor.into_completed_line(self.input_mode);
                Ok(ReadStatus::Completed(self.respond(
                    completed.text,
                    completed.control_key_state,
                    params,
                )))
            }
            Err(error) => {
                tracing::error!(message = "read failed", owner = %params.owner, %error);
                // The screen is already failing, so only the first error is reported.
                _ = editor.cancel(&mut self.screen);
                Err(error)
            }
        }
    }

    /// Fit `text` into the client's buffer, keeping whatever is left for the next read.
    fn respond(
        &mut self,
        mut text: WideString,
        control_key_state: ControlKeyState,
        params: ReadParams,
    ) -> ReadResponse {
        let split = fit_to_capacity(&text, params.buffer_capacity, params.is_unicode);
        if split < text.len() {
            let rest = WideString::from(text.split_off(split));
            tracing::debug!(
                message = "line longer than client buffer, keeping the rest",
                returned = split,
                kept = rest.len()
            );
            self.pending_input = Some(rest);
        }
        let length = if params.is_unicode { text.len() } else { text.ansi_len() };
        ReadResponse {
            line: text,
            control_key_state,
            length,
        }
    }
}
