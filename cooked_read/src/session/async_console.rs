// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, MutexGuard, PoisonError};

use tokio::sync::Notify;

use crate::{CancelReason, ConsoleSession, CookedReadError, InputEvent, OffscreenBuffer,
            ReadRequest, ReadResponse, ReadStatus, SafeConsoleSession, ScreenBuffer,
            WakeOutcome};

/// Lets a task `await` a line while other tasks feed the session input. The writer that
/// completes a parked read signals the waiting task.
#[derive(Debug)]
pub struct AsyncConsole<S: ScreenBuffer = OffscreenBuffer> {
    session: SafeConsoleSession<S>,
    read_finished: Arc<Notify>,
}

impl<S: ScreenBuffer> Clone for AsyncConsole<S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            read_finished: self.read_finished.clone(),
        }
    }
}

impl<S: ScreenBuffer> AsyncConsole<S> {
    #[must_use]
    pub fn new(session: SafeConsoleSession<S>) -> Self {
        Self {
            session,
            read_finished: Arc::new(Notify::new()),
        }
    }

    #[must_use]
    pub fn session(&self) -> &SafeConsoleSession<S> { &self.session }

    /// A panic while holding the lock leaves the session usable; nothing in it is left
    /// half updated across a call.
    pub fn lock(&self) -> MutexGuard<'_, ConsoleSession<S>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write_input(&self, event: InputEvent) -> usize {
        let (written, is_finished) = {
            let mut session = self.lock();
            let written = session.write_input(event);
            (written, session.has_finished_read())
        };
        if is_finished {
            self.read_finished.notify_one();
        }
        written
    }

    pub fn cancel(&self, reason: CancelReason) {
        if self.lock().cancel(reason) == WakeOutcome::Finished {
            self.read_finished.notify_one();
        }
    }

    /// Read one line, waiting for input as long as it takes.
    ///
    /// # Errors
    ///
    /// Whatever [`ConsoleSession::read_console`] returns, or the cancellation of the
    /// parked read.
    pub async fn read_line(&self, request: ReadRequest) -> Result<ReadResponse, CookedReadError> {
        let status = self.lock().read_console(request)?;
        if let ReadStatus::Completed(response) = status {
            return Ok(response);
        }

        loop {
            // A signal sent before this point is kept as a permit, so none is lost.
            self.read_finished.notified().await;
            let finished = self.lock().take_finished_read();
            if let Some(result) = finished {
                return result;
            }
        }
    }
}
