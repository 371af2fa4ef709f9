// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use miette::Diagnostic;
use strum_macros::Display;

use crate::ProcessId;

/// Why a pending read was torn down before it completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CancelReason {
    CtrlC,
    CtrlBreak,
    HandleClosing,
    ThreadDying,
}

/// The only failures a cooked read reports to its client. Everything else (bad digits,
/// out of range history indices, a full history) is resolved inside the editor.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum CookedReadError {
    #[error("read cancelled: {0}")]
    #[diagnostic(code(cooked_read::cancelled))]
    Cancelled(CancelReason),

    #[error("read failed: {0}")]
    #[diagnostic(
        code(cooked_read::fatal),
        help("The screen or input device went away while the read was in progress")
    )]
    Fatal(#[from] io::Error),

    #[error("read from {owner} rejected, another read is in progress")]
    #[diagnostic(
        code(cooked_read::read_already_pending),
        help("Wait for the pending read to complete, or cancel it first")
    )]
    ReadAlreadyPending { owner: ProcessId },
}

impl CookedReadError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool { matches!(self, Self::Cancelled(_)) }
}
