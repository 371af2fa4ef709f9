// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;

/// Anomalies inside a [`crate::CommandHistory`]. These are resolved where they happen
/// (clamped, ignored, or logged) and never reach a client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum HistoryError {
    #[error("history can't hold any commands (capacity is 0)")]
    #[diagnostic(
        code(cooked_read::history::capacity_exceeded),
        help("Raise `history_buffer_size` in the session config")
    )]
    CapacityExceeded,

    #[error("history index {index} is out of range for {len} entries")]
    #[diagnostic(code(cooked_read::history::index_out_of_range))]
    IndexOutOfRange { index: usize, len: usize },
}
