// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::Diagnostic;

/// A popup failed while applying its effect. The [`crate::PopupStack`] rolls the prompt
/// back to what it was before the keystroke and treats the popup as cancelled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum PopupError {
    #[error("the command history for this read is no longer available")]
    #[diagnostic(
        code(cooked_read::popup::history_unavailable),
        help("The history may have been dropped when the registry was cleared")
    )]
    HistoryUnavailable,
}
