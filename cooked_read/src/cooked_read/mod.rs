// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod cooked_line_editor;
pub mod cooked_read_error;
pub mod key_handlers;
pub mod prompt_buffer;
pub mod prompt_renderer;

// Re-export.
pub use cooked_line_editor::*;
pub use cooked_read_error::*;
pub use key_handlers::*;
pub use prompt_buffer::*;
pub use prompt_renderer::*;

/// Log every keystroke the editor handles. Use `tail -f` on the log file to watch.
pub const DEVELOPMENT_MODE: bool = false;
