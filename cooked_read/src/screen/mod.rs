// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod crossterm_screen;
pub mod offscreen_buffer;
pub mod screen_buffer;

// Re-export.
pub use crossterm_screen::*;
pub use offscreen_buffer::*;
pub use screen_buffer::*;
