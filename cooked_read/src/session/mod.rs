// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod async_console;
pub mod console_session;
pub mod read_request;

// Re-export.
pub use async_console::*;
pub use console_session::*;
pub use read_request::*;
