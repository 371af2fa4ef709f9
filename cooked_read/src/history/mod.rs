// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod command_history;
pub mod history_error;
pub mod history_registry;

// Re-export.
pub use command_history::*;
pub use history_error::*;
pub use history_registry::*;
