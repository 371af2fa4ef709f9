// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod control_key_state;
pub mod crossterm_adapter;
pub mod input_event;
pub mod input_event_queue;
pub mod virtual_key;

// Re-export.
pub use control_key_state::*;
pub use crossterm_adapter::*;
pub use input_event::*;
pub use input_event_queue::*;
pub use virtual_key::*;
