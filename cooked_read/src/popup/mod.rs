// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod command_list;
pub mod command_number;
pub mod copy_char;
pub mod popup_error;
pub mod popup_kind;
pub mod popup_render;
pub mod popup_stack;

// Re-export.
pub use command_list::*;
pub use command_number::*;
pub use copy_char::*;
pub use popup_error::*;
pub use popup_kind::*;
pub use popup_render::*;
pub use popup_stack::*;
