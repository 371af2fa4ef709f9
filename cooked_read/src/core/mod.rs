// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod decl_macros;
pub mod geometry;
pub mod log;
pub mod miette_setup_global_report_handler;
pub mod stack_alloc_types;
pub mod type_aliases;
pub mod wide_string;

// Re-export.
pub use geometry::*;
pub use log::*;
pub use miette_setup_global_report_handler::*;
pub use stack_alloc_types::*;
pub use type_aliases::*;
pub use wide_string::*;
