// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod editor_harness;
pub mod input_fixtures;
pub mod temp_dir;

// Re-export.
pub use editor_harness::*;
pub use input_fixtures::*;
pub use temp_dir::*;
