// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Skip rustfmt for rest of file.
// https://stackoverflow.com/a/75910283/2085356
#![cfg_attr(rustfmt, rustfmt_skip)]

//! # Cooked read
//!
//! The line-input subsystem of a console host. It turns a stream of raw input events
//! (keystrokes, mouse, window events) into completed lines of text for a client, while
//! supporting in-place line editing, a per-executable command history, and a stack of
//! modal popups layered over the prompt.
//!
//! # Architecture
//!
//! ```text
//! producer ──write()──▶ InputEventQueue ──read()──▶ CookedLineEditor ──▶ ReadResponse
//!                             │                         │    │
//!                             │ (wakes parked read)     │    └──▶ PopupStack ──▶ Popup
//!                             ▼                         ▼
//!                       ConsoleSession ◀──────── HistoryRegistry / CommandHistory
//! ```
//!
//! - [`InputEventQueue`] is an ordered buffer of [`InputEvent`]s shared by every reader of
//!   one [`ConsoleSession`]. Single event writes coalesce repeated keys and mouse moves.
//! - [`CommandHistory`] is a bounded list of submitted lines for one executable. A
//!   [`HistoryRegistry`] caps how many of them a session tracks.
//! - [`Popup`] is a modal sub-editor (history list, jump by number, copy to/from char).
//!   The [`PopupStack`] routes keys to the top popup.
//! - [`CookedLineEditor`] is the line-editing state machine. When the queue runs dry it
//!   parks inside the session, and the next [`ConsoleSession::write_input`] resumes it.
//!
//! All of these assume serialized access. Share a session between threads with
//! [`SafeConsoleSession`], or await lines with [`AsyncConsole`].

// Enforce strict error handling in production code (tests can use unwrap).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach.
pub mod config;
pub mod cooked_read;
pub mod core;
pub mod history;
pub mod input;
pub mod popup;
pub mod screen;
pub mod session;
#[cfg(test)]
pub mod test_fixtures;

// Re-export.
pub use config::*;
pub use cooked_read::*;
pub use core::*;
pub use history::*;
pub use input::*;
pub use popup::*;
pub use screen::*;
pub use session::*;
