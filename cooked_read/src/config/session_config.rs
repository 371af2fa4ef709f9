// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs, path::Path};

use bitflags::bitflags;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_BUFFER_SIZE: usize = 50;
pub const DEFAULT_NUMBER_OF_HISTORY_BUFFERS: usize = 4;
pub const DEFAULT_POPUP_MAX_HEIGHT: usize = 20;

bitflags! {
    /// How a cooked read treats its input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct InputModeFlags: u32 {
        /// Backspace edits, Ctrl+C cancels, and Enter produces `"\r\n"`.
        const PROCESSED = 0x0001;
        /// Reads complete on Enter instead of per keystroke.
        const LINE      = 0x0002;
        /// Typed text is echoed and completed lines go to history.
        const ECHO      = 0x0004;
    }
}

impl Default for InputModeFlags {
    fn default() -> Self { Self::PROCESSED | Self::LINE | Self::ECHO }
}

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file")]
    #[diagnostic(code(cooked_read::config::io))]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON")]
    #[diagnostic(
        code(cooked_read::config::parse),
        help("Unknown fields are ignored and missing fields take their defaults")
    )]
    Parse(#[from] serde_json::Error),
}

/// Knobs for one console session. Every field has a default, so a config file only
/// needs the ones it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Entries per command history.
    pub history_buffer_size: usize,
    /// Histories the session tracks at once.
    pub number_of_history_buffers: usize,
    /// Skip adding a line equal to the most recent entry.
    pub suppress_duplicates: bool,
    pub insert_mode: bool,
    pub input_mode: InputModeFlags,
    /// Upper bound on the rows of the history list popup.
    pub popup_max_height: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_buffer_size: DEFAULT_HISTORY_BUFFER_SIZE,
            number_of_history_buffers: DEFAULT_NUMBER_OF_HISTORY_BUFFERS,
            suppress_duplicates: false,
            insert_mode: true,
            input_mode: InputModeFlags::default(),
            popup_max_height: DEFAULT_POPUP_MAX_HEIGHT,
        }
    }
}

impl SessionConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `json` isn't a valid config object.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file can't be read, or
    /// [`ConfigError::Parse`] if it isn't a valid config object.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::debug!(message = "loaded session config", path = %path.display(), ?config);
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
