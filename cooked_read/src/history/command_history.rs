// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A bounded list of submitted lines for one executable.
//!
//! Index 0 is the oldest entry. `last_displayed` is the cursor for relative navigation
//! (Up / Down in the prompt, and the initial selection of the history list popup).
//! Navigation clamps at both ends and never wraps. The prefix search used by F8 is the
//! one operation that wraps around.

use std::collections::VecDeque;

use bitflags::bitflags;
use strum_macros::Display;

use super::HistoryError;
use crate::{InlineString, InlineVec, ProcessId, WideString};

/// Stable handle to a history inside a [`crate::HistoryRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryId(pub u32);

bitflags! {
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct HistoryFlags: u8 {
        /// At least one client owns this history.
        const ALLOCATED = 0b01;
        /// Nothing has been recalled since the last add. The next "previous" recall
        /// returns the newest entry itself instead of the one before it.
        const RESET = 0b10;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SearchDirection {
    Previous,
    Next,
}

#[derive(Debug, Clone)]
pub struct CommandHistory {
    id: HistoryId,
    app_name: InlineString,
    commands: VecDeque<WideString>,
    max_commands: usize,
    last_displayed: Option<usize>,
    flags: HistoryFlags,
    owners: InlineVec<ProcessId>,
}

impl CommandHistory {
    #[must_use]
    pub fn new(id: HistoryId, app_name: &str, max_commands: usize) -> Self {
        Self {
            id,
            app_name: app_name.into(),
            commands: VecDeque::with_capacity(max_commands.min(64)),
            max_commands,
            last_displayed: None,
            flags: HistoryFlags::empty(),
            owners: InlineVec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> HistoryId { self.id }

    #[must_use]
    pub fn app_name(&self) -> &str { self.app_name.as_str() }

    #[must_use]
    pub fn is_app_name_match(&self, other: &str) -> bool {
        self.app_name.eq_ignore_ascii_case(other)
            || self.app_name.to_lowercase() == other.to_lowercase()
    }

    #[must_use]
    pub fn len(&self) -> usize { self.commands.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    #[must_use]
    pub fn max_commands(&self) -> usize { self.max_commands }

    #[must_use]
    pub fn last_displayed(&self) -> Option<usize> { self.last_displayed }

    #[must_use]
    pub fn flags(&self) -> HistoryFlags { self.flags }

    #[must_use]
    pub fn is_allocated(&self) -> bool { self.flags.contains(HistoryFlags::ALLOCATED) }

    #[must_use]
    pub fn owners(&self) -> &[ProcessId] { &self.owners }

    pub fn entries(&self) -> impl Iterator<Item = &WideString> { self.commands.iter() }

    /// Entry at `index` without moving the navigation cursor.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&WideString> { self.commands.get(index) }

    fn newest_index(&self) -> Option<usize> { self.commands.len().checked_sub(1) }

    /// The entry at the navigation cursor, or the newest entry if nothing is displayed.
    /// This is what F1, F3, and the copy-to-char popup copy from.
    #[must_use]
    pub fn last_command(&self) -> Option<&WideString> {
        self.last_displayed
            .or_else(|| self.newest_index())
            .and_then(|index| self.commands.get(index))
    }

    /// Append `line`. An empty line is ignored. With `suppress_duplicates`, a line equal
    /// to the most recent entry is not added again (only the adjacent entry is checked).
    /// At capacity the oldest entry is evicted.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::CapacityExceeded`] if this history can hold no entries.
    pub fn add(&mut self, line: &[u16], suppress_duplicates: bool) -> Result<(), HistoryError> {
        if self.max_commands == 0 {
            return Err(HistoryError::CapacityExceeded);
        }
        if line.is_empty() {
            return Ok(());
        }

        let is_adjacent_duplicate = self
            .commands
            .back()
            .is_some_and(|newest| newest.as_units() == line);

        if !(suppress_duplicates && is_adjacent_duplicate) {
            if self.commands.len() >= self.max_commands {
                self.commands.pop_front();
                tracing::debug!(
                    message = "history full, evicted oldest entry",
                    app_name = %self.app_name,
                    max_commands = self.max_commands
                );
            }
            self.commands.push_back(WideString::from(line));
        }

        self.reset();
        Ok(())
    }

    /// Move the navigation cursor one step and return the entry it lands on. Clamps at
    /// the oldest and newest entries.
    pub fn retrieve(&mut self, direction: SearchDirection) -> Option<&WideString> {
        let newest = self.newest_index()?;

        let next = match (direction, self.last_displayed) {
            (_, None) => newest,
            (SearchDirection::Previous, Some(current))
                if self.flags.contains(HistoryFlags::RESET) =>
            {
                current.min(newest)
            }
            (SearchDirection::Previous, Some(current)) => current.saturating_sub(1),
            (SearchDirection::Next, Some(current)) => (current + 1).min(newest),
        };

        if direction == SearchDirection::Previous {
            self.flags.remove(HistoryFlags::RESET);
        }
        self.last_displayed = Some(next);
        self.commands.get(next)
    }

    /// Jump the navigation cursor to `index`, clamped to the newest entry.
    pub fn retrieve_nth(&mut self, index: usize) -> Option<&WideString> {
        let newest = self.newest_index()?;
        let index = index.min(newest);
        self.last_displayed = Some(index);
        self.flags.remove(HistoryFlags::RESET);
        self.commands.get(index)
    }

    /// Search from `starting_index` toward the oldest entry for an entry that starts
    /// with `prefix` (or equals it, with `exact_match`), wrapping around to the newest
    /// entry. Every entry is checked at most once.
    #[must_use]
    pub fn find_matching_command(
        &self,
        prefix: &[u16],
        starting_index: usize,
        exact_match: bool,
    ) -> Option<usize> {
        let len = self.commands.len();
        let newest = self.newest_index()?;
        let mut index = starting_index.min(newest);

        for _ in 0..len {
            let stored = &self.commands[index];
            let is_match = if exact_match {
                stored.as_units() == prefix
            } else {
                stored.starts_with_units(prefix)
            };
            if is_match {
                return Some(index);
            }
            index = if index == 0 { newest } else { index - 1 };
        }

        None
    }

    /// Cycle through entries matching `prefix`, older each call. The first search after
    /// an add starts at the newest entry. Moves the navigation cursor to the match.
    pub fn find_next_match(&mut self, prefix: &[u16]) -> Option<usize> {
        let newest = self.newest_index()?;
        let current = self.last_displayed.unwrap_or(newest);

        let start = if self.flags.contains(HistoryFlags::RESET) || self.last_displayed.is_none() {
            current
        } else if current == 0 {
            newest
        } else {
            current - 1
        };
        self.flags.remove(HistoryFlags::RESET);

        let found = self.find_matching_command(prefix, start, false)?;
        self.last_displayed = Some(found);
        Some(found)
    }

    /// Delete the entry at `index`, shifting newer entries down by one.
    pub fn remove(&mut self, index: usize) -> Option<WideString> {
        let removed = self.commands.remove(index)?;

        self.last_displayed = match self.last_displayed {
            Some(current) if current == index => None,
            Some(current) if current > index => Some(current - 1),
            other => other,
        };

        Some(removed)
    }

    /// Exchange two entries in place.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::IndexOutOfRange`] if either index is past the newest
    /// entry. Swapping an entry with itself is a no-op.
    pub fn swap(&mut self, index_a: usize, index_b: usize) -> Result<(), HistoryError> {
        let len = self.commands.len();
        for index in [index_a, index_b] {
            if index >= len {
                return Err(HistoryError::IndexOutOfRange { index, len });
            }
        }
        self.commands.swap(index_a, index_b);
        Ok(())
    }

    /// Change the capacity. Shrinking discards the oldest entries that no longer fit.
    pub fn realloc(&mut self, new_capacity: usize) {
        if new_capacity == self.max_commands {
            return;
        }
        while self.commands.len() > new_capacity {
            self.commands.pop_front();
        }
        self.max_commands = new_capacity;
        self.reset();
    }

    /// Remove every entry (Alt+F7, or an explicit expunge from the client).
    pub fn empty(&mut self) {
        self.commands.clear();
        self.last_displayed = None;
        self.flags.insert(HistoryFlags::RESET);
    }

    /// Point the navigation cursor at the newest entry and arm the reset flag.
    pub fn reset(&mut self) {
        self.last_displayed = self.newest_index();
        self.flags.insert(HistoryFlags::RESET);
    }

    pub(crate) fn attach_owner(&mut self, owner: ProcessId) {
        if !self.owners.contains(&owner) {
            self.owners.push(owner);
        }
        self.flags.insert(HistoryFlags::ALLOCATED);
    }

    /// Returns `true` if `owner` was attached to this history.
    pub(crate) fn detach_owner(&mut self, owner: ProcessId) -> bool {
        let before = self.owners.len();
        self.owners.retain(|it| *it != owner);
        if self.owners.is_empty() {
            self.flags.remove(HistoryFlags::ALLOCATED);
        }
        self.owners.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    fn wide(text: &str) -> Vec<u16> { text.encode_utf16().collect() }

    fn history_with(entries: &[&str]) -> CommandHistory {
        let mut history = CommandHistory::new(HistoryId(0), "cmd.exe", 10);
        for entry in entries {
            history.add(&wide(entry), false).unwrap();
        }
        history
    }

    fn texts(history: &CommandHistory) -> Vec<String> {
        history.entries().map(WideString::to_string_lossy).collect()
    }

    fn retrieved(history: &mut CommandHistory, direction: SearchDirection) -> Option<String> {
        history.retrieve(direction).map(WideString::to_string_lossy)
    }

    #[test]
    fn test_suppress_duplicates_only_checks_adjacent_entry() {
        let mut history = history_with(&[]);
        history.add(&wide("x"), true).unwrap();
        history.add(&wide("x"), true).unwrap();
        assert_eq2!(history.len(), 1);

        let mut history = history_with(&[]);
        history.add(&wide("x"), true).unwrap();
        history.add(&wide("y"), true).unwrap();
        history.add(&wide("x"), true).unwrap();
        assert_eq2!(texts(&history), vec!["x", "y", "x"]);
    }

    #[test]
    fn test_duplicates_kept_without_suppression() {
        let history = history_with(&["x", "x"]);
        assert_eq2!(history.len(), 2);
    }

    #[test]
    fn test_empty_line_is_ignored() {
        let history = history_with(&["", "a", ""]);
        assert_eq2!(texts(&history), vec!["a"]);
    }

    #[test]
    fn test_add_evicts_oldest_at_capacity() {
        let mut history = CommandHistory::new(HistoryId(0), "cmd.exe", 2);
        for entry in ["one", "two", "three"] {
            history.add(&wide(entry), false).unwrap();
        }
        assert_eq2!(texts(&history), vec!["two", "three"]);
        assert_eq2!(history.last_displayed(), Some(1));
    }

    #[test]
    fn test_zero_capacity_rejects_add() {
        let mut history = CommandHistory::new(HistoryId(0), "cmd.exe", 0);
        assert_eq2!(history.add(&wide("a"), false), Err(HistoryError::CapacityExceeded));
    }

    #[test]
    fn test_first_previous_after_add_returns_newest() {
        let mut history = history_with(&["a", "bb", "ccc"]);
        assert_eq2!(retrieved(&mut history, SearchDirection::Previous).as_deref(), Some("ccc"));
        assert_eq2!(retrieved(&mut history, SearchDirection::Previous).as_deref(), Some("bb"));
    }

    #[test]
    fn test_retrieve_clamps_without_wrapping() {
        let mut history = history_with(&["a", "bb", "ccc"]);
        for _ in 0..6 {
            history.retrieve(SearchDirection::Previous);
        }
        assert_eq2!(retrieved(&mut history, SearchDirection::Previous).as_deref(), Some("a"));
        assert_eq2!(history.last_displayed(), Some(0));

        for _ in 0..6 {
            history.retrieve(SearchDirection::Next);
        }
        assert_eq2!(retrieved(&mut history, SearchDirection::Next).as_deref(), Some("ccc"));
        assert_eq2!(history.last_displayed(), Some(2));
    }

    #[test]
    fn test_retrieve_on_empty_history() {
        let mut history = history_with(&[]);
        assert_eq2!(history.retrieve(SearchDirection::Previous), None);
        assert_eq2!(history.retrieve_nth(3), None);
        assert_eq2!(history.last_command(), None);
    }

    #[test]
    fn test_retrieve_nth_clamps_to_newest() {
        let mut history = history_with(&["a", "bb", "ccc"]);
        assert_eq2!(history.retrieve_nth(0).map(WideString::to_string_lossy).as_deref(), Some("a"));
        assert_eq2!(history.retrieve_nth(99).map(WideString::to_string_lossy).as_deref(), Some("ccc"));
        assert_eq2!(history.last_displayed(), Some(2));

        // Jumping clears the reset flag, so "previous" moves on from the jump target.
        history.retrieve_nth(1);
        assert_eq2!(retrieved(&mut history, SearchDirection::Previous).as_deref(), Some("a"));
    }

    #[test]
    fn test_find_matching_command_wraps_toward_newest() {
        let history = history_with(&["git status", "ls", "git log", "cd"]);
        assert_eq2!(history.find_matching_command(&wide("git"), 3, false), Some(2));
        assert_eq2!(history.find_matching_command(&wide("git"), 1, false), Some(0));
        // Starting below the newest match wraps around past the oldest entry.
        assert_eq2!(history.find_matching_command(&wide("cd"), 1, false), Some(3));
        assert_eq2!(history.find_matching_command(&wide("git"), 2, true), None);
        assert_eq2!(history.find_matching_command(&wide("ls"), 3, true), Some(1));
        assert_eq2!(history.find_matching_command(&wide("rm"), 3, false), None);
        assert_eq2!(history.find_matching_command(&wide(""), 2, false), Some(2));
    }

    #[test]
    fn test_find_next_match_cycles_older() {
        let mut history = history_with(&["git status", "ls", "git log", "cd"]);
        assert_eq2!(history.find_next_match(&wide("git")), Some(2));
        assert_eq2!(history.find_next_match(&wide("git")), Some(0));
        assert_eq2!(history.find_next_match(&wide("git")), Some(2));
        assert_eq2!(history.last_displayed(), Some(2));
    }

    #[test]
    fn test_remove_adjusts_cursor() {
        let mut history = history_with(&["a", "bb", "ccc"]);
        history.retrieve_nth(2);
        assert_eq2!(history.remove(0).map(|it| it.to_string_lossy()).as_deref(), Some("a"));
        assert_eq2!(history.last_displayed(), Some(1));

        assert_eq2!(history.remove(1).map(|it| it.to_string_lossy()).as_deref(), Some("ccc"));
        assert_eq2!(history.last_displayed(), None);
        assert_eq2!(history.remove(5), None);

        // Nothing displayed: either direction lands on the newest entry.
        assert_eq2!(retrieved(&mut history, SearchDirection::Next).as_deref(), Some("bb"));
    }

    #[test]
    fn test_swap() {
        let mut history = history_with(&["a", "bb", "ccc"]);
        history.swap(1, 2).unwrap();
        assert_eq2!(texts(&history), vec!["a", "ccc", "bb"]);
        assert_eq2!(
            history.swap(0, 3),
            Err(HistoryError::IndexOutOfRange { index: 3, len: 3 })
        );
        history.swap(1, 1).unwrap();
        assert_eq2!(texts(&history), vec!["a", "ccc", "bb"]);
    }

    #[test]
    fn test_realloc_shrink_discards_oldest() {
        let mut history = history_with(&["1", "2", "3", "4"]);
        history.realloc(2);
        assert_eq2!(texts(&history), vec!["3", "4"]);
        assert_eq2!(history.max_commands(), 2);
        assert_eq2!(history.last_displayed(), Some(1));

        history.realloc(5);
        history.add(&wide("5"), false).unwrap();
        history.add(&wide("6"), false).unwrap();
        assert_eq2!(texts(&history), vec!["3", "4", "5", "6"]);
    }

    #[test]
    fn test_empty_clears_everything() {
        let mut history = history_with(&["a", "b"]);
        history.empty();
        assert!(history.is_empty());
        assert_eq2!(history.last_displayed(), None);
    }

    #[test]
    fn test_app_name_match_is_case_insensitive() {
        let history = CommandHistory::new(HistoryId(0), "CMD.EXE", 1);
        assert!(history.is_app_name_match("cmd.exe"));
        assert!(!history.is_app_name_match("pwsh.exe"));
    }

    #[test]
    fn test_owners_drive_allocated_flag() {
        let mut history = history_with(&[]);
        history.attach_owner(ProcessId(1));
        history.attach_owner(ProcessId(2));
        history.attach_owner(ProcessId(2));
        assert_eq2!(history.owners(), &[ProcessId(1), ProcessId(2)]);

        assert!(history.detach_owner(ProcessId(1)));
        assert!(history.is_allocated());
        assert!(history.detach_owner(ProcessId(2)));
        assert!(!history.is_allocated());
        assert!(!history.detach_owner(ProcessId(2)));
    }
}
