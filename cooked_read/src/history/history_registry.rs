// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Session-wide set of [`CommandHistory`] instances, keyed by executable name.
//!
//! The registry holds at most `max_histories` histories, most recently used first. When
//! it is full, allocation for a new executable fails instead of evicting another
//! executable's history. Freed histories keep their entries, so a client that starts
//! again within the session gets its old history back.

use super::{CommandHistory, HistoryId};
use crate::ProcessId;

#[derive(Debug)]
pub struct HistoryRegistry {
    /// Most recently used first.
    histories: Vec<CommandHistory>,
    max_histories: usize,
    default_capacity: usize,
    next_id: u32,
}

impl HistoryRegistry {
    #[must_use]
    pub fn new(max_histories: usize, default_capacity: usize) -> Self {
        Self {
            histories: Vec::with_capacity(max_histories),
            max_histories,
            default_capacity,
            next_id: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize { self.histories.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.histories.is_empty() }

    #[must_use]
    pub fn default_capacity(&self) -> usize { self.default_capacity }

    pub fn iter(&self) -> impl Iterator<Item = &CommandHistory> { self.histories.iter() }

    /// Returns the history for `app_name` (case-insensitive), creating one if there is a
    /// free slot. `owner` is attached to the returned history. Returns `None` when the
    /// registry is full and no history matches.
    pub fn allocate(&mut self, app_name: &str, owner: ProcessId) -> Option<HistoryId> {
        if let Some(position) = self
            .histories
            .iter()
            .position(|it| it.is_app_name_match(app_name))
        {
            let mut history = self.histories.remove(position);
            history.attach_owner(owner);
            let id = history.id();
            self.histories.insert(0, history);
            tracing::debug!(
                message = "history reattached",
                app_name,
                %owner,
                entries = self.histories[0].len()
            );
            return Some(id);
        }

        if self.histories.len() >= self.max_histories {
            tracing::warn!(
                message = "history registry full, no history for client",
                app_name,
                %owner,
                max_histories = self.max_histories
            );
            return None;
        }

        let id = HistoryId(self.next_id);
        self.next_id += 1;
        let mut history = CommandHistory::new(id, app_name, self.default_capacity);
        history.attach_owner(owner);
        self.histories.insert(0, history);
        tracing::debug!(message = "history allocated", app_name, %owner, ?id);
        Some(id)
    }

    /// Detach `owner` from its history. Entries are kept.
    pub fn free(&mut self, owner: ProcessId) {
        for history in &mut self.histories {
            if history.detach_owner(owner) {
                tracing::debug!(
                    message = "history freed",
                    app_name = history.app_name(),
                    %owner,
                    still_allocated = history.is_allocated()
                );
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: HistoryId) -> Option<&CommandHistory> {
        self.histories.iter().find(|it| it.id() == id)
    }

    pub fn get_mut(&mut self, id: HistoryId) -> Option<&mut CommandHistory> {
        self.histories.iter_mut().find(|it| it.id() == id)
    }

    #[must_use]
    pub fn find_by_exe(&self, app_name: &str) -> Option<&CommandHistory> {
        self.histories.iter().find(|it| it.is_app_name_match(app_name))
    }

    #[must_use]
    pub fn find_by_owner(&self, owner: ProcessId) -> Option<&CommandHistory> {
        self.histories.iter().find(|it| it.owners().contains(&owner))
    }

    /// Resize the history of `app_name` and mark it most recently used. Returns `false`
    /// if there is no such history.
    pub fn set_number_of_commands(&mut self, app_name: &str, commands: usize) -> bool {
        let Some(position) = self
            .histories
            .iter()
            .position(|it| it.is_app_name_match(app_name))
        else {
            return false;
        };
        let mut history = self.histories.remove(position);
        history.realloc(commands);
        self.histories.insert(0, history);
        true
    }

    /// Resize every history, and make `commands` the capacity of new ones.
    pub fn resize_all(&mut self, commands: usize) {
        self.default_capacity = commands;
        for history in &mut self.histories {
            history.realloc(commands);
        }
    }

    /// Session teardown.
    pub fn clear(&mut self) { self.histories.clear(); }
}
