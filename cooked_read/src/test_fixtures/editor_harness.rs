// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CookedLineEditor, EditorContext, HistoryId, HistoryRegistry, InputEvent,
            InputEventQueue, InputModeFlags, OffscreenBuffer, ProcessId, ReadProgress,
            SessionConfig, WideString, point, size};

/// Session state for driving a [`CookedLineEditor`] directly, with an
/// [`OffscreenBuffer`] as the screen.
#[derive(Debug)]
pub struct EditorHarness {
    pub queue: InputEventQueue,
    pub histories: HistoryRegistry,
    pub screen: OffscreenBuffer,
    pub config: SessionConfig,
    pub input_mode: InputModeFlags,
    pub insert_mode: bool,
    pub history_id: Option<HistoryId>,
}

impl EditorHarness {
    pub fn new() -> Self { Self::with_history(&[]) }

    /// A harness whose history already holds `lines`, oldest first.
    pub fn with_history(lines: &[&str]) -> Self {
        let config = SessionConfig::default();
        let mut histories =
            HistoryRegistry::new(config.number_of_history_buffers, config.history_buffer_size);
        let history_id = histories.allocate("test.exe", ProcessId(1));
        if let Some(history) = history_id.and_then(|id| histories.get_mut(id)) {
            for line in lines {
                history.add(&WideString::from(*line), false).unwrap();
            }
        }
        Self {
            queue: InputEventQueue::new(),
            histories,
            screen: OffscreenBuffer::new(size(40, 12)),
            input_mode: config.input_mode,
            insert_mode: config.insert_mode,
            config,
            history_id,
        }
    }

    pub fn editor(&self) -> CookedLineEditor {
        CookedLineEditor::new(point(0, 0), &[], 0, self.history_id)
    }

    pub fn ctx(&mut self) -> EditorContext<'_> {
        EditorContext {
            input_queue: &mut self.queue,
            histories: &mut self.histories,
            screen: &mut self.screen,
            config: &self.config,
            input_mode: self.input_mode,
            insert_mode: &mut self.insert_mode,
        }
    }

    /// Queue `events` and let `editor` consume them.
    pub fn feed(
        &mut self,
        editor: &mut CookedLineEditor,
        events: impl IntoIterator<Item = InputEvent>,
    ) -> ReadProgress {
        self.queue.write_bulk(events);
        editor.read(&mut self.ctx()).unwrap()
    }

    pub fn history_entries(&self) -> Vec<String> {
        self.history_id
            .and_then(|id| self.histories.get(id))
            .map(|it| it.entries().map(WideString::to_string_lossy).collect())
            .unwrap_or_default()
    }
}
