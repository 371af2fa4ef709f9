// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The ordered buffer of [`InputEvent`]s shared by every reader of one console session.
//!
//! # Coalescing
//!
//! Only single event [`InputEventQueue::write`] coalesces, and only against the current
//! tail of the queue:
//! - Two mouse moves in a row collapse into one record at the latest position.
//! - Two identical keystrokes in a row collapse into one record whose `repeat_count` is
//!   the sum of both. Fullwidth glyphs and surrogate halves never coalesce.
//!
//! [`InputEventQueue::write_bulk`] and [`InputEventQueue::prepend`] store events exactly
//! as given.
//!
//! # Reading
//!
//! [`InputEventQueue::read`] hands out logical character units. A key record with a
//! repeat count above one is handed out one repeat at a time, and the record stays at
//! the head of the queue until its last repeat is consumed.

use std::collections::VecDeque;

use crate::{InlineVec, InputEvent, KeyEvent, MouseEventFlags, is_leading_surrogate,
            is_trailing_surrogate};

#[derive(Debug, Default)]
pub struct InputEventQueue {
    storage: VecDeque<InputEvent>,
    data_ready: bool,
    data_ready_signal_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadArgs {
    /// Logical character units the caller has room for.
    pub max_count: usize,
    /// Copy events out without removing them.
    pub peek: bool,
    /// When `false`, fullwidth glyphs cost two units (ANSI / DBCS caller).
    pub unicode: bool,
    /// When `true`, reading an empty queue returns [`QueueRead::WouldBlock`].
    pub wait_for_data: bool,
}

impl ReadArgs {
    #[must_use]
    pub fn blocking(max_count: usize) -> Self {
        Self {
            max_count,
            peek: false,
            unicode: true,
            wait_for_data: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueRead {
    Ready(ReadBatch),
    /// The queue is empty and the caller asked to wait. Park the request and retry after
    /// the next write.
    WouldBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadBatch {
    pub events: InlineVec<InputEvent>,
    /// The read left the queue empty, so the caller should clear its ready signal.
    pub reset_wait_on_empty: bool,
}

impl InputEventQueue {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn len(&self) -> usize { self.storage.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.storage.is_empty() }

    #[must_use]
    pub fn peek_head(&self) -> Option<&InputEvent> { self.storage.front() }

    /// `true` between the write that filled an empty queue and the read that drained it.
    #[must_use]
    pub fn is_data_ready(&self) -> bool { self.data_ready }

    /// How many times the queue went from empty to non-empty.
    #[must_use]
    pub fn data_ready_signal_count(&self) -> u64 { self.data_ready_signal_count }

    /// Append one event, coalescing it into the tail when possible. Returns the number
    /// of events accepted, which is always 1.
    pub fn write(&mut self, event: InputEvent) -> usize {
        let event = normalize(event);
        let was_empty = self.storage.is_empty();

        let coalesced = self
            .storage
            .back_mut()
            .is_some_and(|tail| try_coalesce(tail, &event));
        if !coalesced {
            self.storage.push_back(event);
        }

        if was_empty {
            self.signal_data_ready();
        }
        1
    }

    /// Append a pre-built sequence as is. Never coalesces.
    pub fn write_bulk(&mut self, events: impl IntoIterator<Item = InputEvent>) -> usize {
        let was_empty = self.storage.is_empty();
        let before = self.storage.len();
        self.storage.extend(events.into_iter().map(normalize));
        let written = self.storage.len() - before;

        if was_empty && written > 0 {
            self.signal_data_ready();
        }
        written
    }

    /// Push back unread input at the head of the queue, preserving the order of
    /// `events`. Never coalesces.
    pub fn prepend(&mut self, events: impl IntoIterator<Item = InputEvent>) -> usize {
        let was_empty = self.storage.is_empty();
        let events: Vec<InputEvent> = events.into_iter().map(normalize).collect();
        let written = events.len();
        for event in events.into_iter().rev() {
            self.storage.push_front(event);
        }

        if was_empty && written > 0 {
            self.signal_data_ready();
        }
        written
    }

    /// Synthesize one key down per code unit of `text`, as if it had been typed.
    pub fn write_string(&mut self, text: &[u16]) -> usize {
        self.write_bulk(
            text.iter()
                .map(|&unit| InputEvent::Key(KeyEvent::from_char(unit))),
        )
    }

    pub fn write_focus_event(&mut self, set_focus: bool) -> usize {
        self.write_bulk([InputEvent::Focus(crate::FocusEvent { set_focus })])
    }

    pub fn read(&mut self, args: ReadArgs) -> QueueRead {
        if self.storage.is_empty() {
            if args.wait_for_data {
                return QueueRead::WouldBlock;
            }
            self.data_ready = false;
            return QueueRead::Ready(ReadBatch {
                events: InlineVec::new(),
                reset_wait_on_empty: true,
            });
        }

        let events = self.collect_units(args);

        if args.peek {
            return QueueRead::Ready(ReadBatch {
                events,
                reset_wait_on_empty: false,
            });
        }

        self.consume_front(events.len());

        let reset_wait_on_empty = self.storage.is_empty();
        if reset_wait_on_empty {
            self.data_ready = false;
            tracing::trace!(message = "input queue drained");
        }

        QueueRead::Ready(ReadBatch {
            events,
            reset_wait_on_empty,
        })
    }

    pub fn flush(&mut self) {
        self.storage.clear();
        self.data_ready = false;
    }

    pub fn flush_all_but_keys(&mut self) {
        self.storage.retain(InputEvent::is_key);
        if self.storage.is_empty() {
            self.data_ready = false;
        }
    }

    fn signal_data_ready(&mut self) {
        self.data_ready = true;
        self.data_ready_signal_count += 1;
        tracing::trace!(
            message = "input queue data ready",
            signal_count = self.data_ready_signal_count
        );
    }

    /// Walk the queue one repeat at a time and copy out as many events as fit in
    /// `args.max_count` units.
    fn collect_units(&self, args: ReadArgs) -> InlineVec<InputEvent> {
        let mut events = InlineVec::new();
        let mut units_left = args.max_count;

        let expanded = self.storage.iter().flat_map(|event| match event {
            InputEvent::Key(key) => std::iter::repeat_n(
                InputEvent::Key(key.with_repeat_count(1)),
                usize::from(key.repeat_count),
            ),
            other => std::iter::repeat_n(*other, 1),
        });

        for event in expanded {
            if units_left == 0 {
                break;
            }
            let cost = unit_cost(&event, args.unicode);
            // A wide glyph that doesn't fit is left for the next read, unless it is the
            // only thing this read could return.
            if cost > units_left && !events.is_empty() {
                break;
            }
            units_left = units_left.saturating_sub(cost);
            events.push(event);
        }

        events
    }

    /// Remove `count` logical events (repeats) from the head of the queue.
    fn consume_front(&mut self, count: usize) {
        for _ in 0..count {
            let Some(head) = self.storage.front_mut() else {
                return;
            };
            match head {
                InputEvent::Key(key) if key.repeat_count > 1 => key.repeat_count -= 1,
                _ => {
                    self.storage.pop_front();
                }
            }
        }
    }
}

fn unit_cost(event: &InputEvent, unicode: bool) -> usize {
    match event {
        InputEvent::Key(key) if !unicode && key.is_fullwidth() => 2,
        _ => 1,
    }
}

/// A key record never sits in the queue with a zero repeat count.
fn normalize(event: InputEvent) -> InputEvent {
    match event {
        InputEvent::Key(key) if key.repeat_count == 0 => {
            InputEvent::Key(key.with_repeat_count(1))
        }
        other => other,
    }
}

fn try_coalesce(tail: &mut InputEvent, new: &InputEvent) -> bool {
    match (tail, new) {
        (InputEvent::Mouse(tail), InputEvent::Mouse(new))
            if tail.event_flags == MouseEventFlags::MOUSE_MOVED
                && new.event_flags == MouseEventFlags::MOUSE_MOVED =>
        {
            tail.position = new.position;
            true
        }
        (InputEvent::Key(tail), InputEvent::Key(new))
            if tail.is_same_keystroke(new)
                && !new.is_fullwidth()
                && !is_leading_surrogate(new.unicode_char)
                && !is_trailing_surrogate(new.unicode_char) =>
        {
            match tail.repeat_count.checked_add(new.repeat_count) {
                Some(sum) => {
                    tail.repeat_count = sum;
                    true
                }
                None => false,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ControlKeyState, MouseEvent, assert_eq2, point, size,
                test_fixtures::{key_char, key_vk}, VirtualKey};

    fn mouse_move(col: usize, row: usize) -> InputEvent {
        InputEvent::Mouse(MouseEvent {
            position: point(col, row),
            button_state: 0,
            control_key_state: ControlKeyState::empty(),
            event_flags: MouseEventFlags::MOUSE_MOVED,
        })
    }

    fn read_all(queue: &mut InputEventQueue, max_count: usize, unicode: bool) -> ReadBatch {
        match queue.read(ReadArgs {
            max_count,
            peek: false,
            unicode,
            wait_for_data: false,
        }) {
            QueueRead::Ready(batch) => batch,
            QueueRead::WouldBlock => panic!("non-blocking read returned WouldBlock"),
        }
    }

    #[test]
    fn test_identical_key_writes_coalesce_into_one_record() {
        let mut queue = InputEventQueue::new();
        for _ in 0..5 {
            assert_eq2!(queue.write(key_char('a')), 1);
        }
        assert_eq2!(queue.len(), 1);
        let Some(InputEvent::Key(key)) = queue.peek_head() else {
            panic!("expected key event");
        };
        assert_eq2!(key.repeat_count, 5);
    }

    #[test]
    fn test_coalescing_sums_repeat_counts() {
        let mut queue = InputEventQueue::new();
        let InputEvent::Key(key) = key_char('a') else { unreachable!() };
        queue.write(InputEvent::Key(key.with_repeat_count(3)));
        queue.write(InputEvent::Key(key.with_repeat_count(4)));
        assert_eq2!(queue.len(), 1);
        assert_eq2!(queue.peek_head().and_then(InputEvent::as_key).map(|it| it.repeat_count), Some(7));
    }

    #[test]
    fn test_write_bulk_never_coalesces() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('a'));
        assert_eq2!(queue.write_bulk([key_char('a'), key_char('a'), key_char('a')]), 3);
        assert_eq2!(queue.len(), 4);
        assert!(
            queue
                .storage
                .iter()
                .all(|it| it.as_key().is_some_and(|key| key.repeat_count == 1))
        );
    }

    #[test]
    fn test_fullwidth_and_surrogate_keys_do_not_coalesce() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('漢'));
        queue.write(key_char('漢'));
        assert_eq2!(queue.len(), 2);

        queue.flush();
        let lead = InputEvent::Key(KeyEvent::from_char(0xD83D));
        queue.write(lead);
        queue.write(lead);
        assert_eq2!(queue.len(), 2);
    }

    #[test]
    fn test_interposed_event_breaks_the_run() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('a'));
        queue.write(InputEvent::WindowBufferSize(size(80, 25)));
        queue.write(key_char('a'));
        assert_eq2!(queue.len(), 3);

        queue.flush();
        queue.write(mouse_move(1, 1));
        queue.write(key_char('x'));
        queue.write(mouse_move(2, 2));
        assert_eq2!(queue.len(), 3);
    }

    #[test]
    fn test_different_modifiers_do_not_coalesce() {
        let mut queue = InputEventQueue::new();
        queue.write(key_vk(VirtualKey::LEFT, ControlKeyState::empty()));
        queue.write(key_vk(VirtualKey::LEFT, ControlKeyState::LEFT_CTRL_PRESSED));
        assert_eq2!(queue.len(), 2);
    }

    #[test]
    fn test_mouse_moves_replace_tail_position() {
        let mut queue = InputEventQueue::new();
        queue.write(mouse_move(1, 1));
        queue.write(mouse_move(5, 7));
        assert_eq2!(queue.len(), 1);
        let Some(InputEvent::Mouse(mouse)) = queue.peek_head() else {
            panic!("expected mouse event");
        };
        assert_eq2!(mouse.position, point(5, 7));

        // A click is not a move, so it is appended.
        let click = InputEvent::Mouse(MouseEvent {
            position: point(5, 7),
            button_state: 1,
            control_key_state: ControlKeyState::empty(),
            event_flags: MouseEventFlags::empty(),
        });
        queue.write(click);
        queue.write(click);
        assert_eq2!(queue.len(), 3);
    }

    #[test]
    fn test_read_decoalesces_one_repeat_at_a_time() {
        let mut queue = InputEventQueue::new();
        for _ in 0..3 {
            queue.write(key_char('z'));
        }

        let batch = read_all(&mut queue, 1, true);
        assert_eq2!(batch.events.len(), 1);
        assert_eq2!(batch.events[0].as_key().map(|it| it.repeat_count), Some(1));
        assert!(!batch.reset_wait_on_empty);
        assert_eq2!(queue.len(), 1);
        assert_eq2!(queue.peek_head().and_then(InputEvent::as_key).map(|it| it.repeat_count), Some(2));

        let batch = read_all(&mut queue, 10, true);
        assert_eq2!(batch.events.len(), 2);
        assert!(batch.reset_wait_on_empty);
        assert!(queue.is_empty());
        assert!(!queue.is_data_ready());
    }

    #[test]
    fn test_ansi_read_counts_fullwidth_as_two_units() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('漢'));
        queue.write(key_char('a'));

        let batch = read_all(&mut queue, 2, false);
        assert_eq2!(batch.events.len(), 1);
        assert_eq2!(batch.events[0].as_key().map(|it| it.unicode_char), Some('漢' as u16));
        assert_eq2!(queue.len(), 1);
    }

    #[test]
    fn test_unicode_read_counts_fullwidth_as_one_unit() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('漢'));
        queue.write(key_char('a'));

        let batch = read_all(&mut queue, 2, true);
        assert_eq2!(batch.events.len(), 2);
    }

    #[test]
    fn test_lone_wide_glyph_is_delivered_to_a_one_unit_read() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('漢'));
        let batch = read_all(&mut queue, 1, false);
        assert_eq2!(batch.events.len(), 1);
    }

    #[test]
    fn test_peek_leaves_queue_untouched() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('q'));
        queue.write(key_char('q'));
        queue.write(key_char('r'));

        let QueueRead::Ready(batch) = queue.read(ReadArgs {
            max_count: 10,
            peek: true,
            unicode: true,
            wait_for_data: false,
        }) else {
            panic!("expected events");
        };
        assert_eq2!(batch.events.len(), 3);
        assert!(!batch.reset_wait_on_empty);
        assert_eq2!(queue.len(), 2);
        assert!(queue.is_data_ready());
    }

    #[test]
    fn test_blocking_read_on_empty_queue_would_block() {
        let mut queue = InputEventQueue::new();
        assert_eq2!(queue.read(ReadArgs::blocking(1)), QueueRead::WouldBlock);

        let batch = read_all(&mut queue, 1, true);
        assert!(batch.events.is_empty());
        assert!(batch.reset_wait_on_empty);
    }

    #[test]
    fn test_data_ready_signals_once_per_empty_to_non_empty() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('a'));
        queue.write(key_char('b'));
        queue.write_bulk([key_char('c')]);
        assert_eq2!(queue.data_ready_signal_count(), 1);
        assert!(queue.is_data_ready());

        read_all(&mut queue, 10, true);
        assert!(!queue.is_data_ready());

        queue.prepend([key_char('d')]);
        assert_eq2!(queue.data_ready_signal_count(), 2);
    }

    #[test]
    fn test_prepend_keeps_order_ahead_of_existing_events() {
        let mut queue = InputEventQueue::new();
        queue.write(key_char('c'));
        assert_eq2!(queue.prepend([key_char('a'), key_char('b')]), 2);

        let batch = read_all(&mut queue, 10, true);
        let chars: Vec<u16> = batch
            .events
            .iter()
            .filter_map(|it| it.as_key().map(|key| key.unicode_char))
            .collect();
        assert_eq2!(chars, vec!['a' as u16, 'b' as u16, 'c' as u16]);
    }

    #[test]
    fn test_flush_all_but_keys() {
        let mut queue = InputEventQueue::new();
        queue.write_bulk([
            key_char('a'),
            mouse_move(1, 1),
            InputEvent::WindowBufferSize(size(10, 10)),
            key_char('b'),
        ]);
        queue.write_focus_event(true);
        queue.flush_all_but_keys();
        assert_eq2!(queue.len(), 2);
        assert!(queue.storage.iter().all(InputEvent::is_key));

        queue.flush();
        assert!(queue.is_empty());
        assert!(!queue.is_data_ready());
    }

    #[test]
    fn test_zero_repeat_count_is_normalized() {
        let mut queue = InputEventQueue::new();
        queue.write(InputEvent::Key(KeyEvent::from_char('a' as u16).with_repeat_count(0)));
        queue.write_bulk([InputEvent::Key(KeyEvent::from_char('b' as u16).with_repeat_count(0))]);
        assert!(
            queue
                .storage
                .iter()
                .all(|it| it.as_key().is_some_and(|key| key.repeat_count == 1))
        );
    }

    #[test]
    fn test_write_string_synthesizes_key_downs() {
        let mut queue = InputEventQueue::new();
        let text: Vec<u16> = "aa".encode_utf16().collect();
        assert_eq2!(queue.write_string(&text), 2);
        assert_eq2!(queue.len(), 2);
    }
}
