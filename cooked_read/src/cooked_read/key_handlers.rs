// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Handlers for the command line editing keys: cursor motion, history recall, and the
//! function keys that open popups or copy from the last command.

use super::{CookedLineEditor, CookedReadError, EditorContext};
use crate::{ControlKeyState, KeyEvent, PopupKindTag, SearchDirection, UNICODE_CTRL_Z,
            VirtualKey, next_code_point, ok};

fn is_plain(control_key_state: ControlKeyState) -> bool {
    !control_key_state.is_ctrl_pressed() && !control_key_state.is_alt_pressed()
}

fn is_function_key_up_to_f9(vk: VirtualKey) -> bool { (VirtualKey::F1.0..=VirtualKey::F9.0).contains(&vk.0) }

/// Keys the editor handles itself instead of inserting a character. Shift doesn't
/// change the answer.
#[must_use]
pub fn is_command_line_editing_key(key: &KeyEvent) -> bool {
    let vk = key.virtual_key_code;
    let cks = key.control_key_state;

    if is_plain(cks) {
        return matches!(
            vk,
            VirtualKey::ESCAPE
                | VirtualKey::PRIOR
                | VirtualKey::NEXT
                | VirtualKey::END
                | VirtualKey::HOME
                | VirtualKey::LEFT
                | VirtualKey::UP
                | VirtualKey::RIGHT
                | VirtualKey::DOWN
                | VirtualKey::INSERT
                | VirtualKey::DELETE
        ) || is_function_key_up_to_f9(vk);
    }
    if cks.is_ctrl_pressed() {
        return matches!(
            vk,
            VirtualKey::END | VirtualKey::HOME | VirtualKey::LEFT | VirtualKey::RIGHT
        );
    }
    matches!(vk, VirtualKey::F7 | VirtualKey::F10)
}

/// Keys a popup receives as special keys. Everything else reaches it as a character.
#[must_use]
pub fn is_popup_key(key: &KeyEvent) -> bool {
    is_plain(key.control_key_state)
        && matches!(
            key.virtual_key_code,
            VirtualKey::ESCAPE
                | VirtualKey::PRIOR
                | VirtualKey::NEXT
                | VirtualKey::END
                | VirtualKey::HOME
                | VirtualKey::LEFT
                | VirtualKey::UP
                | VirtualKey::RIGHT
                | VirtualKey::DOWN
                | VirtualKey::F2
                | VirtualKey::F4
                | VirtualKey::F7
                | VirtualKey::F9
                | VirtualKey::DELETE
        )
}

/// Dispatch a key for which [`is_command_line_editing_key`] is `true`.
///
/// # Errors
///
/// Returns [`CookedReadError::Fatal`] if a popup can't be drawn.
pub fn handle_command_line_key(
    editor: &mut CookedLineEditor,
    key: &KeyEvent,
    ctx: &mut EditorContext<'_>,
) -> Result<(), CookedReadError> {
    let cks = key.control_key_state;
    if cks.is_ctrl_pressed() {
        return handle_control_key(editor, key.virtual_key_code);
    }
    if cks.is_alt_pressed() {
        return handle_alt_key(editor, key.virtual_key_code, ctx);
    }
    handle_regular_key(editor, key.virtual_key_code, ctx)
}

fn handle_control_key(
    editor: &mut CookedLineEditor,
    vk: VirtualKey,
) -> Result<(), CookedReadError> {
    match vk {
        VirtualKey::END => editor.prompt.delete_to_end(),
        VirtualKey::HOME => editor.prompt.delete_to_start(),
        VirtualKey::LEFT => editor.prompt.move_word_left(),
        VirtualKey::RIGHT => editor.prompt.move_word_right(),
        _ => return ok!(),
    }
    editor.dirty = true;
    ok!()
}

fn handle_alt_key(
    editor: &CookedLineEditor,
    vk: VirtualKey,
    ctx: &mut EditorContext<'_>,
) -> Result<(), CookedReadError> {
    match vk {
        VirtualKey::F7 => {
            if let Some(history) = ctx.history_mut(editor.history_id) {
                history.empty();
                tracing::debug!(message = "history emptied", app_name = %history.app_name());
            }
        }
        VirtualKey::F10 => {
            tracing::debug!(message = "alias clearing requested, aliases are not supported");
        }
        _ => {}
    }
    ok!()
}

fn handle_regular_key(
    editor: &mut CookedLineEditor,
    vk: VirtualKey,
    ctx: &mut EditorContext<'_>,
) -> Result<(), CookedReadError> {
    match vk {
        VirtualKey::ESCAPE => handle_escape(editor),
        VirtualKey::HOME => handle_home(editor),
        VirtualKey::END => handle_end(editor),
        VirtualKey::LEFT => handle_left(editor),
        VirtualKey::F1 | VirtualKey::RIGHT => handle_right(editor, ctx),
        VirtualKey::INSERT => handle_insert(ctx),
        VirtualKey::DELETE => handle_delete(editor),
        VirtualKey::UP | VirtualKey::F5 => handle_recall(editor, ctx, SearchDirection::Previous),
        VirtualKey::DOWN => handle_recall(editor, ctx, SearchDirection::Next),
        VirtualKey::PRIOR => handle_recall_nth(editor, ctx, 0),
        VirtualKey::NEXT => handle_recall_nth(editor, ctx, usize::MAX),
        VirtualKey::F3 => handle_f3(editor, ctx),
        VirtualKey::F6 => editor.insert_units(&[UNICODE_CTRL_Z], ctx),
        VirtualKey::F8 => handle_f8(editor, ctx),
        VirtualKey::F2 => return open_history_popup(editor, ctx, PopupKindTag::CopyToChar),
        VirtualKey::F4 => return editor.open_popup(PopupKindTag::CopyFromChar, ctx),
        VirtualKey::F7 => return open_history_popup(editor, ctx, PopupKindTag::CommandList),
        VirtualKey::F9 => return open_history_popup(editor, ctx, PopupKindTag::CommandNumber),
        _ => {}
    }
    ok!()
}

fn handle_escape(editor: &mut CookedLineEditor) {
    editor.prompt.clear();
    editor.dirty = true;
}

fn handle_home(editor: &mut CookedLineEditor) {
    editor.prompt.move_home();
    editor.dirty = true;
}

fn handle_end(editor: &mut CookedLineEditor) {
    editor.prompt.move_end();
    editor.dirty = true;
}

fn handle_left(editor: &mut CookedLineEditor) {
    editor.prompt.move_left();
    editor.dirty = true;
}

/// Move right, or at the end of the prompt copy the next code point of the last
/// command.
fn handle_right(editor: &mut CookedLineEditor, ctx: &EditorContext<'_>) {
    editor.dirty = true;
    if !editor.prompt.is_at_end() {
        editor.prompt.move_right();
        return;
    }
    let Some(last_command) = ctx.history(editor.history_id).and_then(|it| it.last_command())
    else {
        return;
    };
    let start = editor.prompt.len();
    if start < last_command.len() {
        let end = next_code_point(last_command, start);
        editor.prompt.insert(&last_command[start..end]);
    }
}

fn handle_insert(ctx: &mut EditorContext<'_>) {
    *ctx.insert_mode = !*ctx.insert_mode;
    tracing::debug!(message = "insert mode toggled", insert_mode = *ctx.insert_mode);
}

fn handle_delete(editor: &mut CookedLineEditor) {
    editor.dirty |= editor.prompt.delete_at_cursor();
}

fn handle_recall(
    editor: &mut CookedLineEditor,
    ctx: &mut EditorContext<'_>,
    direction: SearchDirection,
) {
    if let Some(history) = ctx.history_mut(editor.history_id)
        && let Some(entry) = history.retrieve(direction)
    {
        editor.prompt.replace_all(entry);
        editor.dirty = true;
    }
}

fn handle_recall_nth(editor: &mut CookedLineEditor, ctx: &mut EditorContext<'_>, index: usize) {
    if let Some(history) = ctx.history_mut(editor.history_id)
        && let Some(entry) = history.retrieve_nth(index)
    {
        editor.prompt.replace_all(entry);
        editor.dirty = true;
    }
}

/// Copy the rest of the last command, from the cursor on, over the prompt.
fn handle_f3(editor: &mut CookedLineEditor, ctx: &EditorContext<'_>) {
    let Some(last_command) = ctx.history(editor.history_id).and_then(|it| it.last_command())
    else {
        return;
    };
    let cursor = editor.prompt.insertion_index();
    if cursor < last_command.len() {
        editor.prompt.replace_range(cursor, usize::MAX, &last_command[cursor..]);
        editor.dirty = true;
    }
}

/// Replace the prompt with the next older entry that starts with the text before the
/// cursor. The cursor stays where it was.
fn handle_f8(editor: &mut CookedLineEditor, ctx: &mut EditorContext<'_>) {
    let cursor = editor.prompt.insertion_index();
    let Some(history) = ctx.history_mut(editor.history_id) else {
        return;
    };
    let prefix = &editor.prompt.text()[..cursor];
    let Some(found) = history.find_next_match(prefix) else {
        return;
    };
    if let Some(entry) = history.nth(found) {
        editor.prompt.replace_all(entry);
        editor.prompt.set_insertion_index(cursor);
        editor.dirty = true;
    }
}

fn open_history_popup(
    editor: &mut CookedLineEditor,
    ctx: &mut EditorContext<'_>,
    tag: PopupKindTag,
) -> Result<(), CookedReadError> {
    let has_entries = ctx
        .history(editor.history_id)
        .is_some_and(|it| !it.is_empty());
    if has_entries {
        editor.open_popup(tag, ctx)?;
    }
    ok!()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{InputEvent, assert_eq2,
                test_fixtures::{EditorHarness, key_vk, typed}};

    fn plain(vk: VirtualKey) -> InputEvent { key_vk(vk, ControlKeyState::empty()) }

    fn ctrl(vk: VirtualKey) -> InputEvent { key_vk(vk, ControlKeyState::LEFT_CTRL_PRESSED) }

    fn alt(vk: VirtualKey) -> InputEvent { key_vk(vk, ControlKeyState::LEFT_ALT_PRESSED) }

    /// Type `text`, move the cursor to `cursor`, press `key`.
    fn edit(text: &str, cursor: usize, key: InputEvent) -> (String, usize) {
        let mut harness = EditorHarness::new();
        let mut editor = harness.editor();
        harness.feed(&mut editor, typed(text));
        editor.prompt.set_insertion_index(cursor);
        harness.feed(&mut editor, [key]);
        (
            editor.prompt().text().to_string_lossy(),
            editor.prompt().insertion_index(),
        )
    }

    #[test_case(plain(VirtualKey::ESCAPE), "", 0 ; "escape clears")]
    #[test_case(plain(VirtualKey::HOME), "cd foo bar", 0 ; "home")]
    #[test_case(plain(VirtualKey::END), "cd foo bar", 10 ; "end")]
    #[test_case(plain(VirtualKey::LEFT), "cd foo bar", 4 ; "left")]
    #[test_case(plain(VirtualKey::RIGHT), "cd foo bar", 6 ; "right")]
    #[test_case(plain(VirtualKey::DELETE), "cd fo bar", 5 ; "delete")]
    #[test_case(ctrl(VirtualKey::END), "cd fo", 5 ; "ctrl end deletes to end")]
    #[test_case(ctrl(VirtualKey::HOME), "o bar", 0 ; "ctrl home deletes to start")]
    #[test_case(ctrl(VirtualKey::LEFT), "cd foo bar", 3 ; "ctrl left")]
    #[test_case(ctrl(VirtualKey::RIGHT), "cd foo bar", 7 ; "ctrl right")]
    #[test_case(plain(VirtualKey::F6), "cd fo\u{1a}o bar", 6 ; "f6 inserts ctrl z")]
    fn test_editing_keys(key: InputEvent, expected_text: &str, expected_cursor: usize) {
        assert_eq2!(
            edit("cd foo bar", 5, key),
            (expected_text.to_string(), expected_cursor)
        );
    }

    #[test]
    fn test_up_down_recall_clamps() {
        let mut harness = EditorHarness::with_history(&["one", "two"]);
        let mut editor = harness.editor();
        let mut press = |vk: VirtualKey| {
            harness.feed(&mut editor, [plain(vk)]);
            editor.prompt().text().to_string_lossy()
        };

        assert_eq2!(press(VirtualKey::UP), "two");
        assert_eq2!(press(VirtualKey::UP), "one");
        assert_eq2!(press(VirtualKey::F5), "one");
        assert_eq2!(press(VirtualKey::DOWN), "two");
        assert_eq2!(press(VirtualKey::DOWN), "two");
        assert_eq2!(press(VirtualKey::PRIOR), "one");
        assert_eq2!(press(VirtualKey::NEXT), "two");
    }

    #[test]
    fn test_f1_and_f3_copy_from_last_command() {
        let mut harness = EditorHarness::with_history(&["hello"]);
        let mut editor = harness.editor();

        harness.feed(&mut editor, typed("ab").into_iter().chain([plain(VirtualKey::F1)]));
        assert_eq2!(editor.prompt().text().to_string_lossy(), "abl");

        harness.feed(&mut editor, [plain(VirtualKey::F3)]);
        assert_eq2!(editor.prompt().text().to_string_lossy(), "abllo");
        assert!(editor.prompt().is_at_end());
    }

    #[test]
    fn test_f8_cycles_prefix_matches_keeping_cursor() {
        let mut harness = EditorHarness::with_history(&["git status", "ls", "git log"]);
        let mut editor = harness.editor();
        harness.feed(&mut editor, typed("git"));

        let mut press_f8 = || {
            harness.feed(&mut editor, [plain(VirtualKey::F8)]);
            (
                editor.prompt().text().to_string_lossy(),
                editor.prompt().insertion_index(),
            )
        };

        assert_eq2!(press_f8(), ("git log".to_string(), 3));
        assert_eq2!(press_f8(), ("git status".to_string(), 3));
        assert_eq2!(press_f8(), ("git log".to_string(), 3));
    }

    #[test]
    fn test_alt_f7_empties_history() {
        let mut harness = EditorHarness::with_history(&["one", "two"]);
        let mut editor = harness.editor();

        harness.feed(&mut editor, [alt(VirtualKey::F7)]);

        assert!(harness.history_entries().is_empty());
        assert!(editor.popups().is_empty());
    }

    #[test]
    fn test_insert_toggles_mode() {
        let mut harness = EditorHarness::new();
        let mut editor = harness.editor();

        harness.feed(&mut editor, [plain(VirtualKey::INSERT)]);
        assert!(!harness.insert_mode);
        harness.feed(&mut editor, [plain(VirtualKey::INSERT)]);
        assert!(harness.insert_mode);
    }

    #[test]
    fn test_history_popups_need_entries() {
        let mut harness = EditorHarness::new();
        let mut editor = harness.editor();

        for vk in [VirtualKey::F2, VirtualKey::F7, VirtualKey::F9] {
            harness.feed(&mut editor, [plain(vk)]);
            assert!(editor.popups().is_empty());
        }

        harness.feed(&mut editor, [plain(VirtualKey::F4)]);
        assert_eq2!(editor.popups().len(), 1);
    }

    #[test]
    fn test_f4_deletes_up_to_char() {
        let mut harness = EditorHarness::new();
        let mut editor = harness.editor();
        harness.feed(&mut editor, typed("rm -rf build"));
        editor.prompt.set_insertion_index(3);

        harness.feed(&mut editor, [plain(VirtualKey::F4)]);
        harness.feed(&mut editor, typed("b"));

        assert!(editor.popups().is_empty());
        assert_eq2!(editor.prompt().text().to_string_lossy(), "rm build");
        assert_eq2!(harness.screen.row_text(0), "rm build");
    }

    #[test]
    fn test_f2_copies_up_to_char() {
        let mut harness = EditorHarness::with_history(&["echo hello"]);
        let mut editor = harness.editor();

        harness.feed(&mut editor, [plain(VirtualKey::F2)]);
        assert_eq2!(harness.screen.row_text(1), "Enter char to copy up to:");
        harness.feed(&mut editor, typed(" "));

        assert_eq2!(editor.prompt().text().to_string_lossy(), "echo");
        assert_eq2!(harness.screen.row_text(1), "");
    }

    #[test_case(ControlKeyState::empty(), VirtualKey::F7, true)]
    #[test_case(ControlKeyState::SHIFT_PRESSED, VirtualKey::UP, true)]
    #[test_case(ControlKeyState::LEFT_CTRL_PRESSED, VirtualKey::UP, false)]
    #[test_case(ControlKeyState::LEFT_CTRL_PRESSED, VirtualKey::HOME, true)]
    #[test_case(ControlKeyState::RIGHT_ALT_PRESSED, VirtualKey::F10, true)]
    #[test_case(ControlKeyState::RIGHT_ALT_PRESSED, VirtualKey::F2, false)]
    #[test_case(ControlKeyState::empty(), VirtualKey::F10, false)]
    fn test_is_command_line_editing_key(cks: ControlKeyState, vk: VirtualKey, expected: bool) {
        let InputEvent::Key(key) = key_vk(vk, cks) else {
            unreachable!()
        };
        assert_eq2!(is_command_line_editing_key(&key), expected);
    }
}
