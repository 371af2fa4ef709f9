// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Where a popup goes on screen and what it draws there. Popups are drawn as full width
//! rows, starting on the row below the prompt (or below their parent popup). When they
//! don't fit below, they are pushed up so their last row is the screen's last row.

use std::io;

use super::{COMMAND_NUMBER_MAX_DIGITS, CommandListState, Popup, PopupKind};
use crate::{CommandHistory, Rect, ScreenBuffer, Size, glyph_width, point, size};

pub const COPY_TO_CHAR_PROMPT: &str = "Enter char to copy up to: ";
pub const COPY_FROM_CHAR_PROMPT: &str = "Enter char to delete up to: ";
pub const COMMAND_NUMBER_PROMPT: &str = "Enter command number: ";

const SELECTED_MARKER: char = '▸';
const SCROLL_UP: char = '▴';
const SCROLL_DOWN: char = '▾';
const SCROLL_THUMB: char = '█';
const SCROLL_TRACK: char = '▒';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupLine {
    /// Exactly as wide as the popup region.
    pub text: String,
    pub is_selected: bool,
}

#[must_use]
pub fn popup_height(popup: &Popup) -> usize {
    match &popup.kind {
        PopupKind::CommandList(state) => state.height,
        _ => 1,
    }
}

/// Region for a popup of `height` rows whose preferred first row is `anchor_row`.
#[must_use]
pub fn popup_region(height: usize, anchor_row: usize, screen_size: Size) -> Rect {
    let height = height.min(screen_size.rows);
    let row = if anchor_row + height <= screen_size.rows {
        anchor_row
    } else {
        screen_size.rows - height
    };
    Rect::new(point(0, row), size(screen_size.cols, height))
}

/// Truncate `text` to `width` display cells and pad the rest with spaces.
#[must_use]
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut acc = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let ch = if ch.is_control() { ' ' } else { ch };
        let w = glyph_width(ch);
        if used + w > width {
            break;
        }
        acc.push(ch);
        used += w;
    }
    acc.extend(std::iter::repeat_n(' ', width - used));
    acc
}

#[must_use]
pub fn popup_lines(popup: &Popup, history: Option<&CommandHistory>) -> Vec<PopupLine> {
    let width = popup.region.size.cols;
    let single = |text: String| {
        vec![PopupLine {
            text: fit_to_width(&text, width),
            is_selected: false,
        }]
    };

    match &popup.kind {
        PopupKind::CopyToChar => single(COPY_TO_CHAR_PROMPT.to_owned()),
        PopupKind::CopyFromChar => single(COPY_FROM_CHAR_PROMPT.to_owned()),
        PopupKind::CommandNumber(state) => single(format!(
            "{COMMAND_NUMBER_PROMPT}{:<COMMAND_NUMBER_MAX_DIGITS$}",
            state.digits_as_string()
        )),
        PopupKind::CommandList(state) => command_list_lines(state, history, width),
    }
}

fn command_list_lines(
    state: &CommandListState,
    history: Option<&CommandHistory>,
    width: usize,
) -> Vec<PopupLine> {
    let count = history.map_or(0, CommandHistory::len);
    let index_width = count.saturating_sub(1).to_string().len();
    let has_scrollbar = count > state.height;
    let body_width = if has_scrollbar { width.saturating_sub(1) } else { width };

    (0..state.height)
        .map(|row| {
            let index = state.top + row;
            let entry = history.and_then(|it| it.nth(index));
            let is_selected = entry.is_some() && index == state.selected;

            let mut text = match entry {
                Some(entry) => {
                    let marker = if is_selected { SELECTED_MARKER } else { ' ' };
                    fit_to_width(
                        &format!("{marker}{index:>index_width$}: {}", entry.to_string_lossy()),
                        body_width,
                    )
                }
                None => fit_to_width("", body_width),
            };
            if has_scrollbar && width > 0 {
                text.push(scrollbar_glyph(state, count, row));
            }

            PopupLine { text, is_selected }
        })
        .collect()
}

fn scrollbar_glyph(state: &CommandListState, count: usize, row: usize) -> char {
    let last_row = state.height.saturating_sub(1);
    let thumb_row = (state.selected * last_row) / count.saturating_sub(1).max(1);
    match row {
        0 if state.top > 0 => SCROLL_UP,
        it if it == last_row && state.top + state.height < count => SCROLL_DOWN,
        it if it == thumb_row => SCROLL_THUMB,
        _ => SCROLL_TRACK,
    }
}

/// Paint `popup` into its region.
///
/// # Errors
///
/// Returns an error if the screen can't be written to.
pub fn draw_popup(
    popup: &Popup,
    history: Option<&CommandHistory>,
    screen: &mut dyn ScreenBuffer,
) -> io::Result<()> {
    let attributes = screen.popup_attributes();
    let origin = popup.region.origin;
    for (row, line) in popup_lines(popup, history).iter().enumerate() {
        let line_attributes = if line.is_selected {
            attributes.inverted()
        } else {
            attributes
        };
        screen.write_text(&line.text, point(origin.col, origin.row + row), line_attributes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OffscreenBuffer, PopupKindTag, assert_eq2, test_fixtures::history_with};

    #[test]
    fn test_region_below_anchor_or_pushed_up() {
        let screen = size(20, 10);
        assert_eq2!(popup_region(3, 2, screen), Rect::new(point(0, 2), size(20, 3)));
        assert_eq2!(popup_region(3, 9, screen), Rect::new(point(0, 7), size(20, 3)));
        assert_eq2!(popup_region(30, 0, screen), Rect::new(point(0, 0), size(20, 10)));
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq2!(fit_to_width("abc", 5), "abc  ");
        assert_eq2!(fit_to_width("abcdef", 3), "abc");
        assert_eq2!(fit_to_width("a漢字", 4), "a漢 ");
    }

    #[test]
    fn test_command_list_lines_mark_selection() {
        let history = history_with(&["a", "bb", "ccc"]);
        let mut popup = Popup::new(PopupKindTag::CommandList, Some(&history), 20);
        popup.region = popup_region(3, 0, size(12, 10));

        let lines = popup_lines(&popup, Some(&history));

        let texts: Vec<&str> = lines.iter().map(|it| it.text.as_str()).collect();
        assert_eq2!(texts, vec![" 0: a       ", " 1: bb      ", "▸2: ccc     "]);
        assert_eq2!(
            lines.iter().map(|it| it.is_selected).collect::<Vec<_>>(),
            vec![false, false, true]
        );
    }

    #[test]
    fn test_command_list_scrollbar() {
        let names: Vec<String> = (0..12).map(|it| format!("c{it}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let history = history_with(&refs);
        let mut popup = Popup::new(PopupKindTag::CommandList, Some(&history), 4);
        popup.region = popup_region(4, 0, size(10, 10));

        let lines = popup_lines(&popup, Some(&history));

        assert_eq2!(lines.len(), 4);
        assert_eq2!(lines[0].text.chars().last(), Some(SCROLL_UP));
        assert_eq2!(lines[3].text.chars().last(), Some(SCROLL_THUMB));
        assert_eq2!(lines[3].text, "▸11: c11 █");
    }

    #[test]
    fn test_draw_prompt_popup() {
        let mut screen = OffscreenBuffer::new(size(40, 5));
        let mut popup = Popup::new(PopupKindTag::CopyFromChar, None, 20);
        popup.region = popup_region(1, 1, screen.size());

        draw_popup(&popup, None, &mut screen).unwrap();

        assert_eq2!(screen.row_text(1), COPY_FROM_CHAR_PROMPT.trim_end());
        assert_eq2!(screen.row_text(0), "");
    }
}
