// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

use super::{Popup, PopupInput, PopupKindTag, PopupOutcome, draw_popup, popup_height,
            popup_region};
use crate::{CommandHistory, PromptBuffer, ScreenBuffer};

/// Everything a popup touches while it is open. Built by the line editor for each
/// keystroke from borrows of its own state and of the session.
#[derive(Debug)]
pub struct PopupContext<'a> {
    pub prompt: &'a mut PromptBuffer,
    pub history: Option<&'a mut CommandHistory>,
    pub screen: &'a mut dyn ScreenBuffer,
    /// First row below the echoed prompt.
    pub anchor_row: usize,
    /// Upper bound on command list rows.
    pub max_height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupStackOutcome {
    /// At least one popup is still open.
    Open,
    /// The last popup closed. With `submit_line` the editor completes the line.
    Closed { submit_line: bool },
}

/// LIFO stack of open popups. Only the top popup receives input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PopupStack {
    popups: Vec<Popup>,
}

impl PopupStack {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.popups.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.popups.len() }

    #[must_use]
    pub fn top(&self) -> Option<&Popup> { self.popups.last() }

    pub fn iter(&self) -> impl Iterator<Item = &Popup> { self.popups.iter() }

    /// Open a popup of kind `tag` on top of the stack, backing up the cells it covers.
    ///
    /// # Errors
    ///
    /// Returns an error if the popup can't be drawn.
    pub fn push(&mut self, tag: PopupKindTag, ctx: &mut PopupContext<'_>) -> io::Result<()> {
        let screen_size = ctx.screen.size();
        let max_height = ctx
            .max_height
            .min((screen_size.rows / 2).saturating_sub(1))
            .max(1);

        let mut popup = Popup::new(tag, ctx.history.as_deref(), max_height);
        let anchor_row = self
            .popups
            .last()
            .map_or(ctx.anchor_row, |parent| parent.region.bottom());
        popup.region = popup_region(popup_height(&popup), anchor_row, screen_size);
        popup.backup = Some(ctx.screen.save_region(popup.region));
        draw_popup(&popup, ctx.history.as_deref(), ctx.screen)?;

        tracing::debug!(
            message = "popup opened",
            popup = %tag,
            region = %popup.region,
            depth = self.popups.len() + 1
        );
        self.popups.push(popup);
        Ok(())
    }

    /// Route one keystroke to the top popup and act on its outcome.
    ///
    /// A popup that fails while applying its effect is treated as cancelled, and the
    /// prompt is put back the way it was before this keystroke. Closing the command
    /// number popup, for any reason, closes every popup on the stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen can't be redrawn or restored.
    pub fn process(
        &mut self,
        input: PopupInput,
        ctx: &mut PopupContext<'_>,
    ) -> io::Result<PopupStackOutcome> {
        let (tag, outcome) = {
            let Some(top) = self.popups.last_mut() else {
                return Ok(PopupStackOutcome::Closed { submit_line: false });
            };
            let tag = top.tag();
            let snapshot = ctx.prompt.clone();
            let outcome = match top.process(input, ctx.prompt, ctx.history.as_deref_mut()) {
                Ok(it) => it,
                Err(error) => {
                    tracing::warn!(
                        message = "popup failed, prompt rolled back",
                        popup = %tag,
                        ?error
                    );
                    *ctx.prompt = snapshot;
                    PopupOutcome::Cancelled
                }
            };
            (tag, outcome)
        };

        let submit_line = match outcome {
            PopupOutcome::Continue => {
                if let Some(top) = self.popups.last() {
                    draw_popup(top, ctx.history.as_deref(), ctx.screen)?;
                }
                return Ok(PopupStackOutcome::Open);
            }
            PopupOutcome::SpawnChild(child) => {
                self.push(child, ctx)?;
                return Ok(PopupStackOutcome::Open);
            }
            PopupOutcome::Completed { submit_line } => submit_line,
            PopupOutcome::Cancelled => false,
        };

        if tag == PopupKindTag::CommandNumber {
            self.close_all(ctx.screen)?;
        } else {
            self.close_top(ctx.screen)?;
        }
        tracing::debug!(
            message = "popup closed",
            popup = %tag,
            ?outcome,
            remaining = self.popups.len()
        );

        if self.popups.is_empty() {
            Ok(PopupStackOutcome::Closed { submit_line })
        } else {
            if let Some(top) = self.popups.last() {
                draw_popup(top, ctx.history.as_deref(), ctx.screen)?;
            }
            Ok(PopupStackOutcome::Open)
        }
    }

    /// Close the top popup and restore the cells under it.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen can't be restored.
    pub fn close_top(&mut self, screen: &mut dyn ScreenBuffer) -> io::Result<()> {
        if let Some(popup) = self.popups.pop()
            && let Some(backup) = &popup.backup
        {
            screen.restore_region(backup)?;
        }
        Ok(())
    }

    /// Close every popup, most recent first, so each backup goes back in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen can't be restored.
    pub fn close_all(&mut self, screen: &mut dyn ScreenBuffer) -> io::Result<()> {
        while !self.popups.is_empty() {
            self.close_top(screen)?;
        }
        Ok(())
    }
}
