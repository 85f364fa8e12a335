// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Editor-side state: the raw markup buffer, the selection and the toolbar
//! actions that act on them.

use std::collections::HashMap;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use widestring::Utf16String;

use crate::format::{is_wrapped, toggle_format_utf16};
use crate::{
    MarkupParser, Segment, Selection, SelectionSlot, SelectionTask, StyleTag,
};

/// The formatting buttons an editor toolbar offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    InlineCode,
}

impl InlineFormat {
    /// The marker inserted by this action.
    ///
    /// Bold uses a single `*`; a span written as `**…**` is still bold when
    /// parsed, but only the single-star marker is toggled.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Bold => "*",
            Self::Italic => "_",
            Self::Underline => "__",
            Self::StrikeThrough => "~",
            Self::InlineCode => "`",
        }
    }

    pub fn style(&self) -> StyleTag {
        match self {
            Self::Bold => StyleTag::Bold,
            Self::Italic => StyleTag::Italic,
            Self::Underline => StyleTag::Underline,
            Self::StrikeThrough => StyleTag::StrikeThrough,
            Self::InlineCode => StyleTag::Mono,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionState {
    Enabled,
    /// Applying the action would remove the format.
    Reversed,
}

/// What the host should show after a composer operation.
#[derive(Debug)]
pub struct ComposerUpdate {
    pub text: String,
    pub selection: Selection,
    /// Present when the composer rewrote the buffer itself. The host must
    /// re-apply the selection (and focus) on a later event-loop turn via
    /// [`SelectionTask::take`].
    pub deferred_selection: Option<SelectionTask>,
}

#[derive(Clone, Debug)]
struct Snapshot {
    text: Utf16String,
    selection: Selection,
}

/// Raw markup editing session.
///
/// Not `Send`: a composer lives on its host's UI thread.
#[derive(Debug, Default)]
pub struct Composer {
    text: Utf16String,
    selection: Selection,
    parser: MarkupParser,
    pending_selection: SelectionSlot,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A composer holding `text` with the caret at its end.
    pub fn from_text(text: &str) -> Self {
        let text = Utf16String::from_str(text);
        let selection = Selection::caret(text.len());
        Self {
            text,
            selection,
            ..Self::default()
        }
    }

    pub fn with_parser(mut self, parser: MarkupParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    pub fn text_utf16(&self) -> &Utf16String {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Segments of the current buffer, for rendering a preview.
    pub fn segments(&self) -> Vec<Segment> {
        self.parser.parse(&self.text.to_string())
    }

    /// The host replaced the whole buffer, e.g. after a keystroke.
    ///
    /// Echoing back the text of the last update is not an edit and keeps any
    /// pending deferred selection.
    pub fn set_content(&mut self, text: &str) -> ComposerUpdate {
        let text = Utf16String::from_str(text);
        if text != self.text {
            self.push_undo();
            self.text = text;
            self.pending_selection.cancel();
        }
        self.selection = self.selection.clamped_to(&self.text);
        self.create_update(None)
    }

    /// The host moved the selection.
    pub fn select(&mut self, start: usize, end: usize) -> ComposerUpdate {
        self.selection = Selection::new(start, end);
        self.pending_selection.cancel();
        self.create_update(None)
    }

    /// Replace the current selection with `new_text`, leaving the caret
    /// after it.
    pub fn replace_text(&mut self, new_text: &str) -> ComposerUpdate {
        self.push_undo();

        let Selection { start, end } = self.selection.clamped_to(&self.text);
        let new_text = Utf16String::from_str(new_text);

        let mut text = Utf16String::with_capacity(
            self.text.len() - (end - start) + new_text.len(),
        );
        text.push_utfstr(&self.text[..start]);
        text.push_utfstr(&*new_text);
        text.push_utfstr(&self.text[end..]);

        self.text = text;
        self.selection = Selection::caret(start + new_text.len());
        self.schedule_update()
    }

    /// Toggle `marker` around the current selection.
    pub fn toggle_format(&mut self, marker: &str) -> ComposerUpdate {
        self.push_undo();

        let edit = toggle_format_utf16(
            &self.text,
            self.selection,
            &Utf16String::from_str(marker),
        );
        log::debug!(
            "toggled `{marker}` {:?}, selection now {:?}",
            edit.toggle,
            edit.selection
        );

        self.text = edit.text;
        self.selection = edit.selection;
        self.schedule_update()
    }

    pub fn apply_format(&mut self, format: InlineFormat) -> ComposerUpdate {
        self.toggle_format(format.marker())
    }

    pub fn bold(&mut self) -> ComposerUpdate {
        self.apply_format(InlineFormat::Bold)
    }

    pub fn italic(&mut self) -> ComposerUpdate {
        self.apply_format(InlineFormat::Italic)
    }

    pub fn underline(&mut self) -> ComposerUpdate {
        self.apply_format(InlineFormat::Underline)
    }

    pub fn strike_through(&mut self) -> ComposerUpdate {
        self.apply_format(InlineFormat::StrikeThrough)
    }

    pub fn inline_code(&mut self) -> ComposerUpdate {
        self.apply_format(InlineFormat::InlineCode)
    }

    /// Whether each toolbar action would add or remove its format.
    pub fn action_states(&self) -> HashMap<InlineFormat, ActionState> {
        InlineFormat::iter()
            .map(|format| {
                let marker = Utf16String::from_str(format.marker());
                let state = if is_wrapped(&self.text, self.selection, &marker)
                {
                    ActionState::Reversed
                } else {
                    ActionState::Enabled
                };
                (format, state)
            })
            .collect()
    }

    pub fn undo(&mut self) -> ComposerUpdate {
        let Some(snapshot) = self.undo_stack.pop() else {
            return self.create_update(None);
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        self.schedule_update()
    }

    pub fn redo(&mut self) -> ComposerUpdate {
        let Some(snapshot) = self.redo_stack.pop() else {
            return self.create_update(None);
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        self.schedule_update()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            selection: self.selection,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.text = snapshot.text;
        self.selection = snapshot.selection;
    }

    fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    fn schedule_update(&mut self) -> ComposerUpdate {
        let task = self.pending_selection.schedule(self.selection);
        self.create_update(Some(task))
    }

    fn create_update(
        &self,
        deferred_selection: Option<SelectionTask>,
    ) -> ComposerUpdate {
        ComposerUpdate {
            text: self.text.to_string(),
            selection: self.selection,
            deferred_selection,
        }
    }
}
