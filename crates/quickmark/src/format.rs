// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The toggle-format command: wrap a selection in a marker pair, or unwrap
//! it if it is already wrapped.
//!
//! The command works on raw markup text and knows nothing about the parser's
//! marker table. Any marker string is accepted verbatim.

use widestring::{Utf16Str, Utf16String};

use crate::utf16::{ceil_boundary, floor_boundary};

/// A selection in UTF-16 code units. `start` may be after `end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A collapsed selection at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    /// The same range with `start <= end`.
    pub fn normalized(self) -> Self {
        Self::new(self.start.min(self.end), self.start.max(self.end))
    }

    pub fn len(&self) -> usize {
        self.start.abs_diff(self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Normalize, then clamp to `text` so that the range can be sliced.
    ///
    /// Offsets past the end of `text` are clamped to its length. An offset
    /// inside a surrogate pair is moved outwards to the nearest code point
    /// boundary, so the range never shrinks.
    pub fn clamped_to(self, text: &Utf16Str) -> Self {
        let Self { start, end } = self.normalized();
        Self::new(floor_boundary(text, start), ceil_boundary(text, end))
    }
}

/// Which way a toggle went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// The marker pair was inserted around the selection.
    On,
    /// The marker pair surrounding the selection was removed.
    Off,
}

/// The result of [`toggle_format`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatEdit {
    pub text: Utf16String,
    /// The selection covering the same content in `text`.
    pub selection: Selection,
    pub toggle: Toggle,
}

/// Toggle `marker` around `selection` in `text`.
///
/// See [`toggle_format_utf16`].
pub fn toggle_format(
    text: &str,
    selection: Selection,
    marker: &str,
) -> FormatEdit {
    toggle_format_utf16(
        &Utf16String::from_str(text),
        selection,
        &Utf16String::from_str(marker),
    )
}

/// Toggle `marker` around `selection` in `text`.
///
/// If the text just before the selection ends with `marker` and the text
/// just after it starts with `marker`, one marker is removed from each side.
/// Otherwise the selection is wrapped in a pair of markers. Either way the
/// returned selection covers the originally selected content.
///
/// The selection is normalized and clamped with [`Selection::clamped_to`]
/// first, so out-of-range offsets never panic.
pub fn toggle_format_utf16(
    text: &Utf16Str,
    selection: Selection,
    marker: &Utf16Str,
) -> FormatEdit {
    let Selection { start, end } = selection.clamped_to(text);
    let before = &text[..start];
    let selected = &text[start..end];
    let after = &text[end..];
    let marker_len = marker.len();

    let mut new_text =
        Utf16String::with_capacity(text.len() + 2 * marker_len);

    if surrounds(before, after, marker) {
        log::trace!("unwrapping {start}..{end} from `{marker}`");
        new_text.push_utfstr(&before[..before.len() - marker_len]);
        new_text.push_utfstr(selected);
        new_text.push_utfstr(&after[marker_len..]);

        let new_start = start - marker_len;
        FormatEdit {
            text: new_text,
            selection: Selection::new(new_start, new_start + selected.len()),
            toggle: Toggle::Off,
        }
    } else {
        log::trace!("wrapping {start}..{end} in `{marker}`");
        new_text.push_utfstr(before);
        new_text.push_utfstr(marker);
        new_text.push_utfstr(selected);
        new_text.push_utfstr(marker);
        new_text.push_utfstr(after);

        let new_start = start + marker_len;
        FormatEdit {
            text: new_text,
            selection: Selection::new(new_start, new_start + selected.len()),
            toggle: Toggle::On,
        }
    }
}

/// Whether toggling `marker` at `selection` would unwrap it.
pub fn is_wrapped(
    text: &Utf16Str,
    selection: Selection,
    marker: &Utf16Str,
) -> bool {
    let Selection { start, end } = selection.clamped_to(text);
    surrounds(&text[..start], &text[end..], marker)
}

fn surrounds(before: &Utf16Str, after: &Utf16Str, marker: &Utf16Str) -> bool {
    before.as_slice().ends_with(marker.as_slice())
        && after.as_slice().starts_with(marker.as_slice())
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wrapping_moves_the_selection_inside_the_markers() {
        let edit = toggle_format("hello world", Selection::new(0, 5), "**");
        assert_eq!(edit.text.to_string(), "**hello** world");
        assert_eq!(edit.selection, Selection::new(2, 7));
        assert_eq!(edit.toggle, Toggle::On);
    }

    #[wasm_bindgen_test]
    fn unwrapping_restores_the_text() {
        let edit =
            toggle_format("**hello** world", Selection::new(2, 7), "**");
        assert_eq!(edit.text.to_string(), "hello world");
        assert_eq!(edit.selection, Selection::new(0, 5));
        assert_eq!(edit.toggle, Toggle::Off);
    }
}
