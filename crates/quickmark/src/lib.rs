// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inline markup for post composers.
//!
//! Raw post content is a flat, wiki-style markup string. [`parse`] turns it
//! into styled [`Segment`]s for rendering, and [`toggle_format`] wraps or
//! unwraps a selection in a marker pair while keeping the selection pointing
//! at the same logical content. [`Composer`] ties the two together for an
//! editor surface.
//!
//! All positions exposed by this crate are UTF-16 code unit offsets, matching
//! the native text-input controls of the platforms that host it.

mod composer;
mod deferred;
mod format;
mod parser;
mod render;
mod segment;
mod style;
mod utf16;

pub use composer::{ActionState, Composer, ComposerUpdate, InlineFormat};
pub use deferred::{SelectionSlot, SelectionTask};
pub use format::{
    is_wrapped, toggle_format, toggle_format_utf16, FormatEdit, Selection,
    Toggle,
};
pub use parser::{parse, MarkupParser};
pub use render::{to_html, to_plain_text};
pub use segment::{LinkError, Segment, SegmentKind};
pub use style::{Marker, MarkerTable, StyleTag};
