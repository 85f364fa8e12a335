// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! JavaScript bindings for the quickmark composer and parser.
//!
//! Offsets cross the boundary as UTF-16 code units, which is what
//! `HTMLTextAreaElement.selectionStart`/`selectionEnd` use.

use js_sys::{Array, Function, Object, Promise, Reflect};
use quickmark::{ActionState, Segment, SelectionTask};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = setTimeout)]
    fn set_timeout(handler: &Function, timeout: i32) -> JsValue;
}

fn js_offset(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or(u32::MAX)
}

fn segment_to_js(segment: &Segment) -> Result<Object, JsValue> {
    let obj = Object::new();
    let style = segment
        .style()
        .map(|style| JsValue::from_str(style.as_ref()))
        .unwrap_or(JsValue::NULL);
    Reflect::set(&obj, &"text".into(), &segment.text.as_str().into())?;
    Reflect::set(&obj, &"style".into(), &style)?;
    Reflect::set(&obj, &"isUrl".into(), &segment.is_url().into())?;
    Reflect::set(
        &obj,
        &"start".into(),
        &js_offset(segment.start_utf16).into(),
    )?;
    Reflect::set(&obj, &"end".into(), &js_offset(segment.end_utf16).into())?;
    Ok(obj)
}

fn segments_to_js(segments: &[Segment]) -> Result<Array, JsValue> {
    let array = Array::new();
    for segment in segments {
        array.push(&segment_to_js(segment)?.into());
    }
    Ok(array)
}

/// Parse raw markup into an array of
/// `{ text, style, isUrl, start, end }` objects.
#[wasm_bindgen]
pub fn parse_markup(text: &str) -> Result<Array, JsValue> {
    segments_to_js(&quickmark::parse(text))
}

/// Render raw markup straight to HTML.
#[wasm_bindgen]
pub fn markup_to_html(text: &str) -> String {
    quickmark::to_html(&quickmark::parse(text))
}

#[wasm_bindgen]
pub struct ComposerModel {
    inner: quickmark::Composer,
}

impl Default for ComposerModel {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ComposerModel {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self {
            inner: quickmark::Composer::new(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        console_error_panic_hook::set_once();
        Self {
            inner: quickmark::Composer::from_text(text),
        }
    }

    pub fn text(&self) -> String {
        self.inner.text()
    }

    pub fn selection_start(&self) -> u32 {
        js_offset(self.inner.selection().start)
    }

    pub fn selection_end(&self) -> u32 {
        js_offset(self.inner.selection().end)
    }

    pub fn segments(&self) -> Result<Array, JsValue> {
        segments_to_js(&self.inner.segments())
    }

    pub fn to_html(&self) -> String {
        quickmark::to_html(&self.inner.segments())
    }

    /// `{ bold: "enabled" | "reversed", italic: …, inline_code: … }`
    pub fn action_states(&self) -> Result<Object, JsValue> {
        let obj = Object::new();
        for (format, state) in self.inner.action_states() {
            let state = match state {
                ActionState::Enabled => "enabled",
                ActionState::Reversed => "reversed",
            };
            Reflect::set(&obj, &format.to_string().into(), &state.into())?;
        }
        Ok(obj)
    }

    pub fn set_content(&mut self, text: &str) -> ComposerUpdate {
        self.inner.set_content(text).into()
    }

    pub fn select(&mut self, start: u32, end: u32) -> ComposerUpdate {
        self.inner.select(start as usize, end as usize).into()
    }

    pub fn replace_text(&mut self, text: &str) -> ComposerUpdate {
        self.inner.replace_text(text).into()
    }

    pub fn toggle_format(&mut self, marker: &str) -> ComposerUpdate {
        self.inner.toggle_format(marker).into()
    }

    pub fn bold(&mut self) -> ComposerUpdate {
        self.inner.bold().into()
    }

    pub fn italic(&mut self) -> ComposerUpdate {
        self.inner.italic().into()
    }

    pub fn underline(&mut self) -> ComposerUpdate {
        self.inner.underline().into()
    }

    pub fn strike_through(&mut self) -> ComposerUpdate {
        self.inner.strike_through().into()
    }

    pub fn inline_code(&mut self) -> ComposerUpdate {
        self.inner.inline_code().into()
    }

    pub fn undo(&mut self) -> ComposerUpdate {
        self.inner.undo().into()
    }

    pub fn redo(&mut self) -> ComposerUpdate {
        self.inner.redo().into()
    }
}

#[wasm_bindgen]
pub struct ComposerUpdate {
    text: String,
    start: u32,
    end: u32,
    deferred_selection: Option<SelectionTask>,
}

impl From<quickmark::ComposerUpdate> for ComposerUpdate {
    fn from(inner: quickmark::ComposerUpdate) -> Self {
        Self {
            text: inner.text,
            start: js_offset(inner.selection.start),
            end: js_offset(inner.selection.end),
            deferred_selection: inner.deferred_selection,
        }
    }
}

#[wasm_bindgen]
impl ComposerUpdate {
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.text.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[wasm_bindgen(getter)]
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Whether the host has to re-apply the selection after committing
    /// `text` to its input.
    pub fn needs_selection_reapply(&self) -> bool {
        self.deferred_selection
            .as_ref()
            .is_some_and(SelectionTask::is_current)
    }

    /// Call `callback(start, end)` on a later event-loop turn, unless a newer
    /// edit or selection change has happened by then or the composer was
    /// freed. The callback should set the input's selection and focus it.
    pub fn reapply_selection(&mut self, callback: Function) {
        let Some(task) = self.deferred_selection.take() else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let next_turn = Promise::new(&mut |resolve, _reject| {
                set_timeout(&resolve, 0);
            });
            if let Err(e) = JsFuture::from(next_turn).await {
                log::warn!("deferred selection timer failed: {e:?}");
                return;
            }
            let Some(selection) = task.take() else {
                return;
            };
            let start = JsValue::from(js_offset(selection.start));
            let end = JsValue::from(js_offset(selection.end));
            if let Err(e) = callback.call2(&JsValue::NULL, &start, &end) {
                log::warn!("selection callback threw: {e:?}");
            }
        });
    }
}
