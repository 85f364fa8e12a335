// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Presentation of parsed segments.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::{Segment, SegmentKind, StyleTag};

fn style_to_tag(style: StyleTag) -> &'static str {
    match style {
        StyleTag::Bold => "strong",
        StyleTag::Italic => "em",
        StyleTag::Underline => "u",
        StyleTag::StrikeThrough => "del",
        StyleTag::Mono => "code",
    }
}

/// Render segments as HTML.
///
/// URL segments become anchors only when [`Segment::link`] accepts them;
/// anything else is rendered as escaped text.
pub fn to_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        let text = encode_text(&segment.text);
        match segment.kind {
            SegmentKind::Plain => html.push_str(&text),
            SegmentKind::Styled(style) => {
                let tag = style_to_tag(style);
                html.push_str(&format!("<{tag}>{text}</{tag}>"));
            }
            SegmentKind::Url => match segment.link() {
                Ok(url) => html.push_str(&format!(
                    "<a href=\"{}\">{text}</a>",
                    encode_double_quoted_attribute(url.as_str())
                )),
                Err(e) => {
                    log::debug!("not linking {:?}: {e}", segment.text);
                    html.push_str(&text);
                }
            },
        }
    }
    html
}

/// The visible text of `segments`, without any markers.
pub fn to_plain_text(segments: &[Segment]) -> String {
    segments.iter().map(|segment| segment.text.as_str()).collect()
}
