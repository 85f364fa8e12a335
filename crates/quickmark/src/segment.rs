// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;
use url::Url;

use crate::StyleTag;

/// What a [`Segment`] renders as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Plain,
    Styled(StyleTag),
    /// An autolinked `http://` or `https://` run.
    Url,
}

/// A run of visible text produced by the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
    /// UTF-16 offset of `text` inside the raw markup.
    pub start_utf16: usize,
    /// Exclusive UTF-16 end offset of `text` inside the raw markup.
    pub end_utf16: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("segment is not a link")]
    NotALink,
    #[error("invalid link: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("unsupported link scheme `{0}`")]
    UnsupportedScheme(String),
}

impl Segment {
    pub fn new(
        text: impl Into<String>,
        kind: SegmentKind,
        start_utf16: usize,
        end_utf16: usize,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
            start_utf16,
            end_utf16,
        }
    }

    pub fn style(&self) -> Option<StyleTag> {
        match self.kind {
            SegmentKind::Styled(style) => Some(style),
            _ => None,
        }
    }

    pub fn is_url(&self) -> bool {
        self.kind == SegmentKind::Url
    }

    pub fn is_plain(&self) -> bool {
        self.kind == SegmentKind::Plain
    }

    /// The link target of a URL segment, if it is safe to open.
    ///
    /// Only `http` and `https` targets are accepted.
    pub fn link(&self) -> Result<Url, LinkError> {
        if !self.is_url() {
            return Err(LinkError::NotALink);
        }
        let url = Url::parse(&self.text)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(LinkError::UnsupportedScheme(other.to_owned())),
        }
    }
}
