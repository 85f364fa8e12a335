// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Markup tokenizer.
//!
//! Parsing happens in two passes:
//!
//! 1. A left-to-right marker scan. At each position the earliest marker in
//!    the [`MarkerTable`] opens a span, and the next occurrence of the same
//!    token closes it. The enclosed content is taken verbatim, so styling is
//!    flat. A marker with no closing partner is emitted as literal text.
//! 2. Every plain segment from the first pass is re-split around
//!    `http://`/`https://` runs, which become URL segments. Styled segments
//!    are never autolinked.
//!
//! Parsing never fails: malformed input degrades to literal text.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::style::MarkerScanner;
use crate::utf16::{utf16_len, Utf16Offsets};
use crate::{MarkerTable, Segment, SegmentKind};

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://\S+").expect("URL pattern is a valid regex")
});

/// Parse `input` with the default marker table and autolinking.
pub fn parse(input: &str) -> Vec<Segment> {
    MarkupParser::default().parse(input)
}

/// Configurable markup parser.
#[derive(Clone, Debug)]
pub struct MarkupParser {
    pub markers: MarkerTable,
    /// Split `http(s)://` runs out of plain text into URL segments.
    pub autolink: bool,
}

impl Default for MarkupParser {
    fn default() -> Self {
        Self {
            markers: MarkerTable::default(),
            autolink: true,
        }
    }
}

impl MarkupParser {
    pub fn new(markers: MarkerTable) -> Self {
        Self {
            markers,
            ..Self::default()
        }
    }

    pub fn parse(&self, input: &str) -> Vec<Segment> {
        let segments = self.scan_markers(input);
        let segments = if self.autolink {
            split_urls(segments)
        } else {
            segments
        };

        #[cfg(feature = "assert-invariants")]
        self.assert_invariants(input, &segments);

        segments
    }

    fn scan_markers(&self, input: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut offsets = Utf16Offsets::new(input);
        let mut scanner = MarkerScanner::new(&self.markers, input);
        let mut i = 0;

        while i < input.len() {
            let Some((open, marker)) = scanner.earliest_from(i) else {
                push(&mut segments, &mut offsets, input, i..input.len(), None);
                break;
            };

            if open > i {
                push(&mut segments, &mut offsets, input, i..open, None);
            }

            let content_start = open + marker.token.len();
            match input[content_start..].find(marker.token) {
                Some(len) => {
                    let content_end = content_start + len;
                    push(
                        &mut segments,
                        &mut offsets,
                        input,
                        content_start..content_end,
                        Some(SegmentKind::Styled(marker.style)),
                    );
                    i = content_end + marker.token.len();
                }
                None => {
                    log::trace!(
                        "unterminated `{}` at byte {open}",
                        marker.token
                    );
                    push(
                        &mut segments,
                        &mut offsets,
                        input,
                        open..content_start,
                        None,
                    );
                    i = content_start;
                }
            }
        }

        segments
    }

    /// Check that segments cover the input in order and that anything left
    /// uncovered is made of marker characters.
    #[cfg(feature = "assert-invariants")]
    fn assert_invariants(&self, input: &str, segments: &[Segment]) {
        let units: Vec<u16> = input.encode_utf16().collect();
        let is_marker_gap = |from: usize, to: usize| {
            String::from_utf16_lossy(&units[from..to]).chars().all(|c| {
                self.markers.iter().any(|marker| marker.token.contains(c))
            })
        };

        let mut covered = 0;
        for segment in segments {
            assert!(
                covered <= segment.start_utf16
                    && segment.start_utf16 <= segment.end_utf16,
                "segment {segment:?} is out of order"
            );
            assert!(
                is_marker_gap(covered, segment.start_utf16),
                "non-marker text dropped before {segment:?}"
            );
            assert_eq!(
                String::from_utf16_lossy(
                    &units[segment.start_utf16..segment.end_utf16]
                ),
                segment.text,
                "segment text does not match its extent"
            );
            covered = segment.end_utf16;
        }
        assert!(
            is_marker_gap(covered, units.len()),
            "non-marker text dropped at end of input"
        );
    }
}

/// Push `input[range]` as a segment; `None` means plain text.
fn push(
    segments: &mut Vec<Segment>,
    offsets: &mut Utf16Offsets,
    input: &str,
    range: Range<usize>,
    kind: Option<SegmentKind>,
) {
    let start_utf16 = offsets.at(range.start);
    let end_utf16 = offsets.at(range.end);
    segments.push(Segment::new(
        &input[range],
        kind.unwrap_or(SegmentKind::Plain),
        start_utf16,
        end_utf16,
    ));
}

fn split_urls(segments: Vec<Segment>) -> Vec<Segment> {
    let mut out = Vec::with_capacity(segments.len());
    for segment in segments {
        if !segment.is_plain() || !URL_PATTERN.is_match(&segment.text) {
            out.push(segment);
            continue;
        }

        let mut unit = segment.start_utf16;
        let mut last = 0;
        for found in URL_PATTERN.find_iter(&segment.text) {
            push_fragment(
                &mut out,
                &segment.text[last..found.start()],
                SegmentKind::Plain,
                &mut unit,
            );
            push_fragment(
                &mut out,
                found.as_str(),
                SegmentKind::Url,
                &mut unit,
            );
            last = found.end();
        }
        push_fragment(
            &mut out,
            &segment.text[last..],
            SegmentKind::Plain,
            &mut unit,
        );
    }
    out
}

fn push_fragment(
    out: &mut Vec<Segment>,
    text: &str,
    kind: SegmentKind,
    unit: &mut usize,
) {
    if text.is_empty() {
        return;
    }
    let len = utf16_len(text);
    out.push(Segment::new(text, kind, *unit, *unit + len));
    *unit += len;
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use indoc::indoc;
    use speculoos::prelude::*;

    use super::*;
    use crate::{Marker, StyleTag};

    fn kinds(input: &str) -> Vec<(String, SegmentKind)> {
        parse(input)
            .into_iter()
            .map(|s| (s.text, s.kind))
            .collect()
    }

    fn plain(text: &str) -> (String, SegmentKind) {
        (text.to_owned(), SegmentKind::Plain)
    }

    fn styled(text: &str, style: StyleTag) -> (String, SegmentKind) {
        (text.to_owned(), SegmentKind::Styled(style))
    }

    fn url(text: &str) -> (String, SegmentKind) {
        (text.to_owned(), SegmentKind::Url)
    }

    #[test]
    fn plain_text_is_a_single_segment() {
        assert_that(&kinds("just some words")).is_equal_to(vec![plain(
            "just some words",
        )]);
    }

    #[test]
    fn empty_input_has_no_segments() {
        assert_that(&parse("")).has_length(0);
    }

    #[test]
    fn double_star_is_bold() {
        assert_that(&kinds("**bold**"))
            .is_equal_to(vec![styled("bold", StyleTag::Bold)]);
    }

    #[test]
    fn single_star_is_bold() {
        assert_that(&kinds("a *b* c")).is_equal_to(vec![
            plain("a "),
            styled("b", StyleTag::Bold),
            plain(" c"),
        ]);
    }

    #[test]
    fn each_marker_maps_to_its_style() {
        assert_that(&kinds("__u___i_~s~`m`")).is_equal_to(vec![
            styled("u", StyleTag::Underline),
            styled("i", StyleTag::Italic),
            styled("s", StyleTag::StrikeThrough),
            styled("m", StyleTag::Mono),
        ]);
    }

    #[test]
    fn unterminated_marker_is_literal() {
        assert_that(&kinds("hello *world")).is_equal_to(vec![
            plain("hello "),
            plain("*"),
            plain("world"),
        ]);
    }

    #[test]
    fn unterminated_double_marker_is_literal() {
        assert_that(&kinds("a ** b")).is_equal_to(vec![
            plain("a "),
            plain("**"),
            plain(" b"),
        ]);
    }

    #[test]
    fn earlier_unterminated_marker_does_not_hide_later_spans() {
        assert_that(&kinds("~ and `code`")).is_equal_to(vec![
            plain("~"),
            plain(" and "),
            styled("code", StyleTag::Mono),
        ]);
    }

    #[test]
    fn styled_content_is_not_parsed_again() {
        assert_that(&kinds("*a _b_ c*"))
            .is_equal_to(vec![styled("a _b_ c", StyleTag::Bold)]);
    }

    #[test]
    fn first_marker_wins_over_later_overlapping_one() {
        assert_that(&kinds("_a *b_ c*")).is_equal_to(vec![
            styled("a *b", StyleTag::Italic),
            plain(" c"),
            plain("*"),
        ]);
    }

    #[test]
    fn empty_styled_content_is_kept() {
        assert_that(&kinds("a__b")).is_equal_to(vec![
            plain("a"),
            styled("", StyleTag::Underline),
            plain("b"),
        ]);
        assert_that(&kinds("****"))
            .is_equal_to(vec![styled("", StyleTag::Bold)]);
    }

    #[test]
    fn urls_are_split_out_of_plain_text() {
        assert_that(&kinds("see https://x.test")).is_equal_to(vec![
            plain("see "),
            url("https://x.test"),
        ]);
        assert_that(&kinds("http://a.b/c and https://d.e/f?g=h now"))
            .is_equal_to(vec![
                url("http://a.b/c"),
                plain(" and "),
                url("https://d.e/f?g=h"),
                plain(" now"),
            ]);
    }

    #[test]
    fn url_stops_at_whitespace() {
        assert_that(&kinds(indoc! {"
            go to https://x.test/page
            then come back"}))
        .is_equal_to(vec![
            plain("go to "),
            url("https://x.test/page"),
            plain("\nthen come back"),
        ]);
    }

    #[test]
    fn scheme_without_host_is_not_a_url() {
        assert_that(&kinds("https:// alone"))
            .is_equal_to(vec![plain("https:// alone")]);
    }

    #[test]
    fn urls_inside_styled_spans_are_not_links() {
        assert_that(&kinds("*see https://x.test*"))
            .is_equal_to(vec![styled("see https://x.test", StyleTag::Bold)]);
    }

    #[test]
    fn marker_characters_inside_urls_still_split_the_text() {
        assert_that(&kinds("https://x.test/a_b_c")).is_equal_to(vec![
            url("https://x.test/a"),
            styled("b", StyleTag::Italic),
            plain("c"),
        ]);
    }

    #[test]
    fn autolink_can_be_disabled() {
        let parser = MarkupParser {
            autolink: false,
            ..MarkupParser::default()
        };
        let segments = parser.parse("see https://x.test");
        assert_that(&segments).has_length(1);
        assert!(segments[0].is_plain());
    }

    #[test]
    fn custom_marker_tables_are_honoured() {
        let parser = MarkupParser::new(MarkerTable::new([Marker::new(
            "==",
            StyleTag::Mono,
        )]));
        let segments = parser.parse("a ==b== *c*");
        let got: Vec<(&str, SegmentKind)> =
            segments.iter().map(|s| (s.text.as_str(), s.kind)).collect();
        assert_eq!(
            got,
            vec![
                ("a ", SegmentKind::Plain),
                ("b", SegmentKind::Styled(StyleTag::Mono)),
                (" *c*", SegmentKind::Plain),
            ]
        );
    }

    #[test]
    fn extents_are_utf16_offsets_into_the_raw_text() {
        let segments = parse("\u{1F4A9} *b\u{03A9}* https://x.test");
        let extents: Vec<(usize, usize)> = segments
            .iter()
            .map(|s| (s.start_utf16, s.end_utf16))
            .collect();
        // 💩 is two code units; the bold content skips its opening `*`.
        assert_eq!(extents, vec![(0, 3), (4, 6), (7, 8), (8, 22)]);
    }

    #[test]
    fn long_posts_parse_in_one_pass() {
        let input = "*a* _b_ https://x.test/c ".repeat(20_000);
        let segments = parse(&input);
        assert_that(&segments).has_length(120_000);
        assert_eq!(segments[119_999].text, " ");
        assert_eq!(segments[119_999].end_utf16, input.len());
    }

    #[test]
    fn long_runs_of_spans_parse() {
        let segments = parse(&"*a*".repeat(40_000));
        assert_that(&segments).has_length(40_000);
        assert!(segments
            .iter()
            .all(|s| s.style() == Some(StyleTag::Bold) && s.text == "a"));
    }

    #[test]
    fn unmatched_marker_extent_covers_the_marker() {
        let segments = parse("a *b");
        assert_eq!(segments[1].text, "*");
        assert_eq!((segments[1].start_utf16, segments[1].end_utf16), (2, 3));
    }
}
