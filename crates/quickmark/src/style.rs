// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Style tags and the marker table that maps delimiters onto them.

use strum_macros::{AsRefStr, Display, EnumIter};

/// The inline styles the markup language can express.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum StyleTag {
    Bold,
    Italic,
    Underline,
    StrikeThrough,
    Mono,
}

/// A delimiter string and the style its enclosed content receives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marker {
    pub token: &'static str,
    pub style: StyleTag,
}

impl Marker {
    pub const fn new(token: &'static str, style: StyleTag) -> Self {
        Self { token, style }
    }
}

/// Markers understood by default, in priority order.
///
/// `**` must stay ahead of `*` and `__` ahead of `_`: the order is what
/// decides ties between markers that start at the same position.
const DEFAULT_MARKERS: [Marker; 6] = [
    Marker::new("**", StyleTag::Bold),
    Marker::new("*", StyleTag::Bold),
    Marker::new("__", StyleTag::Underline),
    Marker::new("_", StyleTag::Italic),
    Marker::new("~", StyleTag::StrikeThrough),
    Marker::new("`", StyleTag::Mono),
];

/// An ordered set of markers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerTable {
    markers: Vec<Marker>,
}

impl Default for MarkerTable {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.to_vec(),
        }
    }
}

impl MarkerTable {
    /// Build a table from `markers`, keeping their order.
    ///
    /// Empty tokens are skipped: they would match at every position.
    pub fn new(markers: impl IntoIterator<Item = Marker>) -> Self {
        let markers = markers
            .into_iter()
            .filter(|marker| {
                if marker.token.is_empty() {
                    log::warn!(
                        "ignoring empty marker token for {}",
                        marker.style
                    );
                    false
                } else {
                    true
                }
            })
            .collect();
        Self { markers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Style of the first marker whose token is exactly `token`.
    pub fn style_for(&self, token: &str) -> Option<StyleTag> {
        self.markers
            .iter()
            .find(|marker| marker.token == token)
            .map(|marker| marker.style)
    }

    /// Find the marker occurring earliest in `haystack`, as a byte offset.
    ///
    /// When several markers start at the same offset the longest token wins;
    /// among equally long tokens the one listed first wins.
    pub fn find_earliest(&self, haystack: &str) -> Option<(usize, &Marker)> {
        self.markers.iter().fold(None, |best, marker| {
            match haystack.find(marker.token) {
                Some(pos) => prefer(best, pos, marker),
                None => best,
            }
        })
    }
}

/// Keep `best` unless `marker` at `pos` beats it.
fn prefer<'a>(
    best: Option<(usize, &'a Marker)>,
    pos: usize,
    marker: &'a Marker,
) -> Option<(usize, &'a Marker)> {
    match best {
        Some((best_pos, best_marker))
            if best_pos < pos
                || (best_pos == pos
                    && best_marker.token.len() >= marker.token.len()) =>
        {
            best
        }
        _ => Some((pos, marker)),
    }
}

/// Remembers where each marker of a table next occurs in one input.
///
/// A marker is only searched for again once the scan has moved past its
/// remembered position, and a marker that no longer occurs is never searched
/// for again, so a full left-to-right scan reads the input once per marker.
pub(crate) struct MarkerScanner<'t, 'i> {
    table: &'t MarkerTable,
    input: &'i str,
    next: Vec<Option<usize>>,
}

impl<'t, 'i> MarkerScanner<'t, 'i> {
    pub(crate) fn new(table: &'t MarkerTable, input: &'i str) -> Self {
        let next = table
            .markers
            .iter()
            .map(|marker| input.find(marker.token))
            .collect();
        Self { table, input, next }
    }

    /// The earliest marker starting at byte `from` or later, as an absolute
    /// byte offset. Same tie-breaking as [`MarkerTable::find_earliest`].
    ///
    /// `from` must not decrease between calls.
    pub(crate) fn earliest_from(
        &mut self,
        from: usize,
    ) -> Option<(usize, &'t Marker)> {
        let table = self.table;
        let input = self.input;
        let mut best = None;
        for (marker, next) in table.markers.iter().zip(self.next.iter_mut())
        {
            if next.is_some_and(|pos| pos < from) {
                *next = input[from..].find(marker.token).map(|pos| from + pos);
            }
            if let Some(pos) = *next {
                best = prefer(best, pos, marker);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn default_table_keeps_priority_order() {
        let tokens: Vec<&str> =
            MarkerTable::default().iter().map(|m| m.token).collect();
        assert_eq!(tokens, vec!["**", "*", "__", "_", "~", "`"]);
    }

    #[test]
    fn both_star_markers_are_bold() {
        let table = MarkerTable::default();
        assert_eq!(table.style_for("**"), Some(StyleTag::Bold));
        assert_eq!(table.style_for("*"), Some(StyleTag::Bold));
        assert_eq!(table.style_for("__"), Some(StyleTag::Underline));
        assert_eq!(table.style_for("_"), Some(StyleTag::Italic));
        assert_eq!(table.style_for("#"), None);
    }

    #[test]
    fn earliest_marker_wins() {
        let table = MarkerTable::default();
        let (pos, marker) = table.find_earliest("ab ~c* _d").unwrap();
        assert_eq!(pos, 3);
        assert_eq!(marker.token, "~");
    }

    #[test]
    fn longer_marker_wins_a_tie() {
        let table = MarkerTable::default();
        let (pos, marker) = table.find_earliest("x**y").unwrap();
        assert_eq!(pos, 1);
        assert_eq!(marker.token, "**");

        let (_, marker) = table.find_earliest("__y").unwrap();
        assert_eq!(marker.token, "__");
    }

    #[test]
    fn longer_marker_wins_a_tie_whatever_the_order() {
        let table = MarkerTable::new([
            Marker::new("*", StyleTag::Italic),
            Marker::new("**", StyleTag::Bold),
        ]);
        let (_, marker) = table.find_earliest("**y**").unwrap();
        assert_eq!(marker.style, StyleTag::Bold);
    }

    #[test]
    fn no_marker_found_in_plain_text() {
        assert!(MarkerTable::default().find_earliest("plain text").is_none());
    }

    #[test]
    fn scanner_agrees_with_a_fresh_search() {
        let table = MarkerTable::default();
        let input = "a **b** _c_ *d ~e~ `f` __g__ h";
        let mut scanner = MarkerScanner::new(&table, input);
        for from in 0..=input.len() {
            let expected = table
                .find_earliest(&input[from..])
                .map(|(pos, marker)| (from + pos, marker.token));
            let got = scanner
                .earliest_from(from)
                .map(|(pos, marker)| (pos, marker.token));
            assert_eq!(got, expected, "from byte {from}");
        }
    }

    #[test]
    fn scanner_skips_markers_that_never_occur() {
        let table = MarkerTable::default();
        let mut scanner = MarkerScanner::new(&table, "x ~y~");
        assert_eq!(scanner.earliest_from(0).map(|(p, _)| p), Some(2));
        assert_eq!(scanner.earliest_from(3).map(|(p, _)| p), Some(4));
        assert!(scanner.earliest_from(5).is_none());
        assert_eq!(scanner.next.iter().filter(|n| n.is_some()).count(), 0);
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let table = MarkerTable::new([
            Marker::new("", StyleTag::Bold),
            Marker::new("+", StyleTag::Mono),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.style_for("+"), Some(StyleTag::Mono));
    }

    #[test]
    fn style_names_are_snake_case() {
        let names: Vec<String> =
            StyleTag::iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["bold", "italic", "underline", "strike_through", "mono"]
        );
        assert_eq!(StyleTag::Mono.as_ref(), "mono");
    }
}
