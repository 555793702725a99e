//! Span selection and segmentation for issue highlighting
//!
//! Locates each issue's literal text in the document and partitions the
//! document into plain and highlighted segments.
//!
//! # Design Decisions
//!
//! - **Literal match only**: `original` is matched byte-for-byte, never as a pattern
//! - **Caller order is priority**: earlier issues claim text first
//! - **One span per issue**: only the first occurrence that fits is highlighted
//! - **UTF-8 byte offsets**: matches of a valid UTF-8 needle always fall on char boundaries

use tracing::debug;

use crate::domain::{Issue, TextSegment};

/// An accepted highlight region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub issue: &'a Issue,
}

impl<'a> OccurrenceSpan<'a> {
    /// Strict overlap: spans that only share a boundary do not overlap
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && end > self.start
    }
}

/// Find all literal occurrences of `needle` in `text`, left to right
///
/// Occurrences do not overlap each other: scanning resumes after the end of
/// each match. An empty needle never matches.
///
/// # Returns
/// * `Vec<(usize, usize)>` - All (start, end) byte offset pairs
pub fn find_literal_matches(text: &str, needle: &str) -> Vec<(usize, usize)> {
    if needle.is_empty() || needle.len() > text.len() {
        return Vec::new();
    }

    text.match_indices(needle)
        .map(|(start, matched)| (start, start + matched.len()))
        .collect()
}

/// Choose at most one non-overlapping span per issue, sorted by start offset
pub fn select_spans<'a>(text: &str, issues: &'a [Issue]) -> Vec<OccurrenceSpan<'a>> {
    let mut accepted: Vec<OccurrenceSpan<'a>> = Vec::new();

    for issue in issues {
        let candidate = find_literal_matches(text, &issue.original)
            .into_iter()
            .find(|&(start, end)| !accepted.iter().any(|span| span.overlaps(start, end)));

        match candidate {
            Some((start, end)) => accepted.push(OccurrenceSpan { start, end, issue }),
            None => debug!(issue_id = %issue.id, "No free occurrence for issue, skipping"),
        }
    }

    accepted.sort_by_key(|span| span.start);
    accepted
}

/// Partition `text` into plain and highlighted segments
///
/// The concatenation of all segment texts reproduces `text` exactly.
/// Empty text yields no segments.
pub fn resolve<'a>(text: &'a str, issues: &'a [Issue]) -> Vec<TextSegment<'a>> {
    if text.is_empty() {
        return Vec::new();
    }

    let spans = select_spans(text, issues);
    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for span in spans {
        if span.start > cursor {
            segments.push(plain(text, cursor, span.start));
        }
        segments.push(TextSegment {
            text: &text[span.start..span.end],
            start: span.start,
            end: span.end,
            issue: Some(span.issue),
        });
        cursor = span.end;
    }

    if cursor < text.len() {
        segments.push(plain(text, cursor, text.len()));
    }

    segments
}

fn plain(text: &str, start: usize, end: usize) -> TextSegment<'_> {
    TextSegment {
        text: &text[start..end],
        start,
        end,
        issue: None,
    }
}
