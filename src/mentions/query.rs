//! Extracting the partial `@name` being typed at the cursor.

use crate::domain::MentionCandidate;

/// Return the text typed after the `@` that encloses `cursor`, if any
///
/// The `@` must start the text or follow whitespace, and nothing between it
/// and the cursor may be whitespace. Just typing `@` yields `Some("")`.
/// A cursor past the end or inside a multi-byte char yields `None`.
pub fn active_mention_query(text: &str, cursor: usize) -> Option<&str> {
    if cursor > text.len() || !text.is_char_boundary(cursor) {
        return None;
    }

    let before = &text[..cursor];
    let at = before.rfind('@')?;
    let query = &before[at + 1..];

    if query.chars().any(char::is_whitespace) {
        return None;
    }

    let starts_token = before[..at]
        .chars()
        .next_back()
        .map(char::is_whitespace)
        .unwrap_or(true);

    starts_token.then_some(query)
}

/// Keep candidates whose name contains `query`, case-insensitively
pub fn filter_by_query<'a>(
    candidates: &'a [MentionCandidate],
    query: Option<&str>,
) -> Vec<&'a MentionCandidate> {
    let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    if needle.is_empty() {
        return candidates.iter().collect();
    }

    candidates
        .iter()
        .filter(|candidate| candidate.name.to_lowercase().contains(&needle))
        .collect()
}
