//! Open issues for a document being edited.
//!
//! Issues leave the working set when the writer accepts a fix or dismisses
//! them. Accepting a fix edits the document text in place.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Issue, IssueCategory, TextSegment};

use super::spans::{resolve, select_spans};

/// Errors from working-set operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueError {
    #[error("Issue not found: {0}")]
    NotFound(String),

    #[error("Issue {id} has no replacement at index {index} ({available} available)")]
    NoSuchReplacement {
        id: String,
        index: usize,
        available: usize,
    },
}

/// Outcome of accepting a fix
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// The replacement was written into the text
    Applied { start: usize, replacement: String },
    /// The original text was gone; the issue was dropped without editing
    Stale,
}

/// Document text plus its open issues, in priority order
#[derive(Debug, Clone, Default)]
pub struct IssueSet {
    text: String,
    issues: Vec<Issue>,
}

impl IssueSet {
    pub fn new(text: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            text: text.into(),
            issues,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    /// Current display segments
    pub fn segments(&self) -> Vec<TextSegment<'_>> {
        resolve(&self.text, &self.issues)
    }

    /// Open issues per category, every category present
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts: BTreeMap<&'static str, usize> = IssueCategory::ALL
            .iter()
            .map(|category| (category.as_str(), 0))
            .collect();
        for issue in &self.issues {
            *counts.entry(issue.category.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Write the chosen replacement over the issue's highlighted occurrence
    /// and remove the issue from the set
    ///
    /// The edited occurrence is the one `segments()` shows for the issue,
    /// which is not always the first literal match. An issue with no
    /// highlighted occurrence is dropped as stale.
    pub fn accept(&mut self, id: &str, replacement_index: usize) -> Result<FixOutcome, IssueError> {
        let position = self.position(id)?;
        let issue = &self.issues[position];

        let replacement = issue
            .replacements
            .get(replacement_index)
            .cloned()
            .ok_or_else(|| IssueError::NoSuchReplacement {
                id: id.to_string(),
                index: replacement_index,
                available: issue.replacements.len(),
            })?;

        let highlighted = select_spans(&self.text, &self.issues)
            .into_iter()
            .find(|span| span.issue.id == id)
            .map(|span| (span.start, span.end));
        self.issues.remove(position);

        match highlighted {
            Some((start, end)) => {
                self.text.replace_range(start..end, &replacement);
                info!(issue_id = %id, start, "Applied fix");
                Ok(FixOutcome::Applied { start, replacement })
            }
            None => {
                debug!(issue_id = %id, "Issue has no highlighted occurrence, dropping");
                Ok(FixOutcome::Stale)
            }
        }
    }

    /// Remove an issue without touching the text
    pub fn dismiss(&mut self, id: &str) -> Result<Issue, IssueError> {
        let position = self.position(id)?;
        debug!(issue_id = %id, "Dismissed issue");
        Ok(self.issues.remove(position))
    }

    /// Replace the document text (e.g. after user edits); issues are kept
    /// and re-matched on the next `segments()` call
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    fn position(&self, id: &str) -> Result<usize, IssueError> {
        self.issues
            .iter()
            .position(|issue| issue.id == id)
            .ok_or_else(|| IssueError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IssueSet {
        IssueSet::new(
            "Teh results was good. Teh end.",
            vec![
                Issue::new("spell", "Teh", IssueCategory::Correctness).with_replacements(["The"]),
                Issue::new("agree", "results was", IssueCategory::Correctness)
                    .with_replacements(["results were", "result was"]),
                Issue::new("bland", "good", IssueCategory::Engagement),
            ],
        )
    }

    #[test]
    fn test_accept_replaces_first_occurrence() {
        let mut set = sample();
        let outcome = set.accept("spell", 0).unwrap();
        assert_eq!(
            outcome,
            FixOutcome::Applied {
                start: 0,
                replacement: "The".to_string()
            }
        );
        assert_eq!(set.text(), "The results was good. Teh end.");
        assert!(set.get("spell").is_none());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_accept_edits_highlighted_occurrence() {
        // "their going" claims the first "their", so the fix lands on the second
        let mut set = IssueSet::new(
            "their going their",
            vec![
                Issue::new("phrase", "their going", IssueCategory::Clarity),
                Issue::new("spell", "their", IssueCategory::Correctness).with_replacements(["there"]),
            ],
        );
        let shown = set
            .segments()
            .iter()
            .find(|s| s.issue.map(|i| i.id.as_str()) == Some("spell"))
            .map(|s| s.start);
        assert_eq!(shown, Some(12));

        let outcome = set.accept("spell", 0).unwrap();
        assert_eq!(
            outcome,
            FixOutcome::Applied {
                start: 12,
                replacement: "there".to_string()
            }
        );
        assert_eq!(set.text(), "their going there");
        assert_eq!(set.segments()[0].text, "their going");
    }

    #[test]
    fn test_accept_fully_covered_issue_is_stale() {
        let mut set = IssueSet::new(
            "a very very long sentence",
            vec![
                Issue::new("long", "a very very long", IssueCategory::Clarity),
                Issue::new("inner", "very long", IssueCategory::Clarity).with_replacements(["long"]),
            ],
        );
        assert_eq!(set.accept("inner", 0).unwrap(), FixOutcome::Stale);
        assert_eq!(set.text(), "a very very long sentence");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_accept_second_replacement() {
        let mut set = sample();
        set.accept("agree", 1).unwrap();
        assert_eq!(set.text(), "Teh result was good. Teh end.");
    }

    #[test]
    fn test_accept_errors() {
        let mut set = sample();
        assert_eq!(
            set.accept("missing", 0),
            Err(IssueError::NotFound("missing".to_string()))
        );
        assert!(matches!(
            set.accept("bland", 0),
            Err(IssueError::NoSuchReplacement { available: 0, .. })
        ));
        // Failed accepts leave the set untouched
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_accept_stale_issue() {
        let mut set = sample();
        set.set_text("Rewritten entirely.");
        assert_eq!(set.accept("spell", 0).unwrap(), FixOutcome::Stale);
        assert_eq!(set.text(), "Rewritten entirely.");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_dismiss_and_counts() {
        let mut set = sample();
        let counts = set.counts();
        assert_eq!(counts["correctness"], 2);
        assert_eq!(counts["engagement"], 1);
        assert_eq!(counts["delivery"], 0);

        let dismissed = set.dismiss("bland").unwrap();
        assert_eq!(dismissed.id, "bland");
        assert_eq!(set.counts()["engagement"], 0);
    }

    #[test]
    fn test_segments_follow_edits() {
        let mut set = sample();
        set.accept("spell", 0).unwrap();
        let segments = set.segments();
        let text: String = segments.iter().map(|s| s.text).collect();
        assert_eq!(text, set.text());
        assert_eq!(segments.iter().filter(|s| s.is_highlighted()).count(), 2);
    }
}
