//! Writing issues and the report produced by the text-analysis service.
//!
//! The analysis service returns issues without identifiers; IDs are derived
//! deterministically when the report is ingested so the same report always
//! yields the same issue IDs.
//!
//! Report parsing is lenient: scores may be fractional or out of range, and
//! a malformed issue entry is skipped instead of rejecting the report.

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

/// Issue category shown as the highlight colour in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// Spelling, grammar, punctuation
    #[serde(alias = "Correctness", alias = "CORRECTNESS")]
    Correctness,
    /// Wordiness, ambiguity
    #[serde(alias = "Clarity", alias = "CLARITY")]
    Clarity,
    /// Vocabulary and variety
    #[serde(alias = "Engagement", alias = "ENGAGEMENT")]
    Engagement,
    /// Tone and formality
    #[serde(alias = "Delivery", alias = "DELIVERY")]
    Delivery,
}

impl IssueCategory {
    pub const ALL: [IssueCategory; 4] = [
        IssueCategory::Correctness,
        IssueCategory::Clarity,
        IssueCategory::Engagement,
        IssueCategory::Delivery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Correctness => "correctness",
            IssueCategory::Clarity => "clarity",
            IssueCategory::Engagement => "engagement",
            IssueCategory::Delivery => "delivery",
        }
    }
}

/// A flagged piece of text with suggested replacements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Deterministic issue ID
    pub id: String,
    /// Literal text to locate in the document
    pub original: String,
    /// Suggested replacements, best first
    #[serde(default)]
    pub replacements: Vec<String>,
    pub category: IssueCategory,
    pub explanation: String,
    /// Reference URLs backing the suggestion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl Issue {
    pub fn new(
        id: impl Into<String>,
        original: impl Into<String>,
        category: IssueCategory,
    ) -> Self {
        Self {
            id: id.into(),
            original: original.into(),
            replacements: Vec::new(),
            category,
            explanation: String::new(),
            sources: None,
        }
    }

    pub fn with_replacements<I, S>(mut self, replacements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replacements = replacements.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// An issue as returned by the analysis service (no ID yet)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIssue {
    pub original: String,
    #[serde(default)]
    pub replacements: Vec<String>,
    pub category: IssueCategory,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
}

/// Full analysis response for a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Overall quality score (0-100)
    #[serde(default, deserialize_with = "deserialize_score")]
    pub score: u32,
    /// Readability score (0-100)
    #[serde(default, deserialize_with = "deserialize_score")]
    pub readability: u32,
    #[serde(default, deserialize_with = "deserialize_issues")]
    pub issues: Vec<RawIssue>,
}

impl AnalysisReport {
    /// Parse a report from the service's JSON body
    ///
    /// Scores are rounded and clamped to 0-100. A body that is not a report
    /// object, or whose scores are not numbers, is an error.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Assign IDs and convert to issues, preserving service order (priority)
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
            .into_iter()
            .enumerate()
            .map(|(index, raw)| Issue {
                id: compute_issue_id(index, raw.category, &raw.original),
                original: raw.original,
                replacements: raw.replacements,
                category: raw.category,
                explanation: raw.explanation,
                sources: raw.sources.filter(|s| !s.is_empty()),
            })
            .collect()
    }
}

/// Accept any JSON number (or null) and clamp it to 0-100
fn deserialize_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if value.is_nan() {
        return Ok(0);
    }
    Ok(value.round().clamp(0.0, 100.0) as u32)
}

/// Keep every well-formed issue, skipping entries that do not parse
fn deserialize_issues<'de, D>(deserializer: D) -> Result<Vec<RawIssue>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut issues = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<RawIssue>(entry) {
            Ok(issue) => issues.push(issue),
            Err(e) => warn!(index, error = %e, "Skipping malformed issue in report"),
        }
    }
    Ok(issues)
}

/// Compute a deterministic issue ID: sha256(index + category + original)[0:16]
pub fn compute_issue_id(index: usize, category: IssueCategory, original: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string().as_bytes());
    hasher.update(category.as_str().as_bytes());
    hasher.update(original.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

/// A contiguous slice of the document, plain or bound to one issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextSegment<'a> {
    pub text: &'a str,
    /// Byte offset of the slice start
    pub start: usize,
    /// Byte offset one past the slice end
    pub end: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<&'a Issue>,
}

impl<'a> TextSegment<'a> {
    pub fn is_highlighted(&self) -> bool {
        self.issue.is_some()
    }
}
