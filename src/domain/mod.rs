//! Domain types for classmate.
//!
//! This module contains the core data structures:
//! - Issue: Flagged text from the analysis service, and display segments
//! - MentionCandidate: Users that can be @-mentioned
//! - Subject: The fixed academic subject vocabulary

pub mod candidate;
pub mod issue;
pub mod subject;

// Re-export commonly used types
pub use candidate::{Availability, MentionCandidate, Role};
pub use issue::{compute_issue_id, AnalysisReport, Issue, IssueCategory, RawIssue, TextSegment};
pub use subject::{Subject, SubjectSet, UnknownSubject};
