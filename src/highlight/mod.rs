//! Issue highlighting for the writing-assistant editor.
//!
//! Maps issues reported by the analysis service back onto the document text
//! and partitions it into display segments.
//!
//! # Example
//!
//! ```
//! use classmate::domain::{Issue, IssueCategory};
//! use classmate::highlight::resolve;
//!
//! let issues = vec![Issue::new("i1", "cat", IssueCategory::Clarity)];
//! let segments = resolve("The cat sat on the cat mat.", &issues);
//!
//! assert_eq!(segments.iter().filter(|s| s.issue.is_some()).count(), 1);
//! assert_eq!(segments.iter().map(|s| s.text).collect::<String>(), "The cat sat on the cat mat.");
//! ```

pub mod spans;
pub mod working_set;

pub use spans::{find_literal_matches, resolve, select_spans, OccurrenceSpan};
pub use working_set::{FixOutcome, IssueError, IssueSet};
