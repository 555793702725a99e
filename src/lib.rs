//! classmate - writing-assistant highlighting and @mention ranking
//!
//! Pure, independently testable logic behind two study-group features:
//!
//! - **Highlighting**: map issues from a text-analysis service back onto the
//!   document and split it into plain/highlighted segments, one span per
//!   issue, never overlapping.
//! - **Mention ranking**: order the roster for an `@mention` picker by
//!   relevance to the message, detecting subjects by keyword with an optional
//!   external classifier fallback.
//!
//! # Modules
//!
//! - `adapters`: External classifier interface and subprocess adapter
//! - `domain`: Data structures (Issue, TextSegment, MentionCandidate, Subject)
//! - `highlight`: Span selection, segmentation, and the open-issue working set
//! - `mentions`: Subject detection, scoring, caching, and ranking
//! - `config`: YAML/env configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Highlight an analysis report on a document
//! classmate highlight --text essay.txt --issues report.json
//!
//! # Rank the roster for a message
//! classmate mentions --roster group.json --message "stuck on this integral @"
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod highlight;
pub mod mentions;

// Re-export main types at crate root for convenience
pub use domain::{Issue, IssueCategory, MentionCandidate, Subject, SubjectSet, TextSegment};
pub use highlight::{resolve, IssueSet};
pub use mentions::{MentionRanker, RankError, RankOptions, RankedResult};
