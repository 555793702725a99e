//! `@mention` autocomplete ranking.
//!
//! - `keywords`: Local subject detection from a fixed keyword table
//! - `scoring`: Per-candidate relevance factors and retunable weights
//! - `cache`: TTL cache for external classifier results
//! - `query`: The partial name typed after `@`
//! - `ranker`: Two-tier detection, scoring, and last-call-wins ranking

pub mod cache;
pub mod keywords;
pub mod query;
pub mod ranker;
pub mod scoring;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use keywords::{detect_subjects, SUBJECT_KEYWORDS};
pub use query::{active_mention_query, filter_by_query};
pub use ranker::{
    MentionRanker, MentionSettings, RankError, RankOptions, RankedCandidate, RankedResult,
};
pub use scoring::{score_candidate, ScoreBreakdown, ScoringWeights};
