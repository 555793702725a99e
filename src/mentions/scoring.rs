//! Relevance scoring for mention candidates
//!
//! Each factor contributes a fixed number of points; the weights are
//! product-tuning values and can be overridden from config.

use serde::{Deserialize, Serialize};

use crate::domain::{Availability, MentionCandidate, Role, SubjectSet};

// ---------------------------------------------------------------------------
// Scoring Constants
// ---------------------------------------------------------------------------

/// Candidate is online right now.
pub const ONLINE_POINTS: u32 = 20;

/// Candidate marked themselves available.
pub const AVAILABLE_POINTS: u32 = 15;

/// Candidate is studying (reachable, but less so).
pub const STUDYING_POINTS: u32 = 10;

/// Per detected subject found in the candidate's expertise.
pub const EXPERTISE_POINTS: u32 = 50;

pub const OWNER_POINTS: u32 = 5;
pub const ADMIN_POINTS: u32 = 3;

/// Awarded when the study streak is above `STREAK_THRESHOLD_DAYS`.
pub const STREAK_POINTS: u32 = 10;
pub const STREAK_THRESHOLD_DAYS: u32 = 5;

/// Awarded when the level is above `LEVEL_THRESHOLD`.
pub const LEVEL_POINTS: u32 = 5;
pub const LEVEL_THRESHOLD: u32 = 5;

/// Per recent mention, capped at `RECENT_MENTION_CAP`.
pub const RECENT_MENTION_POINTS: u32 = 5;
pub const RECENT_MENTION_CAP: u32 = 25;

/// The candidate's first name already appears in the message.
pub const NAME_MATCH_POINTS: u32 = 30;

/// Retunable scoring table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub online: u32,
    pub available: u32,
    pub studying: u32,
    pub expertise: u32,
    pub owner: u32,
    pub admin: u32,
    pub streak: u32,
    pub streak_threshold_days: u32,
    pub level: u32,
    pub level_threshold: u32,
    pub recent_mention: u32,
    pub recent_mention_cap: u32,
    pub name_match: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            online: ONLINE_POINTS,
            available: AVAILABLE_POINTS,
            studying: STUDYING_POINTS,
            expertise: EXPERTISE_POINTS,
            owner: OWNER_POINTS,
            admin: ADMIN_POINTS,
            streak: STREAK_POINTS,
            streak_threshold_days: STREAK_THRESHOLD_DAYS,
            level: LEVEL_POINTS,
            level_threshold: LEVEL_THRESHOLD,
            recent_mention: RECENT_MENTION_POINTS,
            recent_mention_cap: RECENT_MENTION_CAP,
            name_match: NAME_MATCH_POINTS,
        }
    }
}

/// Per-factor contributions for one candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub online: u32,
    pub availability: u32,
    pub expertise: u32,
    pub role: u32,
    pub streak: u32,
    pub level: u32,
    pub recent_mentions: u32,
    pub name_match: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.online
            + self.availability
            + self.expertise
            + self.role
            + self.streak
            + self.level
            + self.recent_mentions
            + self.name_match
    }
}

/// Score a candidate against the detected subjects and the lower-cased message
pub fn score_candidate(
    candidate: &MentionCandidate,
    subjects: &SubjectSet,
    lowered_message: &str,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let matching_subjects = subjects
        .iter()
        .filter(|subject| candidate.expertise.contains(**subject))
        .count() as u32;

    let name_match = candidate
        .first_name()
        .map(|first| lowered_message.contains(&first))
        .unwrap_or(false);

    ScoreBreakdown {
        online: if candidate.is_online { weights.online } else { 0 },
        availability: match candidate.availability {
            Some(Availability::Available) => weights.available,
            Some(Availability::Studying) => weights.studying,
            _ => 0,
        },
        expertise: matching_subjects * weights.expertise,
        role: match candidate.role {
            Some(Role::Owner) => weights.owner,
            Some(Role::Admin) => weights.admin,
            _ => 0,
        },
        streak: if candidate.study_streak_days > weights.streak_threshold_days {
            weights.streak
        } else {
            0
        },
        level: if candidate.level > weights.level_threshold {
            weights.level
        } else {
            0
        },
        recent_mentions: candidate
            .recent_mention_count
            .saturating_mul(weights.recent_mention)
            .min(weights.recent_mention_cap),
        name_match: if name_match { weights.name_match } else { 0 },
    }
}
