//! Mention candidates supplied by the host chat per render.

use serde::{Deserialize, Serialize};

use super::subject::SubjectSet;

/// Role of a member inside a study group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Member,
}

/// Self-reported availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Studying,
    Busy,
    Offline,
}

/// A user eligible to be @-mentioned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentionCandidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Tags outside the subject vocabulary are dropped on load
    #[serde(default)]
    pub expertise: SubjectSet,
    #[serde(default)]
    pub recent_mention_count: u32,
    #[serde(default)]
    pub study_streak_days: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
}

fn default_level() -> u32 {
    1
}

impl MentionCandidate {
    /// Create a candidate with neutral attributes
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_online: false,
            role: None,
            expertise: SubjectSet::new(),
            recent_mention_count: 0,
            study_streak_days: 0,
            level: default_level(),
            availability: None,
        }
    }

    /// First whitespace-separated word of the display name, lower-cased
    pub fn first_name(&self) -> Option<String> {
        self.name
            .split_whitespace()
            .next()
            .map(|word| word.to_lowercase())
    }
}
