//! Academic subjects used to match messages to knowledgeable users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// One of the fixed subject tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Science,
    Programming,
    Writing,
    Language,
    History,
    Business,
    Art,
}

impl Subject {
    /// The full vocabulary, in keyword-table order
    pub const ALL: [Subject; 8] = [
        Subject::Math,
        Subject::Science,
        Subject::Programming,
        Subject::Writing,
        Subject::Language,
        Subject::History,
        Subject::Business,
        Subject::Art,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Science => "science",
            Subject::Programming => "programming",
            Subject::Writing => "writing",
            Subject::Language => "language",
            Subject::History => "history",
            Subject::Business => "business",
            Subject::Art => "art",
        }
    }

    /// Vocabulary as plain strings (sent to external classifiers)
    pub fn vocabulary() -> Vec<&'static str> {
        Self::ALL.iter().map(Subject::as_str).collect()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a tag is outside the subject vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown subject tag: {0}")]
pub struct UnknownSubject(pub String);

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Subject::ALL
            .iter()
            .copied()
            .find(|subject| subject.as_str() == tag)
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

/// Ordered, duplicate-free set of subjects
///
/// Deserializes leniently: tags outside the vocabulary are dropped rather
/// than failing the surrounding document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubjectSet(Vec<Subject>);

impl SubjectSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a subject, keeping encounter order. Returns false for duplicates.
    pub fn insert(&mut self, subject: Subject) -> bool {
        if self.0.contains(&subject) {
            return false;
        }
        self.0.push(subject);
        true
    }

    /// Build a set from untrusted tags: unknown tags and duplicates are
    /// dropped, and at most `cap` subjects are kept.
    pub fn from_tags<I, S>(tags: I, cap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for tag in tags {
            if set.len() >= cap {
                break;
            }
            if let Ok(subject) = tag.as_ref().parse::<Subject>() {
                set.insert(subject);
            }
        }
        set
    }

    pub fn contains(&self, subject: Subject) -> bool {
        self.0.contains(&subject)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Subject] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for SubjectSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tags = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::from_tags(tags, usize::MAX))
    }
}

impl FromIterator<Subject> for SubjectSet {
    fn from_iter<T: IntoIterator<Item = Subject>>(iter: T) -> Self {
        let mut set = Self::new();
        for subject in iter {
            set.insert(subject);
        }
        set
    }
}
