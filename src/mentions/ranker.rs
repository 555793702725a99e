//! Relevance ranking for the `@mention` picker.
//!
//! Subject detection runs in two tiers: the keyword table always, and the
//! external classifier only when keywords find nothing and the message is
//! long enough. Overlapping calls are last-call-wins: every call takes a
//! sequence number, and a call that is no longer the latest when its
//! classifier returns is discarded with [`RankError::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::adapters::SubjectClassifier;
use crate::domain::{MentionCandidate, Subject, SubjectSet};

use super::cache::TtlCache;
use super::keywords::detect_subjects;
use super::query::filter_by_query;
use super::scoring::{score_candidate, ScoreBreakdown, ScoringWeights};

/// Ranker tuning, loaded from the `mentions` config section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentionSettings {
    /// Result cap when the caller does not give one
    pub max_results: usize,
    /// Whether callers should enable the external tier by default
    pub use_external_classifier: bool,
    /// The external tier needs strictly more characters than this
    pub min_classifier_chars: usize,
    /// Cap on subjects accepted from the external tier
    pub max_external_subjects: usize,
    pub cache_ttl_seconds: u64,
    pub cache_capacity: usize,
    /// Upper bound on a single classifier call
    pub classifier_timeout_ms: u64,
}

impl Default for MentionSettings {
    fn default() -> Self {
        Self {
            max_results: 6,
            use_external_classifier: false,
            min_classifier_chars: 15,
            max_external_subjects: 3,
            cache_ttl_seconds: 300,
            cache_capacity: 256,
            classifier_timeout_ms: 5_000,
        }
    }
}

impl MentionSettings {
    /// Per-call options using these defaults
    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            use_external_classifier: self.use_external_classifier,
            max_results: self.max_results,
            query: None,
        }
    }
}

/// Per-call ranking options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankOptions {
    pub use_external_classifier: bool,
    pub max_results: usize,
    /// Partial name typed after `@`; filters the roster before scoring
    pub query: Option<String>,
}

impl Default for RankOptions {
    fn default() -> Self {
        MentionSettings::default().rank_options()
    }
}

/// A candidate with its computed relevance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub candidate: MentionCandidate,
    pub score: u32,
    pub breakdown: ScoreBreakdown,
}

/// Ranked picker contents for one message
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedResult {
    /// Highest relevance first, ties in roster order
    pub candidates: Vec<RankedCandidate>,
    pub detected_subjects: SubjectSet,
    /// True when the detected subjects came from the external tier
    pub used_external_classifier: bool,
}

impl RankedResult {
    pub fn candidate_ids(&self) -> Vec<&str> {
        self.candidates
            .iter()
            .map(|ranked| ranked.candidate.id.as_str())
            .collect()
    }
}

/// Errors returned by [`MentionRanker::rank`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// A newer call started while this one waited on the classifier
    #[error("Rank call {sequence} superseded by call {latest}")]
    Superseded { sequence: u64, latest: u64 },
}

/// Scores and orders mention candidates for a message
pub struct MentionRanker {
    settings: MentionSettings,
    weights: ScoringWeights,
    classifier: Option<Arc<dyn SubjectClassifier>>,
    cache: TtlCache<SubjectSet>,
    sequence: AtomicU64,
}

impl MentionRanker {
    pub fn new(settings: MentionSettings, weights: ScoringWeights) -> Self {
        let cache = TtlCache::new(
            chrono::Duration::seconds(settings.cache_ttl_seconds as i64),
            settings.cache_capacity,
        );
        Self {
            settings,
            weights,
            classifier: None,
            cache,
            sequence: AtomicU64::new(0),
        }
    }

    /// Attach the external classifier used by the second tier
    pub fn with_classifier(mut self, classifier: Arc<dyn SubjectClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Replace the result cache (e.g. one driven by a manual clock)
    pub fn with_cache(mut self, cache: TtlCache<SubjectSet>) -> Self {
        self.cache = cache;
        self
    }

    pub fn settings(&self) -> &MentionSettings {
        &self.settings
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Sequence number of the most recent call
    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Rank `candidates` for `message`
    ///
    /// Classifier failures never surface here; they degrade to keyword-only
    /// results. The only error is a stale call being superseded.
    ///
    /// The external tier's length check counts characters of the trimmed
    /// message, so leading and trailing whitespace never tips a short
    /// message over `min_classifier_chars`.
    #[instrument(skip_all, fields(candidates = candidates.len(), sequence = tracing::field::Empty))]
    pub async fn rank(
        &self,
        candidates: &[MentionCandidate],
        message: &str,
        options: &RankOptions,
    ) -> Result<RankedResult, RankError> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::Span::current().record("sequence", sequence);

        if candidates.is_empty() {
            return Ok(RankedResult::default());
        }

        let mut detected_subjects = detect_subjects(message);
        let mut used_external_classifier = false;

        if detected_subjects.is_empty()
            && options.use_external_classifier
            && message.trim().chars().count() > self.settings.min_classifier_chars
        {
            let external = self.external_subjects(message).await;

            let latest = self.latest_sequence();
            if latest != sequence {
                debug!(sequence, latest, "Discarding stale rank call");
                return Err(RankError::Superseded { sequence, latest });
            }

            if !external.is_empty() {
                detected_subjects = external;
                used_external_classifier = true;
            }
        }

        let lowered = message.to_lowercase();
        let mut ranked: Vec<RankedCandidate> = filter_by_query(candidates, options.query.as_deref())
            .into_iter()
            .map(|candidate| {
                let breakdown =
                    score_candidate(candidate, &detected_subjects, &lowered, &self.weights);
                RankedCandidate {
                    candidate: candidate.clone(),
                    score: breakdown.total(),
                    breakdown,
                }
            })
            .collect();

        // Stable: equal scores keep roster order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(options.max_results);

        debug!(
            subjects = ?detected_subjects.as_slice(),
            external = used_external_classifier,
            returned = ranked.len(),
            "Ranked mention candidates"
        );

        Ok(RankedResult {
            candidates: ranked,
            detected_subjects,
            used_external_classifier,
        })
    }

    /// Second tier: cached or fresh classifier result, empty on any failure
    async fn external_subjects(&self, message: &str) -> SubjectSet {
        let key = message.trim().to_lowercase();

        if let Some(cached) = self.cache.get(&key) {
            debug!("Classifier cache hit");
            return cached;
        }

        let Some(classifier) = self.classifier.as_ref() else {
            debug!("No external classifier configured");
            return SubjectSet::new();
        };

        let vocabulary = Subject::vocabulary();
        let limit = Duration::from_millis(self.settings.classifier_timeout_ms);
        let call = classifier.classify(message, &vocabulary, self.settings.max_external_subjects);

        let tags = match tokio::time::timeout(limit, call).await {
            Ok(Ok(tags)) => tags,
            Ok(Err(e)) => {
                warn!(classifier = classifier.name(), error = %e, "Subject classifier failed");
                return SubjectSet::new();
            }
            Err(_) => {
                warn!(classifier = classifier.name(), ?limit, "Subject classifier timed out");
                return SubjectSet::new();
            }
        };

        let subjects = SubjectSet::from_tags(&tags, self.settings.max_external_subjects);
        if subjects.len() < tags.len() {
            debug!(raw = ?tags, "Dropped out-of-vocabulary or surplus classifier tags");
        }
        if !subjects.is_empty() {
            self.cache.insert(key, subjects.clone());
        }
        subjects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Availability, Role};

    fn ranker() -> MentionRanker {
        MentionRanker::new(MentionSettings::default(), ScoringWeights::default())
    }

    #[tokio::test]
    async fn test_empty_roster() {
        let result = ranker()
            .rank(&[], "need help with calculus", &RankOptions::default())
            .await
            .unwrap();
        assert!(result.candidates.is_empty());
        assert!(result.detected_subjects.is_empty());
    }

    #[tokio::test]
    async fn test_empty_message_still_scores() {
        let mut owner = MentionCandidate::new("owner", "Olive");
        owner.role = Some(Role::Owner);
        let mut online = MentionCandidate::new("online", "Nina");
        online.is_online = true;
        online.availability = Some(Availability::Available);
        let roster = vec![MentionCandidate::new("plain", "Pat"), owner, online];

        let result = ranker().rank(&roster, "", &RankOptions::default()).await.unwrap();
        assert_eq!(result.candidate_ids(), vec!["online", "owner", "plain"]);
        assert!(!result.used_external_classifier);
    }

    #[tokio::test]
    async fn test_query_filters_before_scoring() {
        let roster = vec![
            MentionCandidate::new("1", "Alice Park"),
            MentionCandidate::new("2", "Bob"),
        ];
        let options = RankOptions {
            query: Some("ali".to_string()),
            ..RankOptions::default()
        };
        let result = ranker().rank(&roster, "hi @ali", &options).await.unwrap();
        assert_eq!(result.candidate_ids(), vec!["1"]);
    }

    #[tokio::test]
    async fn test_truncates_to_max_results() {
        let roster: Vec<MentionCandidate> = (0..10)
            .map(|i| MentionCandidate::new(format!("u{}", i), format!("User{}", i)))
            .collect();
        let result = ranker().rank(&roster, "", &RankOptions::default()).await.unwrap();
        assert_eq!(result.candidates.len(), 6);
        assert_eq!(result.candidate_ids()[0], "u0");
    }

    #[tokio::test]
    async fn test_sequence_increments_per_call() {
        let ranker = ranker();
        let roster = vec![MentionCandidate::new("1", "Sam")];
        ranker.rank(&roster, "a", &RankOptions::default()).await.unwrap();
        ranker.rank(&[], "b", &RankOptions::default()).await.unwrap();
        assert_eq!(ranker.latest_sequence(), 2);
    }
}
