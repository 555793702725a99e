//! Adapter interfaces for external systems.
//!
//! The mention ranker falls back to an external subject classifier when
//! keyword matching finds nothing. Adapters implement [`SubjectClassifier`];
//! the ranker validates whatever they return against the subject vocabulary.

pub mod command;

use async_trait::async_trait;
use thiserror::Error;

// Re-export the subprocess adapter
pub use command::CommandClassifier;

/// Failures of an external classifier call
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Classifier failed: {0}")]
    Failed(String),

    #[error("Malformed classifier response: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Maps free text to subject tags drawn from `vocabulary`
#[async_trait]
pub trait SubjectClassifier: Send + Sync {
    /// Human-readable adapter name
    fn name(&self) -> &str;

    /// Classify a message. Implementations should return at most
    /// `max_subjects` tags; callers filter and cap regardless.
    async fn classify(
        &self,
        text: &str,
        vocabulary: &[&str],
        max_subjects: usize,
    ) -> Result<Vec<String>, ClassifierError>;
}
