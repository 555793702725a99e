//! Keyword table for local subject detection.
//!
//! Matching is plain substring search on the lower-cased message, so a
//! trigger must not occur inside an everyday word ("war" in "software",
//! "css" in "access"). Such terms appear only in longer forms.

use crate::domain::{Subject, SubjectSet};

/// Trigger words per subject, in detection order
pub const SUBJECT_KEYWORDS: [(Subject, &[&str]); 8] = [
    (
        Subject::Math,
        &[
            "math", "calculus", "algebra", "geometry", "trigonometry", "equation",
            "derivative", "integral", "statistics", "probability", "matrix",
            "matrices", "polynomial", "fraction", "theorem", "proofs", "arithmetic",
            "logarithm", "quadratic", "linear", "vector", "graph theory",
        ],
    ),
    (
        Subject::Science,
        &[
            "science", "physics", "chemistry", "biology", "molecule", "atom",
            "cell biology", "organism", "natural selection", "experiment", "hypothesis",
            "newton", "velocity", "quantum", "genetics", "ecosystem", "periodic table",
            "reaction", "photosynthesis", "lab report", "astronomy", "thermodynamics",
        ],
    ),
    (
        Subject::Programming,
        &[
            "programming", "code", "coding", "python", "javascript", "typescript",
            "java", "rustc", "c++", "function", "algorithm", "debug", "compile",
            "syntax error", "rest api", "database", "sql", "reactjs", "html",
            "stylesheet", "github", "recursion", "data structure",
        ],
    ),
    (
        Subject::Writing,
        &[
            "essay", "writing", "thesis statement", "paragraph", "grammar",
            "citation", "mla", "apa format", "outline", "draft", "proofread",
            "introduction", "conclusion", "argument", "narrative", "rubric",
            "word count", "plagiarism", "research paper",
        ],
    ),
    (
        Subject::Language,
        &[
            "spanish", "french", "german", "chinese", "mandarin", "japanese",
            "korean", "italian", "portuguese", "arabic", "vocabulary",
            "conjugat", "pronunciation", "translate", "translation", "fluency",
            "verb tense", "language", "duolingo",
        ],
    ),
    (
        Subject::History,
        &[
            "history", "historical", "warfare", "revolution", "empire", "ancient",
            "medieval", "century", "civilization", "dynasty", "colonial",
            "constitution", "renaissance", "world war", "civil rights",
            "cold war", "primary source", "treaty",
        ],
    ),
    (
        Subject::Business,
        &[
            "business", "marketing", "finance", "accounting", "economics",
            "startup", "investment", "revenue", "profit", "management",
            "entrepreneur", "stock", "budget", "supply and demand", "balance sheet",
            "case study", "pitch deck", "microeconomics", "macroeconomics",
        ],
    ),
    (
        Subject::Art,
        &[
            "drawing", "painting", "sketch", "illustration", "sculpture",
            "canvas", "watercolor", "portrait", "art history", "artwork",
            "photography", "graphic design", "color theory", "gallery",
            "animation", "ceramics", "museum",
        ],
    ),
];

/// Detect subjects from message text using the keyword table
///
/// A subject is added at most once; order follows the table, not the text.
pub fn detect_subjects(message: &str) -> SubjectSet {
    let lowered = message.to_lowercase();
    if lowered.trim().is_empty() {
        return SubjectSet::new();
    }

    SUBJECT_KEYWORDS
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|trigger| lowered.contains(trigger)))
        .map(|(subject, _)| *subject)
        .collect()
}
