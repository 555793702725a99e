//! Highlight Integration Tests
//!
//! Round-trip, overlap and uniqueness guarantees of segment resolution,
//! checked across a spread of documents and issue sets.

use std::collections::HashSet;

use classmate::domain::{AnalysisReport, Issue, IssueCategory, TextSegment};
use classmate::highlight::{resolve, IssueSet};

fn issue(id: &str, original: &str, category: IssueCategory) -> Issue {
    Issue::new(id, original, category)
}

fn corpus() -> Vec<(&'static str, Vec<Issue>)> {
    vec![
        (
            "The cat sat on the cat mat.",
            vec![issue("a", "cat", IssueCategory::Clarity)],
        ),
        (
            "Their going to there house over their.",
            vec![
                issue("a", "Their going", IssueCategory::Correctness),
                issue("b", "there house", IssueCategory::Correctness),
                issue("c", "their", IssueCategory::Correctness),
                issue("d", "going to there", IssueCategory::Clarity),
            ],
        ),
        (
            "very very very good",
            vec![
                issue("a", "very very", IssueCategory::Engagement),
                issue("b", "very", IssueCategory::Engagement),
                issue("c", "very good", IssueCategory::Delivery),
            ],
        ),
        (
            "Ünïcödé text with émojis 🎉 and more émojis 🎉",
            vec![
                issue("a", "émojis 🎉", IssueCategory::Engagement),
                issue("b", "🎉", IssueCategory::Delivery),
                issue("c", "", IssueCategory::Clarity),
                issue("d", "absent", IssueCategory::Clarity),
            ],
        ),
        ("Hello world", vec![]),
        (
            "aaaa",
            vec![
                issue("a", "aa", IssueCategory::Correctness),
                issue("b", "aa", IssueCategory::Clarity),
                issue("c", "a", IssueCategory::Delivery),
            ],
        ),
    ]
}

fn highlighted<'a>(segments: &'a [TextSegment<'a>]) -> Vec<&'a TextSegment<'a>> {
    segments.iter().filter(|s| s.is_highlighted()).collect()
}

#[test]
fn test_segments_reconstruct_text() {
    for (text, issues) in corpus() {
        let segments = resolve(text, &issues);
        let joined: String = segments.iter().map(|s| s.text).collect();
        assert_eq!(joined, text);

        // Contiguous and gap-free
        let mut cursor = 0;
        for segment in &segments {
            assert_eq!(segment.start, cursor, "gap in segments for {:?}", text);
            assert_eq!(&text[segment.start..segment.end], segment.text);
            cursor = segment.end;
        }
        assert_eq!(cursor, text.len());
    }
}

#[test]
fn test_highlights_never_overlap() {
    for (text, issues) in corpus() {
        let segments = resolve(text, &issues);
        let spans = highlighted(&segments);
        for (i, a) in spans.iter().enumerate() {
            for b in spans.iter().skip(i + 1) {
                assert!(
                    !(a.start < b.end && a.end > b.start),
                    "overlap in {:?}: {:?} / {:?}",
                    text,
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn test_at_most_one_segment_per_issue() {
    for (text, issues) in corpus() {
        let segments = resolve(text, &issues);
        let mut seen = HashSet::new();
        for segment in highlighted(&segments) {
            let id = &segment.issue.unwrap().id;
            assert!(seen.insert(id.clone()), "issue {} highlighted twice", id);
        }
    }
}

#[test]
fn test_resolution_is_idempotent() {
    for (text, issues) in corpus() {
        assert_eq!(resolve(text, &issues), resolve(text, &issues));
    }
}

#[test]
fn test_priority_follows_caller_order() {
    let text = "very very very good";
    let issues = corpus().remove(2).1;
    let segments = resolve(text, &issues);
    let ids: Vec<&str> = highlighted(&segments)
        .iter()
        .map(|s| s.issue.unwrap().id.as_str())
        .collect();
    // "very very" takes 0..9, "very" falls to 10..14, "very good" has no free occurrence
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(highlighted(&segments)[1].start, 10);
}

#[test]
fn test_empty_and_missing_originals_skipped() {
    let (text, issues) = corpus().remove(3);
    let segments = resolve(text, &issues);
    let ids: HashSet<&str> = highlighted(&segments)
        .iter()
        .map(|s| s.issue.unwrap().id.as_str())
        .collect();
    assert!(ids.contains("a"));
    assert!(ids.contains("b"));
    assert!(!ids.contains("c"));
    assert!(!ids.contains("d"));
}

#[test]
fn test_report_to_working_set_flow() {
    let report = AnalysisReport::from_json(
        r#"{
            "score": 72,
            "readability": 80,
            "issues": [
                {"original": "alot", "replacements": ["a lot"], "category": "correctness",
                 "explanation": "Spelling"},
                {"original": "really really", "replacements": ["truly"], "category": "engagement",
                 "explanation": "Repetition", "sources": ["https://example.edu/style"]}
            ]
        }"#,
    )
    .unwrap();

    let mut set = IssueSet::new("I like it alot, really really alot.", report.into_issues());
    assert_eq!(set.segments().iter().filter(|s| s.is_highlighted()).count(), 2);

    let spelling_id = set.issues()[0].id.clone();
    set.accept(&spelling_id, 0).unwrap();
    assert_eq!(set.text(), "I like it a lot, really really alot.");

    // The remaining "alot" is no longer flagged
    let segments = set.segments();
    let flagged: Vec<&str> = segments
        .iter()
        .filter(|s| s.is_highlighted())
        .map(|s| s.text)
        .collect();
    assert_eq!(flagged, vec!["really really"]);
}

#[test]
fn test_accept_fixes_the_highlighted_occurrence() {
    // Service output with capitalized categories, a fractional score and one
    // entry the service garbled; the usable issues still drive the editor
    let report = AnalysisReport::from_json(
        r#"{
            "score": 91.6,
            "readability": 77,
            "issues": [
                {"original": "their going", "replacements": ["they're going"],
                 "category": "Correctness", "explanation": "Wrong word"},
                {"original": "their", "replacements": ["there"], "category": "Correctness",
                 "explanation": "Wrong word"},
                {"original": 42, "category": "Clarity"}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(report.score, 92);

    let mut set = IssueSet::new("their going to sit over their", report.into_issues());
    assert_eq!(set.len(), 2);
    assert_eq!(
        render_ids(&set),
        vec![("their going", 0usize), ("their", 24usize)]
    );

    let place_id = set.issues()[1].id.clone();
    set.accept(&place_id, 0).unwrap();
    assert_eq!(set.text(), "their going to sit over there");

    let phrase_id = set.issues()[0].id.clone();
    set.accept(&phrase_id, 0).unwrap();
    assert_eq!(set.text(), "they're going to sit over there");
    assert!(set.is_empty());
}

fn render_ids(set: &IssueSet) -> Vec<(&str, usize)> {
    set.segments()
        .into_iter()
        .filter(|s| s.is_highlighted())
        .map(|s| (s.text, s.start))
        .collect()
}
