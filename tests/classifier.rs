//! Keyword classifier tests.

use frameguard::{KeywordClassifier, TextClassifier};

#[test]
fn no_match_returns_empty_map() {
    let classifier = KeywordClassifier::new();
    let scores = classifier.classify("a perfectly ordinary sentence").unwrap();
    assert!(scores.is_empty());
}

#[test]
fn single_match_scores_base_confidence() {
    let classifier = KeywordClassifier::new();
    let scores = classifier.classify("I love this video").unwrap();

    assert_eq!(scores.len(), 1);
    let score = scores["positive"];
    assert!((score - 0.7).abs() < 1e-6);
}

#[test]
fn additional_matches_raise_confidence() {
    let classifier = KeywordClassifier::new();
    let one = classifier.classify("this is great").unwrap()["positive"];
    let two = classifier.classify("this is great and awesome").unwrap()["positive"];

    assert!(two > one);
    assert!(two <= 0.95);
}

#[test]
fn matching_is_case_insensitive() {
    let classifier = KeywordClassifier::new();
    let scores = classifier.classify("THIS IS AWESOME").unwrap();
    assert!(scores.contains_key("positive"));
}

#[test]
fn matches_whole_words_only() {
    let classifier = KeywordClassifier::new();
    // "lovely" contains "love" but is not the word "love".
    let scores = classifier.classify("what a lovely day").unwrap();
    assert!(!scores.contains_key("positive"));
}

#[test]
fn multiple_categories_can_match_one_text() {
    let classifier = KeywordClassifier::new();
    let scores = classifier.classify("I hate this but the ending was great").unwrap();

    assert!(scores.contains_key("hate_speech"));
    assert!(scores.contains_key("positive"));
}

#[test]
fn with_rule_replaces_existing_category() {
    let classifier = KeywordClassifier::new()
        .with_rule("positive", vec!["splendid".to_string()]);

    let scores = classifier.classify("this is great").unwrap();
    assert!(!scores.contains_key("positive"));

    let scores = classifier.classify("this is splendid").unwrap();
    assert!(scores.contains_key("positive"));
}

#[test]
fn scores_stay_in_unit_interval() {
    let classifier = KeywordClassifier::new();
    let scores = classifier
        .classify("love wholesome great awesome amazing")
        .unwrap();

    for (label, score) in &scores {
        assert!(
            (0.0..=1.0).contains(score),
            "{label} score {score} out of range",
        );
    }
}
