//! Property and scenario tests for classification and evidence extraction

use filingwatch_classifiers::{
    classify, extract_snippets, phrases_for, EventRule, FilingAnalyzer, RuleClassifier,
};
use filingwatch_classifiers::Classifier;
use filingwatch_core::EventType;
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "redemption", "date", "notice", "of", "dividend", "suspend", "rights", "offering",
    "subscription", "distribution", "monthly", "policy", "prospectus", "supplement",
    "will", "redeem", "the", "company", "shares", "call", "cease", "paying", "atm",
];

fn filing_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..40).prop_map(|w| w.join(" "))
}

proptest! {
    #[test]
    fn confidence_stays_in_unit_interval(text in filing_text()) {
        let result = classify(&text);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert!(result.confidence >= 0.2);
        prop_assert_ne!(result.event_type, EventType::NotRelevant);
    }

    #[test]
    fn confidence_never_exceeds_winning_cap(text in filing_text()) {
        let classifier = RuleClassifier::new();
        let result = classifier.classify(&text);
        if !result.is_fallback() {
            let cap = classifier
                .rules()
                .filter(|r| r.event_type == result.event_type)
                .map(|r| r.cap)
                .fold(0.0_f32, f32::max);
            prop_assert!(result.confidence <= cap);
        }
    }

    #[test]
    fn text_without_rule_vocabulary_is_fallback(text in "[xyz ]{0,80}") {
        let result = classify(&text);
        prop_assert_eq!(result.event_type, EventType::GenericNews);
        prop_assert_eq!(result.confidence, 0.2);
    }

    #[test]
    fn classification_is_deterministic(text in filing_text()) {
        prop_assert_eq!(classify(&text), classify(&text));
    }

    #[test]
    fn snippets_respect_bounds(
        text in filing_text(),
        window in 0usize..60,
        max_snippets in 0usize..5,
        max_len in 0usize..80,
    ) {
        let phrases = phrases_for(EventType::PrefCall);
        let snippets = extract_snippets(&text, &phrases, window, max_snippets, max_len);

        prop_assert!(snippets.len() <= max_snippets);
        for s in &snippets {
            prop_assert!(s.chars().count() <= max_len);
        }
        let mut unique = snippets.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), snippets.len());
    }
}

#[test]
fn scenario_redemption_beats_lower_priority_offering() {
    let text = "Pursuant to the prospectus supplement, the Company will redeem all \
                outstanding shares of its 6.25% Series B Preferred Stock. The \
                redemption date is March 1, 2024.";

    let result = classify(text);
    assert_eq!(result.event_type, EventType::PrefCall);
    assert!(result.confidence >= 0.5);
}

#[test]
fn scenario_empty_text() {
    let analysis = FilingAnalyzer::new().analyze("");
    assert_eq!(analysis.event_type, EventType::GenericNews);
    assert_eq!(analysis.confidence, 0.2);
    assert!(analysis.evidence.is_empty());
}

#[test]
fn equal_confidence_prefers_higher_priority_regardless_of_order() {
    let low = EventRule::new(EventType::Offering, ["offering of"]).with_priority(20);
    let high = EventRule::new(EventType::RightsOffering, ["rights offering"]).with_priority(35);
    let text = "a rights offering of common stock";

    let forward = RuleClassifier::with_rules("forward", vec![low.clone(), high.clone()]);
    let reverse = RuleClassifier::with_rules("reverse", vec![high, low]);

    assert_eq!(forward.classify(text).event_type, EventType::RightsOffering);
    assert_eq!(reverse.classify(text).event_type, EventType::RightsOffering);
}

#[test]
fn distinct_snippet_starts() {
    let text = "The Board approved a managed distribution plan. The distribution rate \
                will change; the monthly distribution will be $0.10.";
    let phrases = phrases_for(EventType::CefDistributionChange);
    let snippets = extract_snippets(text, &phrases, 0, 10, 200);

    assert_eq!(
        snippets,
        vec![
            "managed distribution",
            "distribution rate",
            "distribution will",
            "monthly distribution",
        ]
    );
}
