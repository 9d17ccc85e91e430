//! Rule-based event classifier
//!
//! Scores every rule of the table against the text and keeps the best
//! candidate. A candidate replaces the current best when its confidence is
//! strictly greater, or equal with a strictly greater priority. The initial
//! best is the fallback (`GENERIC_NEWS`, 0.2, priority -1). A rule must
//! score strictly above the 0.2 floor to win; ties at the floor keep the
//! fallback whatever the rule's priority.

use crate::classifier::{ClassificationResult, Classifier, FALLBACK_CONFIDENCE};
use crate::rules::{default_rules, EventRule};
use filingwatch_core::EventType;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;
use tracing::warn;

const FALLBACK_PRIORITY: i32 = -1;

/// A rule together with its successfully compiled patterns
struct CompiledRule {
    rule: EventRule,
    regexes: Vec<Regex>,
}

impl CompiledRule {
    fn compile(rule: EventRule) -> Self {
        let regexes = rule
            .patterns
            .iter()
            .filter_map(|pattern| {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!(
                            event_type = %rule.event_type,
                            pattern = %pattern,
                            error = %e,
                            "Skipping rule pattern that failed to compile"
                        );
                        None
                    }
                }
            })
            .collect();

        Self { rule, regexes }
    }

    /// Number of distinct patterns matching at least once
    fn hits(&self, text: &str) -> usize {
        self.regexes.iter().filter(|re| re.is_match(text)).count()
    }
}

/// Deterministic classifier over an ordered rule table
pub struct RuleClassifier {
    name: String,
    rules: Vec<CompiledRule>,
}

impl RuleClassifier {
    /// Create a classifier over the production rule table
    pub fn new() -> Self {
        Self::with_rules("filing-events", default_rules())
    }

    /// Create a classifier over a custom rule table
    ///
    /// Patterns that fail to compile are logged and skipped.
    pub fn with_rules(name: impl Into<String>, rules: Vec<EventRule>) -> Self {
        Self {
            name: name.into(),
            rules: rules.into_iter().map(CompiledRule::compile).collect(),
        }
    }

    /// The rule definitions, in table order
    pub fn rules(&self) -> impl Iterator<Item = &EventRule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Score the text against every rule and pick the winner
    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        if text.trim().is_empty() {
            return ClassificationResult::fallback();
        }

        let mut best_type = EventType::GenericNews;
        let mut best_confidence = FALLBACK_CONFIDENCE;
        let mut best_priority = FALLBACK_PRIORITY;

        for compiled in &self.rules {
            let Some(confidence) = compiled.rule.confidence_for(compiled.hits(text)) else {
                continue;
            };
            if confidence <= FALLBACK_CONFIDENCE {
                continue;
            }

            let priority = compiled.rule.priority;
            if confidence > best_confidence
                || (confidence == best_confidence && priority > best_priority)
            {
                best_type = compiled.rule.event_type;
                best_confidence = confidence;
                best_priority = priority;
            }
        }

        ClassificationResult::new(best_type, best_confidence)
    }

    /// Literal phrases of every rule voting for `event_type`, in table order
    pub fn phrases(&self, event_type: EventType) -> Vec<String> {
        self.rules
            .iter()
            .filter(|c| c.rule.event_type == event_type)
            .flat_map(|c| c.rule.phrases())
            .collect()
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for RuleClassifier {
    fn classify(&self, text: &str) -> ClassificationResult {
        self.classify_text(text)
    }

    fn phrases_for(&self, event_type: EventType) -> Vec<String> {
        self.phrases(event_type)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Shared classifier over the production table, compiled on first use
fn shared() -> &'static RuleClassifier {
    static CLASSIFIER: OnceLock<RuleClassifier> = OnceLock::new();
    CLASSIFIER.get_or_init(RuleClassifier::new)
}

/// Classify text with the production rule table
pub fn classify(text: &str) -> ClassificationResult {
    shared().classify_text(text)
}

/// Evidence phrases for `event_type` from the production rule table
pub fn phrases_for(event_type: EventType) -> Vec<String> {
    shared().phrases(event_type)
}

/// Short human label for a raw event-type tag
pub fn display_name(tag: &str) -> &'static str {
    EventType::display_name_for_tag(tag)
}
