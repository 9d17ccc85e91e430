//! Filing analysis: classification followed by evidence extraction

use crate::classifier::Classifier;
use crate::evidence::EvidenceConfig;
use crate::rule_classifier::RuleClassifier;
use filingwatch_core::EventType;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the alerting layer needs to render one filing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingAnalysis {
    /// Winning event type
    pub event_type: EventType,

    /// Confidence in `event_type` (0.0-1.0)
    pub confidence: f32,

    /// Supporting excerpts, in rule phrase order
    pub evidence: Vec<String>,
}

impl FilingAnalysis {
    /// Human label for the event type
    pub fn display_name(&self) -> &'static str {
        self.event_type.display_name()
    }
}

/// Runs a classifier and packages its evidence
pub struct FilingAnalyzer<C = RuleClassifier> {
    classifier: C,
    evidence: EvidenceConfig,
}

impl FilingAnalyzer<RuleClassifier> {
    /// Analyzer over the production rule table and default evidence bounds
    pub fn new() -> Self {
        Self::with_classifier(RuleClassifier::new(), EvidenceConfig::default())
    }
}

impl Default for FilingAnalyzer<RuleClassifier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Classifier> FilingAnalyzer<C> {
    /// Analyzer over any classifier
    pub fn with_classifier(classifier: C, evidence: EvidenceConfig) -> Self {
        Self {
            classifier,
            evidence,
        }
    }

    /// Classify `text` and extract the snippets backing the result
    pub fn analyze(&self, text: &str) -> FilingAnalysis {
        let result = self.classifier.classify(text);
        let phrases = self.classifier.phrases_for(result.event_type);
        let evidence = self.evidence.extract(text, &phrases);

        metrics::counter!(
            "filingwatch_classifications_total",
            "event_type" => result.event_type.tag()
        )
        .increment(1);

        debug!(
            classifier = self.classifier.name(),
            event_type = %result.event_type,
            confidence = result.confidence,
            snippets = evidence.len(),
            "Analyzed filing text"
        );

        FilingAnalysis {
            event_type: result.event_type,
            confidence: result.confidence,
            evidence,
        }
    }
}
