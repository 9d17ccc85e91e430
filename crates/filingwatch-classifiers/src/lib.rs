//! Filingwatch Classifiers
//!
//! Deterministic classification of regulatory filing text into corporate-action
//! event types, plus extraction of the evidence snippets that justify a result.
//!
//! The pipeline for one filing is:
//! - [`RuleClassifier`] scores every rule in the table and picks a winner
//! - [`EventRule::phrases`] turns the winner's patterns into literal phrases
//! - [`extract_snippets`] locates those phrases and packages bounded excerpts
//!
//! [`FilingAnalyzer`] runs all three and returns a [`FilingAnalysis`].
//! Everything here is synchronous and free of shared mutable state.

pub mod analyzer;
pub mod classifier;
pub mod evidence;
pub mod rule_classifier;
pub mod rules;

pub use analyzer::{FilingAnalysis, FilingAnalyzer};
pub use classifier::{ClassificationResult, Classifier, FALLBACK_CONFIDENCE};
pub use evidence::{extract_snippets, EvidenceConfig};
pub use rule_classifier::{classify, display_name, phrases_for, RuleClassifier};
pub use rules::{default_rules, EventRule};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analyzer::{FilingAnalysis, FilingAnalyzer};
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::evidence::{extract_snippets, EvidenceConfig};
    pub use crate::rule_classifier::RuleClassifier;
    pub use crate::rules::EventRule;
}
