//! Classifier trait and common types

use filingwatch_core::EventType;
use serde::{Deserialize, Serialize};

/// Confidence reported when the text carries no evidence for any rule
pub const FALLBACK_CONFIDENCE: f32 = 0.2;

/// Trait for filing classifiers
pub trait Classifier: Send + Sync {
    /// Classify the given normalized text
    fn classify(&self, text: &str) -> ClassificationResult;

    /// Literal phrases supporting `event_type`, in rule order
    fn phrases_for(&self, event_type: EventType) -> Vec<String>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Winning event type
    pub event_type: EventType,

    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(event_type: EventType, confidence: f32) -> Self {
        Self {
            event_type,
            confidence,
        }
    }

    /// The "no evidence" result
    pub fn fallback() -> Self {
        Self::new(EventType::GenericNews, FALLBACK_CONFIDENCE)
    }

    /// Whether this result is the fallback rather than a rule match
    pub fn is_fallback(&self) -> bool {
        self.event_type == EventType::GenericNews
    }
}
