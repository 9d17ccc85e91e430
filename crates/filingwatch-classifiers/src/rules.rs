//! Static event rule table
//!
//! Each rule pairs an event type with an ordered list of case-insensitive
//! regular expressions. A rule's confidence grows with the number of distinct
//! patterns that match, not with repeated occurrences of one pattern:
//!
//! `confidence = min(cap, base + per_hit * (hits - 1))`
//!
//! Equal confidences are broken by `priority` (higher wins).

use filingwatch_core::EventType;

/// Characters that end the literal prefix of a pattern
const METACHARACTERS: &[char] = &[
    '.', '^', '$', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '\\',
];

const DEFAULT_BASE: f32 = 0.5;
const DEFAULT_PER_HIT: f32 = 0.2;
const DEFAULT_CAP: f32 = 0.95;

/// Immutable rule definition
#[derive(Debug, Clone, PartialEq)]
pub struct EventRule {
    /// Event type this rule votes for
    pub event_type: EventType,

    /// Regular expressions, matched case-insensitively
    pub patterns: Vec<String>,

    /// Confidence for a single matching pattern
    pub base: f32,

    /// Added for each additional distinct matching pattern
    pub per_hit: f32,

    /// Upper bound on the rule's confidence
    pub cap: f32,

    /// Tie-break between equal confidences (higher wins)
    pub priority: i32,
}

impl EventRule {
    /// Create a rule with the default confidence curve and priority 0
    pub fn new<I, S>(event_type: EventType, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            event_type,
            patterns: patterns.into_iter().map(Into::into).collect(),
            base: DEFAULT_BASE,
            per_hit: DEFAULT_PER_HIT,
            cap: DEFAULT_CAP,
            priority: 0,
        }
    }

    /// Set the confidence curve
    pub fn with_confidence(mut self, base: f32, per_hit: f32, cap: f32) -> Self {
        self.base = base;
        self.per_hit = per_hit;
        self.cap = cap;
        self
    }

    /// Set the tie-break priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Confidence for `hits` distinct matching patterns, `None` when nothing matched
    pub fn confidence_for(&self, hits: usize) -> Option<f32> {
        if hits == 0 {
            return None;
        }
        let raw = self.base + self.per_hit * (hits - 1) as f32;
        Some(raw.min(self.cap).clamp(0.0, 1.0))
    }

    /// Human-readable literal phrases derived from the patterns
    ///
    /// Used only to locate evidence, never to classify.
    pub fn phrases(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter_map(|p| literal_prefix(p))
            .collect()
    }
}

/// Strip boundary anchors and cut the pattern at its first metacharacter
pub(crate) fn literal_prefix(pattern: &str) -> Option<String> {
    let mut p = pattern.trim();

    p = p.strip_prefix('^').unwrap_or(p);
    while let Some(rest) = p.strip_prefix("\\b") {
        p = rest;
    }
    p = p.strip_suffix('$').unwrap_or(p);
    while let Some(rest) = p.strip_suffix("\\b") {
        p = rest;
    }

    let end = p.find(METACHARACTERS).unwrap_or(p.len());
    let literal = p[..end].trim();

    if literal.is_empty() {
        None
    } else {
        Some(literal.to_string())
    }
}

/// The production rule table
pub fn default_rules() -> Vec<EventRule> {
    vec![
        EventRule::new(
            EventType::PrefCall,
            [
                r"\bnotice of redemption\b",
                r"\bcalled for redemption\b",
                r"\bredemption of\b",
                r"\bredemption date\b",
                r"\bredemption price\b",
                r"\boptional redemption\b",
                r"\bmandatory redemption\b",
                r"\bredemption right\b",
                r"\bwill redeem\b",
                r"\bcall the\b",
            ],
        )
        .with_priority(50),
        EventRule::new(
            EventType::DivSuspension,
            [
                r"\bsuspension of (?:the )?dividends?\b",
                r"\bsuspend(?:s|ed|ing)?\b",
                r"\bomit(?:ted|s)? (?:the )?dividends?\b",
                r"\bdividend will not\b",
                r"\bdiscontinue.*dividend",
                r"\bcease paying\b",
            ],
        )
        .with_priority(40),
        EventRule::new(
            EventType::RightsOffering,
            [
                r"\brights offering\b",
                r"\bsubscription rights\b",
                r"\btransferable rights\b",
                r"\brights to purchase\b",
                r"\bsubscription offer\b",
            ],
        )
        .with_priority(35),
        EventRule::new(
            EventType::CefDistributionChange,
            [
                r"\bdistribution policy\b",
                r"\bmanaged distribution\b",
                r"\bdistribution rate\b",
                r"\bcut.*distribution",
                r"\breduce.*distribution",
                r"\bdistribution will\b",
                r"\bmonthly distribution\b",
                r"\bquarterly distribution\b",
            ],
        )
        .with_priority(30),
        EventRule::new(
            EventType::Offering,
            [
                r"\bprospectus supplement\b",
                r"\bunderwritten offering\b",
                r"\bat-the-market\b",
                r"\batm offering\b",
                r"\bshelf offering\b",
                r"\boffering of\b",
                r"\boffered by\b",
                r"\bunderwriting agreement\b",
                r"\bplacement agent\b",
            ],
        )
        .with_priority(20),
    ]
}
