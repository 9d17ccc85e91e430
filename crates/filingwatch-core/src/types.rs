//! Core types for filingwatch

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label shown for the fallback type and for tags outside the vocabulary
pub const GENERIC_LABEL: &str = "Filing";

/// Corporate-action event types a filing can be classified into
///
/// `NotRelevant` is a feedback-only sentinel: the classifier never produces it
/// and it is not offered in the correction picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Preferred share redemption or call
    PrefCall,
    /// Dividend suspension or omission
    DivSuspension,
    /// Securities offering (shelf, ATM, underwritten)
    Offering,
    /// Rights offering to existing holders
    RightsOffering,
    /// Closed-end fund distribution policy change
    CefDistributionChange,
    /// Fallback when no rule matched
    GenericNews,
    /// User marked the alert as not relevant
    NotRelevant,
}

impl EventType {
    /// Types offered to users when correcting a classification, in display order
    pub const PICKABLE: [EventType; 6] = [
        Self::PrefCall,
        Self::DivSuspension,
        Self::Offering,
        Self::RightsOffering,
        Self::CefDistributionChange,
        Self::GenericNews,
    ];

    /// Wire tag used in tokens and the label log
    pub fn tag(&self) -> &'static str {
        match self {
            Self::PrefCall => "PREF_CALL",
            Self::DivSuspension => "DIV_SUSPENSION",
            Self::Offering => "OFFERING",
            Self::RightsOffering => "RIGHTS_OFFERING",
            Self::CefDistributionChange => "CEF_DISTRIBUTION_CHANGE",
            Self::GenericNews => "GENERIC_NEWS",
            Self::NotRelevant => "NOT_RELEVANT",
        }
    }

    /// Short human-readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PrefCall => "Redemption / Call",
            Self::DivSuspension => "Dividend suspension",
            Self::Offering => "Offering",
            Self::RightsOffering => "Rights offering",
            Self::CefDistributionChange => "CEF distribution change",
            Self::GenericNews => GENERIC_LABEL,
            Self::NotRelevant => "Not relevant",
        }
    }

    /// Display name for a raw tag, falling back to the generic label
    pub fn display_name_for_tag(tag: &str) -> &'static str {
        tag.parse::<EventType>()
            .map(|t| t.display_name())
            .unwrap_or(GENERIC_LABEL)
    }

    /// Whether this is the feedback-only sentinel
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::NotRelevant)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PREF_CALL" => Ok(Self::PrefCall),
            "DIV_SUSPENSION" => Ok(Self::DivSuspension),
            "OFFERING" => Ok(Self::Offering),
            "RIGHTS_OFFERING" => Ok(Self::RightsOffering),
            "CEF_DISTRIBUTION_CHANGE" => Ok(Self::CefDistributionChange),
            "GENERIC_NEWS" => Ok(Self::GenericNews),
            "NOT_RELEVANT" => Ok(Self::NotRelevant),
            other => Err(Error::UnknownEventType(other.to_string())),
        }
    }
}

/// One user verdict on a classification, appended once to the label log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRow {
    /// Identifier of the stream update that produced this row
    pub update_id: i64,

    /// Accession number of the filing the alert was about
    pub accession_number: String,

    /// Type the classifier suggested
    pub suggested_event_type: EventType,

    /// Type the user chose; `None` confirms the suggestion
    pub corrected_event_type: Option<EventType>,

    /// When the row was produced
    pub created_at: DateTime<Utc>,
}

impl FeedbackRow {
    /// Row confirming the suggested type
    pub fn confirmed(
        update_id: i64,
        accession_number: impl Into<String>,
        suggested: EventType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            update_id,
            accession_number: accession_number.into(),
            suggested_event_type: suggested,
            corrected_event_type: None,
            created_at,
        }
    }

    /// Row replacing the suggested type with `corrected`
    pub fn corrected(
        update_id: i64,
        accession_number: impl Into<String>,
        suggested: EventType,
        corrected: EventType,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            update_id,
            accession_number: accession_number.into(),
            suggested_event_type: suggested,
            corrected_event_type: Some(corrected),
            created_at,
        }
    }

    /// Whether the user confirmed the suggestion
    pub fn is_confirmation(&self) -> bool {
        self.corrected_event_type.is_none()
    }
}
