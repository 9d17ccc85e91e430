//! Callback token codec
//!
//! Alert controls carry an ASCII token of colon-delimited fields:
//!
//! | Token | Meaning |
//! |---|---|
//! | `ok:<accession>:<suggested>` | suggestion confirmed |
//! | `wrong:<accession>:<suggested>` | ask which type is right |
//! | `set:<accession>:<suggested>:<corrected>` | user picked `corrected` |
//! | `irrelevant:<accession>:<suggested>` | alert was not relevant |
//!
//! Fields are not escaped, so a field containing `:` cannot round-trip. The
//! tags and accession numbers used here never contain one.

use filingwatch_core::EventType;
use std::fmt;

/// Per-control callback data limit of the destination chat
pub const MAX_TOKEN_BYTES: usize = 64;

/// A decoded alert control token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackToken {
    /// `ok:` - the suggested type is right
    Confirm {
        accession: String,
        suggested: EventType,
    },
    /// `wrong:` - the suggested type is wrong, correction pending
    Reject {
        accession: String,
        suggested: EventType,
    },
    /// `set:` - the user chose the correct type
    Correct {
        accession: String,
        suggested: EventType,
        corrected: EventType,
    },
    /// `irrelevant:` - the filing should not have been alerted
    Irrelevant {
        accession: String,
        suggested: EventType,
    },
}

impl FeedbackToken {
    /// Decode callback data, `None` for any unrecognized shape
    pub fn parse(data: &str) -> Option<Self> {
        let mut parts = data.trim().splitn(4, ':');

        let prefix = parts.next()?;
        let accession = parts.next().filter(|a| !a.is_empty())?.to_string();
        let suggested = parts.next()?.parse::<EventType>().ok()?;

        match prefix {
            "ok" => Some(Self::Confirm {
                accession,
                suggested,
            }),
            "wrong" => Some(Self::Reject {
                accession,
                suggested,
            }),
            "irrelevant" => Some(Self::Irrelevant {
                accession,
                suggested,
            }),
            "set" => {
                let corrected = parts.next()?.parse::<EventType>().ok()?;
                Some(Self::Correct {
                    accession,
                    suggested,
                    corrected,
                })
            }
            _ => None,
        }
    }

    /// Encode to callback data
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Encode, or `None` when the token would exceed [`MAX_TOKEN_BYTES`]
    ///
    /// Oversized tokens are dropped rather than truncated, since a truncated
    /// token would decode to the wrong thing.
    pub fn encode_bounded(&self) -> Option<String> {
        let encoded = self.encode();
        (encoded.len() <= MAX_TOKEN_BYTES).then_some(encoded)
    }

    /// Accession number of the filing the control belongs to
    pub fn accession(&self) -> &str {
        match self {
            Self::Confirm { accession, .. }
            | Self::Reject { accession, .. }
            | Self::Correct { accession, .. }
            | Self::Irrelevant { accession, .. } => accession,
        }
    }

    /// Type the classifier suggested
    pub fn suggested(&self) -> EventType {
        match self {
            Self::Confirm { suggested, .. }
            | Self::Reject { suggested, .. }
            | Self::Correct { suggested, .. }
            | Self::Irrelevant { suggested, .. } => *suggested,
        }
    }
}

impl fmt::Display for FeedbackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirm {
                accession,
                suggested,
            } => write!(f, "ok:{accession}:{suggested}"),
            Self::Reject {
                accession,
                suggested,
            } => write!(f, "wrong:{accession}:{suggested}"),
            Self::Correct {
                accession,
                suggested,
                corrected,
            } => write!(f, "set:{accession}:{suggested}:{corrected}"),
            Self::Irrelevant {
                accession,
                suggested,
            } => write!(f, "irrelevant:{accession}:{suggested}"),
        }
    }
}
