//! Inline keyboards attached to alerts and correction prompts

use crate::token::FeedbackToken;
use filingwatch_core::EventType;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Controls per row in the "which type?" picker
pub const PICKER_ROW_WIDTH: usize = 3;

/// One tappable control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    /// Label shown to the user
    pub text: String,

    /// Token delivered back when tapped
    pub callback_data: String,
}

/// Rows of controls, serialized in the shape the bot API expects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub inline_keyboard: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    /// All controls in display order
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.inline_keyboard.iter().flatten()
    }

    /// Whether the keyboard has no controls at all
    pub fn is_empty(&self) -> bool {
        self.buttons().next().is_none()
    }
}

/// "Correct / Wrong / Not relevant" controls for a fresh alert
pub fn alert_keyboard(accession: &str, suggested: EventType) -> InlineKeyboard {
    let controls = [
        (
            "Correct",
            FeedbackToken::Confirm {
                accession: accession.to_string(),
                suggested,
            },
        ),
        (
            "Wrong",
            FeedbackToken::Reject {
                accession: accession.to_string(),
                suggested,
            },
        ),
        (
            "Not relevant",
            FeedbackToken::Irrelevant {
                accession: accession.to_string(),
                suggested,
            },
        ),
    ];

    let row: Vec<InlineButton> = controls
        .into_iter()
        .filter_map(|(label, token)| bounded_button(label, &token))
        .collect();

    InlineKeyboard {
        inline_keyboard: if row.is_empty() { Vec::new() } else { vec![row] },
    }
}

/// Picker offering every non-sentinel event type as a correction
///
/// Types whose token would overflow the control budget are left out.
pub fn event_type_keyboard(accession: &str, suggested: EventType) -> InlineKeyboard {
    let buttons: Vec<InlineButton> = EventType::PICKABLE
        .iter()
        .filter_map(|&corrected| {
            let token = FeedbackToken::Correct {
                accession: accession.to_string(),
                suggested,
                corrected,
            };
            bounded_button(corrected.display_name(), &token)
        })
        .collect();

    InlineKeyboard {
        inline_keyboard: buttons
            .chunks(PICKER_ROW_WIDTH)
            .map(<[InlineButton]>::to_vec)
            .collect(),
    }
}

fn bounded_button(label: &str, token: &FeedbackToken) -> Option<InlineButton> {
    match token.encode_bounded() {
        Some(callback_data) => Some(InlineButton {
            text: label.to_string(),
            callback_data,
        }),
        None => {
            debug!(token = %token, "Dropping control whose token exceeds the size limit");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MAX_TOKEN_BYTES;

    const ACC: &str = "0001193125-24-000123";

    #[test]
    fn test_picker_lists_every_pickable_type() {
        let keyboard = event_type_keyboard(ACC, EventType::PrefCall);
        let tokens: Vec<_> = keyboard.buttons().map(|b| b.callback_data.as_str()).collect();

        assert_eq!(tokens.len(), EventType::PICKABLE.len());
        assert!(tokens.contains(&"set:0001193125-24-000123:PREF_CALL:DIV_SUSPENSION"));
        assert!(!tokens.iter().any(|t| t.ends_with("NOT_RELEVANT")));
    }

    #[test]
    fn test_picker_rows_are_bounded() {
        let keyboard = event_type_keyboard(ACC, EventType::PrefCall);
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert!(keyboard.inline_keyboard.iter().all(|row| row.len() <= PICKER_ROW_WIDTH));
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Redemption / Call");
    }

    #[test]
    fn test_picker_skips_oversized_tokens() {
        let keyboard = event_type_keyboard(ACC, EventType::CefDistributionChange);
        assert!(keyboard.buttons().all(|b| b.callback_data.len() <= MAX_TOKEN_BYTES));
        assert!(!keyboard
            .buttons()
            .any(|b| b.callback_data.ends_with(":CEF_DISTRIBUTION_CHANGE")));
        assert!(keyboard.buttons().any(|b| b.callback_data.ends_with(":OFFERING")));
    }

    #[test]
    fn test_alert_keyboard() {
        let keyboard = alert_keyboard(ACC, EventType::Offering);
        let row = &keyboard.inline_keyboard[0];
        assert_eq!(row.len(), 3);
        assert_eq!(row[0].callback_data, "ok:0001193125-24-000123:OFFERING");
        assert_eq!(row[1].callback_data, "wrong:0001193125-24-000123:OFFERING");
        assert_eq!(row[2].callback_data, "irrelevant:0001193125-24-000123:OFFERING");
    }

    #[test]
    fn test_keyboard_json_shape() {
        let keyboard = alert_keyboard(ACC, EventType::Offering);
        let json = serde_json::to_value(&keyboard).unwrap();
        assert_eq!(json["inline_keyboard"][0][0]["text"], "Correct");
    }
}
