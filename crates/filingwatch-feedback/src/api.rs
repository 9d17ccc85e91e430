//! Update stream wire types and the bot API seam

use crate::keyboard::InlineKeyboard;
use async_trait::async_trait;
use filingwatch_core::Result;
use serde::{Deserialize, Serialize};

/// One delivered update; only button presses are of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    /// Monotonic stream identifier
    pub update_id: i64,

    /// Present when the update is a button press
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
}

/// A button press on a message the bot sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Identifier used to acknowledge the press
    pub id: String,

    /// Token attached to the pressed control
    #[serde(default)]
    pub data: Option<String>,

    /// Message the control belonged to
    #[serde(default)]
    pub message: Option<UpdateMessage>,
}

impl CallbackQuery {
    /// Chat the pressed control lives in, if known
    pub fn chat_id(&self) -> Option<i64> {
        self.message.as_ref().map(|m| m.chat.id)
    }

    /// Trimmed token, empty when absent
    pub fn token(&self) -> &str {
        self.data.as_deref().unwrap_or_default().trim()
    }
}

/// The part of a message needed to route a button press
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMessage {
    pub chat: Chat,
}

/// Chat identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Operations the feedback ingestor needs from the messaging channel
///
/// Errors returned here are transport failures and abort the batch. A request
/// the channel refuses is reported as `Ok(false)`.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// Fetch updates with identifier >= `offset`
    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>>;

    /// Acknowledge a button press, optionally showing a short text
    async fn answer_callback(&self, callback_query_id: &str, text: Option<&str>) -> Result<bool>;

    /// Send a message, optionally with controls attached
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_callback_update() {
        let raw = r#"{
            "update_id": 901,
            "callback_query": {
                "id": "4382",
                "from": {"id": 11, "is_bot": false, "first_name": "A"},
                "data": " ok:0001193125-24-000123:PREF_CALL ",
                "message": {"message_id": 5, "chat": {"id": -100123, "type": "supergroup"}}
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let cq = update.callback_query.unwrap();

        assert_eq!(update.update_id, 901);
        assert_eq!(cq.chat_id(), Some(-100123));
        assert_eq!(cq.token(), "ok:0001193125-24-000123:PREF_CALL");
    }

    #[test]
    fn test_decode_plain_message_update() {
        let raw = r#"{"update_id": 902, "message": {"message_id": 6, "text": "hi"}}"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        assert!(update.callback_query.is_none());
    }
}
