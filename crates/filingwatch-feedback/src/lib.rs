//! Filingwatch Feedback
//!
//! Turns button presses on filing alerts into labeled training data.
//!
//! Provides:
//! - The colon-delimited callback token codec carried by alert controls
//! - Inline keyboard construction within the 64-byte per-control budget
//! - A Telegram Bot API client behind the [`BotApi`] trait
//! - The append-only label log and the consumer offset file
//! - [`FeedbackIngestor`], a run-to-completion batch job with exactly-once
//!   row semantics

pub mod api;
pub mod ingestor;
pub mod keyboard;
pub mod label_log;
pub mod offset;
pub mod telegram;
pub mod token;

pub use api::{BotApi, CallbackQuery, Chat, Update, UpdateMessage};
pub use ingestor::{process_updates, BatchSummary, FeedbackIngestor};
pub use keyboard::{alert_keyboard, event_type_keyboard, InlineButton, InlineKeyboard};
pub use label_log::LabelLog;
pub use offset::OffsetStore;
pub use telegram::{TelegramClient, TelegramConfig};
pub use token::{FeedbackToken, MAX_TOKEN_BYTES};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::api::BotApi;
    pub use crate::ingestor::{BatchSummary, FeedbackIngestor};
    pub use crate::label_log::LabelLog;
    pub use crate::offset::OffsetStore;
    pub use crate::telegram::{TelegramClient, TelegramConfig};
    pub use crate::token::FeedbackToken;
}
