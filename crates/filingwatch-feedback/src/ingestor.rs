//! Feedback ingestion batch job
//!
//! One run moves through idle -> fetch -> process -> persist -> idle:
//!
//! 1. Rebuild the processed-update set from the label log
//! 2. Load the offset and fetch one batch from the stream
//! 3. Turn each button press into at most one [`FeedbackRow`], acknowledging
//!    every press and sending the type picker for "wrong" presses
//! 4. Append the new rows, then store `max update id + 1` as the offset
//!
//! An empty batch touches neither file. Any transport error aborts the run
//! before anything is persisted. Rows are always written before the offset,
//! so an interrupted run re-fetches the batch and the rebuilt set keeps the
//! rows from being produced twice.
//!
//! Runs must not overlap on the same files; the caller serializes them.

use crate::api::{BotApi, CallbackQuery, Update};
use crate::keyboard::event_type_keyboard;
use crate::label_log::LabelLog;
use crate::offset::OffsetStore;
use crate::telegram::{TelegramClient, TelegramConfig};
use crate::token::FeedbackToken;
use chrono::Utc;
use filingwatch_core::{EventType, FeedbackRow, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

const PICKER_PROMPT: &str = "Which event type?";
const CONFIRMED_ACK: &str = "Thanks, marked as correct.";
const IRRELEVANT_ACK: &str = "Thanks, marked as not relevant.";

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Updates delivered by the stream
    pub updates: usize,

    /// Rows appended to the label log
    pub rows_appended: usize,

    /// Type pickers sent in reply to "wrong" presses
    pub prompts_sent: usize,

    /// Presses acknowledged again because their update was already recorded
    pub duplicates: usize,

    /// Offset persisted at the end of the run, `None` for an empty batch
    pub next_offset: Option<i64>,
}

/// Consumes button presses for one destination chat
pub struct FeedbackIngestor<A> {
    api: A,
    chat_id: String,
    log: LabelLog,
    offsets: OffsetStore,
}

impl<A: BotApi> FeedbackIngestor<A> {
    /// Create an ingestor for presses in `chat_id`
    pub fn new(api: A, chat_id: impl Into<String>, log: LabelLog, offsets: OffsetStore) -> Self {
        Self {
            api,
            chat_id: chat_id.into().trim().to_string(),
            log,
            offsets,
        }
    }

    /// The underlying API handle
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run one fetch-process-persist cycle
    pub async fn run_once(&self) -> Result<BatchSummary> {
        let mut seen = self.log.seen_update_ids();
        let last_offset = self.offsets.load();

        let updates = self.api.get_updates(last_offset).await?;
        if updates.is_empty() {
            debug!(offset = last_offset, "No updates");
            return Ok(BatchSummary::default());
        }

        metrics::counter!("filingwatch_feedback_updates_total").increment(updates.len() as u64);

        let mut summary = BatchSummary {
            updates: updates.len(),
            ..Default::default()
        };
        let mut max_update_id = last_offset.saturating_sub(1);
        let mut new_rows = Vec::new();

        for update in &updates {
            // Advance past every delivered update, interpretable or not
            max_update_id = max_update_id.max(update.update_id);
            self.handle_update(update, &mut seen, &mut new_rows, &mut summary)
                .await?;
        }

        self.log.append(&new_rows)?;
        summary.rows_appended = new_rows.len();

        let next_offset = max_update_id + 1;
        self.offsets.save(next_offset)?;
        summary.next_offset = Some(next_offset);

        for row in &new_rows {
            metrics::counter!("filingwatch_feedback_rows_total", "kind" => row_kind(row)).increment(1);
        }

        info!(
            updates = summary.updates,
            rows = summary.rows_appended,
            prompts = summary.prompts_sent,
            duplicates = summary.duplicates,
            next_offset,
            "Processed feedback batch"
        );
        Ok(summary)
    }

    async fn handle_update(
        &self,
        update: &Update,
        seen: &mut HashSet<i64>,
        new_rows: &mut Vec<FeedbackRow>,
        summary: &mut BatchSummary,
    ) -> Result<()> {
        let Some(query) = &update.callback_query else {
            debug!(update_id = update.update_id, "Ignoring non-interaction update");
            return Ok(());
        };

        if !self.is_destination_chat(query) {
            debug!(update_id = update.update_id, chat = ?query.chat_id(), "Press from another chat");
            self.acknowledge(query, None).await?;
            return Ok(());
        }

        if seen.contains(&update.update_id) {
            debug!(update_id = update.update_id, "Update already recorded");
            summary.duplicates += 1;
            self.acknowledge(query, None).await?;
            return Ok(());
        }

        let Some(token) = FeedbackToken::parse(query.token()) else {
            debug!(update_id = update.update_id, data = query.token(), "Unrecognized token");
            self.acknowledge(query, None).await?;
            return Ok(());
        };

        let update_id = update.update_id;
        let now = Utc::now();

        match token {
            FeedbackToken::Confirm {
                accession,
                suggested,
            } => {
                new_rows.push(FeedbackRow::confirmed(update_id, accession, suggested, now));
                seen.insert(update_id);
                self.acknowledge(query, Some(CONFIRMED_ACK)).await?;
            }
            FeedbackToken::Reject {
                accession,
                suggested,
            } => {
                self.acknowledge(query, None).await?;
                seen.insert(update_id);

                let keyboard = event_type_keyboard(&accession, suggested);
                if self
                    .api
                    .send_message(&self.chat_id, PICKER_PROMPT, Some(&keyboard))
                    .await?
                {
                    summary.prompts_sent += 1;
                } else {
                    warn!(update_id, accession = %accession, "Type picker was not delivered");
                }
            }
            FeedbackToken::Correct {
                accession,
                suggested,
                corrected,
            } => {
                new_rows.push(FeedbackRow::corrected(
                    update_id, accession, suggested, corrected, now,
                ));
                seen.insert(update_id);
                let ack = format!("Thanks, recorded as {}.", corrected.display_name());
                self.acknowledge(query, Some(&ack)).await?;
            }
            FeedbackToken::Irrelevant {
                accession,
                suggested,
            } => {
                new_rows.push(FeedbackRow::corrected(
                    update_id,
                    accession,
                    suggested,
                    EventType::NotRelevant,
                    now,
                ));
                seen.insert(update_id);
                self.acknowledge(query, Some(IRRELEVANT_ACK)).await?;
            }
        }

        Ok(())
    }

    fn is_destination_chat(&self, query: &CallbackQuery) -> bool {
        query
            .chat_id()
            .is_some_and(|id| id.to_string() == self.chat_id)
    }

    async fn acknowledge(&self, query: &CallbackQuery, text: Option<&str>) -> Result<()> {
        if query.id.is_empty() {
            return Ok(());
        }
        if !self.api.answer_callback(&query.id, text).await? {
            debug!(callback_query_id = %query.id, "Acknowledgement not accepted");
        }
        Ok(())
    }
}

fn row_kind(row: &FeedbackRow) -> &'static str {
    if row.is_confirmation() {
        "confirmed"
    } else if row.corrected_event_type == Some(EventType::NotRelevant) {
        "not_relevant"
    } else {
        "corrected"
    }
}

/// Run one batch against the Telegram Bot API
pub async fn process_updates(
    token: &str,
    chat_id: &str,
    telegram: TelegramConfig,
    feedback_log_path: &Path,
    offset_path: &Path,
) -> Result<BatchSummary> {
    let client = TelegramClient::new(token, telegram)?;
    let ingestor = FeedbackIngestor::new(
        client,
        chat_id,
        LabelLog::new(feedback_log_path),
        OffsetStore::new(offset_path),
    );
    ingestor.run_once().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_kind() {
        let now = Utc::now();
        let acc = "0001193125-24-000123";
        let confirmed = FeedbackRow::confirmed(1, acc, EventType::PrefCall, now);
        let corrected =
            FeedbackRow::corrected(2, acc, EventType::PrefCall, EventType::Offering, now);
        let irrelevant =
            FeedbackRow::corrected(3, acc, EventType::PrefCall, EventType::NotRelevant, now);

        assert!(confirmed.is_confirmation());
        assert_eq!(row_kind(&confirmed), "confirmed");
        assert_eq!(row_kind(&corrected), "corrected");
        assert_eq!(row_kind(&irrelevant), "not_relevant");
    }
}
