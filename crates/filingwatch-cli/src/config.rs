//! Filingwatch configuration

use filingwatch_classifiers::EvidenceConfig;
use filingwatch_feedback::TelegramConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration shared by every subcommand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingwatchConfig {
    /// Destination chat whose button presses are processed
    #[serde(default)]
    pub chat_id: Option<String>,

    /// Append-only label log
    #[serde(default = "default_feedback_file")]
    pub feedback_file: PathBuf,

    /// Consumer offset file
    #[serde(default = "default_offset_file")]
    pub offset_file: PathBuf,

    /// Bot API connection settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Evidence snippet bounds
    #[serde(default)]
    pub evidence: EvidenceConfig,
}

impl FilingwatchConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &crate::Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(chat_id) = &cli.chat_id {
            config.chat_id = Some(chat_id.clone());
        }

        if let Some(feedback_file) = &cli.feedback_file {
            config.feedback_file = feedback_file.clone();
        }

        if let Some(offset_file) = &cli.offset_file {
            config.offset_file = offset_file.clone();
        }

        Ok(config)
    }
}

impl Default for FilingwatchConfig {
    fn default() -> Self {
        Self {
            chat_id: None,
            feedback_file: default_feedback_file(),
            offset_file: default_offset_file(),
            telegram: TelegramConfig::default(),
            evidence: EvidenceConfig::default(),
        }
    }
}

fn default_feedback_file() -> PathBuf {
    PathBuf::from("feedback_labels.jsonl")
}

fn default_offset_file() -> PathBuf {
    PathBuf::from("feedback_offset.txt")
}
