//! Filingwatch CLI
//!
//! Classifies regulatory filing text into corporate-action event types and
//! ingests the corrections users make through alert buttons.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filingwatch_classifiers::{FilingAnalysis, FilingAnalyzer, RuleClassifier};
use filingwatch_core::normalize_whitespace;
use filingwatch_feedback::{alert_keyboard, InlineKeyboard};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

mod config;

use config::FilingwatchConfig;

#[derive(Parser, Debug)]
#[command(name = "filingwatch")]
#[command(about = "Filing event classifier and feedback ingestor", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "filingwatch.yaml")]
    config: String,

    /// Destination chat id
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    chat_id: Option<String>,

    /// Label log path
    #[arg(long)]
    feedback_file: Option<PathBuf>,

    /// Offset file path
    #[arg(long)]
    offset_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify filing text and print the analysis as JSON
    Classify {
        /// Text file to classify, `-` for stdin
        input: PathBuf,

        /// Accession number; attaches the alert controls to the output
        #[arg(long)]
        accession: Option<String>,
    },

    /// Process one batch of alert button presses
    ProcessFeedback {
        /// Bot token
        #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
        bot_token: Option<String>,
    },
}

/// Analysis plus the controls the alerting layer would attach
#[derive(Serialize)]
struct ClassifyOutput {
    #[serde(flatten)]
    analysis: FilingAnalysis,

    #[serde(skip_serializing_if = "Option::is_none")]
    controls: Option<InlineKeyboard>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = FilingwatchConfig::load(&cli.config, cli)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    match &cli.command {
        Command::Classify { input, accession } => classify(&config, input, accession.as_deref()),
        Command::ProcessFeedback { bot_token } => {
            process_feedback(&config, bot_token.as_deref()).await
        }
    }
}

fn classify(config: &FilingwatchConfig, input: &PathBuf, accession: Option<&str>) -> Result<()> {
    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?
    };

    let analyzer = FilingAnalyzer::with_classifier(RuleClassifier::new(), config.evidence);
    let analysis = analyzer.analyze(&normalize_whitespace(&raw));
    info!(
        event_type = %analysis.event_type,
        confidence = analysis.confidence,
        "Classified {}",
        input.display()
    );

    let controls = accession.map(|acc| alert_keyboard(acc, analysis.event_type));
    let output = ClassifyOutput { analysis, controls };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn process_feedback(config: &FilingwatchConfig, bot_token: Option<&str>) -> Result<()> {
    let token = bot_token.map(str::trim).filter(|t| !t.is_empty());
    let chat_id = config.chat_id.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let (Some(token), Some(chat_id)) = (token, chat_id) else {
        warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set. Skipping.");
        return Ok(());
    };

    let summary = filingwatch_feedback::process_updates(
        token,
        chat_id,
        config.telegram.clone(),
        &config.feedback_file,
        &config.offset_file,
    )
    .await
    .context("Feedback processing failed")?;

    info!(
        updates = summary.updates,
        rows = summary.rows_appended,
        "Feedback run complete"
    );
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("filingwatch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("filingwatch=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_classify_command() {
        let cli = Cli::try_parse_from(["filingwatch", "classify", "notice.txt", "--accession", "0001"])
            .unwrap();
        match cli.command {
            Command::Classify { input, accession } => {
                assert_eq!(input, PathBuf::from("notice.txt"));
                assert_eq!(accession.as_deref(), Some("0001"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_overrides_config_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("filingwatch.yaml");
        std::fs::write(&config_path, "feedback_file: from_file.jsonl\nchat_id: \"1\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "filingwatch",
            "--config",
            config_path.to_str().unwrap(),
            "--offset-file",
            "cli_offset.txt",
            "--chat-id",
            "-42",
            "process-feedback",
        ])
        .unwrap();

        let config = FilingwatchConfig::load(&cli.config, &cli).unwrap();
        assert_eq!(config.feedback_file, PathBuf::from("from_file.jsonl"));
        assert_eq!(config.offset_file, PathBuf::from("cli_offset.txt"));
        assert_eq!(config.chat_id.as_deref(), Some("-42"));
    }

    #[test]
    fn test_classify_output_flattens_analysis() {
        let analysis = FilingAnalyzer::new().analyze("subscription rights");
        let output = ClassifyOutput {
            controls: Some(alert_keyboard("0001", analysis.event_type)),
            analysis,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["event_type"], "RIGHTS_OFFERING");
        assert_eq!(json["controls"]["inline_keyboard"][0][0]["callback_data"], "ok:0001:RIGHTS_OFFERING");
    }
}
