//! Terminal front end for the Cornfield simulation.
//!
//! Reads tool names (`seed`, `water`, `fertilizer`, `cure`, or the
//! toolbar ids `seedTool` etc.) from stdin, one per line, and plays a
//! single field session in real time. Messages go to stdout; scene and
//! sound output is logged.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `cornfield-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Spawn the stdin reader
//! 4. Run the session until harvest or end of input
//! 5. Print the session summary as JSON

mod console;
mod error;

use std::path::Path;

use cornfield_core::config::FieldConfig;
use cornfield_core::runner;
use cornfield_core::sequencer::Sequencer;
use tokio::io::{AsyncBufReadExt as _, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console::{LogRenderer, LogSoundPlayer, StdoutDisplay};
use crate::error::EngineError;

/// Path of the configuration file, relative to the working directory.
const CONFIG_PATH: &str = "cornfield-config.yaml";

/// Capacity of the tool event channel.
const TOOL_QUEUE: usize = 32;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration loading or the session fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (before logging, which it configures).
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        growth_period_ms = config.growth.period_ms,
        maturity_stage = config.growth.maturity_stage,
        disease_stage = config.growth.disease_stage,
        "Configuration loaded"
    );

    // 3. Spawn the stdin reader.
    let (tx, mut rx) = mpsc::channel(TOOL_QUEUE);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if tx.send(line.to_owned()).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "failed to read stdin, closing input");
                    break;
                }
            }
        }
    });

    // 4. Run the session.
    let sound = if std::env::var_os("CORNFIELD_MUTE").is_some() {
        LogSoundPlayer::muted()
    } else {
        LogSoundPlayer::default()
    };
    let mut sequencer = Sequencer::new(config, LogRenderer::default(), sound, StdoutDisplay);
    sequencer.welcome();

    let result = runner::run_session(&mut sequencer, &mut rx)
        .await
        .map_err(EngineError::from)?;

    // 5. Report.
    let summary = serde_json::to_string_pretty(&result.summary).map_err(EngineError::from)?;
    info!(reason = ?result.end_reason, "cornfield-engine shutdown complete");
    eprintln!("{summary}");

    Ok(())
}

/// Load the field configuration from [`CONFIG_PATH`], falling back to
/// defaults when the file does not exist.
fn load_config() -> Result<FieldConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(FieldConfig::from_file(config_path)?)
    } else {
        Ok(FieldConfig::default())
    }
}
