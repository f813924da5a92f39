//! Ask command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::intent::IntentRequest;
use crate::orchestrator::Orchestrator;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Run the ask command.
pub async fn run_ask(
    message: &str,
    timeline: Option<&str>,
    media_bin: Option<&str>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings.model) {
        Output::error(&format!("{}", e));
        Output::info("Run 'cutline doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut request = IntentRequest::new(message);
    if let Some(path) = timeline {
        request.timeline_state = Some(read_json(path)?);
    }
    if let Some(path) = media_bin {
        request.mediabin_items = match read_json(path)? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        };
    }

    let orchestrator = Orchestrator::new(&settings)?;

    let spinner = Output::spinner("Thinking...");
    let result = orchestrator.handle(&request).await;
    spinner.finish_and_clear();

    match result {
        Ok(intent) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&intent)?);
            } else {
                Output::intent(&intent);
            }
        }
        Err(e) => {
            Output::error(&format!("Failed to resolve instruction: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

fn read_json(path: &str) -> Result<Value> {
    let path = Settings::expand_path(path);
    parse_json_file(&path)
}

fn parse_json_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}
