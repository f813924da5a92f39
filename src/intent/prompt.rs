//! Prompt assembly for intent resolution.

use super::types::{ChatTurn, IntentRequest};
use crate::catalog::catalog_json;
use crate::config::Prompts;
use serde_json::Value;
use std::collections::HashMap;

/// Builds the text sent to the model for a request.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    prompts: Prompts,
    pixels_per_second: u32,
}

impl PromptBuilder {
    /// Create a prompt builder from loaded prompt templates.
    pub fn new(prompts: Prompts) -> Self {
        Self {
            prompts,
            pixels_per_second: 100,
        }
    }

    /// Set the default timeline scale the model is told to assume.
    pub fn with_pixels_per_second(mut self, pixels_per_second: u32) -> Self {
        self.pixels_per_second = pixels_per_second;
        self
    }

    /// Prompt for the first pass: policy, tools, history, editor state, message.
    pub fn build(&self, request: &IntentRequest) -> String {
        let mut sections = vec![
            self.preamble(),
            section("Available tools", &catalog_json()),
            section("Conversation so far", &format_history(&request.chat_history)),
        ];

        if !request.mentioned_scrubber_ids.is_empty() {
            sections.push(section(
                "Mentioned scrubbers",
                &request.mentioned_scrubber_ids.join(", "),
            ));
        }

        sections.extend(editor_sections(request));
        sections.push(section("User message", &request.message));
        sections.join("\n\n")
    }

    /// Prompt for the forced second pass.
    ///
    /// Carries the draft reply from the first pass and leaves out the chat
    /// history.
    pub fn build_retry(&self, request: &IntentRequest, draft: &str) -> String {
        let mut vars = HashMap::new();
        vars.insert("draft".to_string(), draft.to_string());
        vars.insert("message".to_string(), request.message.clone());
        let instruction = self.prompts.render_with_custom(&self.prompts.intent.retry, &vars);

        let mut sections = vec![
            self.preamble(),
            section("Available tools", &catalog_json()),
        ];

        if !request.mentioned_scrubber_ids.is_empty() {
            sections.push(section(
                "Mentioned scrubbers",
                &request.mentioned_scrubber_ids.join(", "),
            ));
        }

        sections.extend(editor_sections(request));
        sections.push(section("User message", &request.message));
        sections.push(section("Your previous reply", &instruction));
        sections.join("\n\n")
    }

    fn preamble(&self) -> String {
        let mut vars = HashMap::new();
        vars.insert(
            "pixels_per_second".to_string(),
            self.pixels_per_second.to_string(),
        );
        self.prompts.render_with_custom(&self.prompts.intent.system, &vars)
    }
}

fn section(title: &str, body: &str) -> String {
    format!("## {}\n{}", title, body)
}

fn editor_sections(request: &IntentRequest) -> Vec<String> {
    let timeline = request
        .timeline_state
        .as_ref()
        .map(Value::to_string)
        .unwrap_or_else(|| "(not provided)".to_string());

    let media_bin = if request.mediabin_items.is_empty() {
        "(empty)".to_string()
    } else {
        Value::Array(request.mediabin_items.clone()).to_string()
    };

    vec![section("Timeline state", &timeline), section("Media bin", &media_bin)]
}

fn format_history(history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return "(no previous messages)".to_string();
    }

    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::types::ChatRole;
    use serde_json::json;

    fn request() -> IntentRequest {
        IntentRequest {
            message: "put cardboard on track 2".to_string(),
            mentioned_scrubber_ids: vec!["scrubber-7".to_string()],
            timeline_state: Some(json!({ "tracks": [{ "id": "track-0", "scrubbers": [] }] })),
            mediabin_items: vec![json!({ "id": "m1", "name": "Cardboard.mp4" })],
            chat_history: vec![
                ChatTurn {
                    role: ChatRole::User,
                    content: "first question".to_string(),
                },
                ChatTurn {
                    role: ChatRole::Assistant,
                    content: "first answer".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_build_contains_every_part() {
        let prompt = PromptBuilder::new(Prompts::default()).build(&request());

        assert!(prompt.contains("use 100"));
        assert!(!prompt.contains("{{pixels_per_second}}"));
        assert!(prompt.contains("\"name\":\"AddMediaByName\""));
        assert!(prompt.contains("scrubber-7"));
        assert!(prompt.contains("track-0"));
        assert!(prompt.contains("Cardboard.mp4"));
        assert!(prompt.ends_with("## User message\nput cardboard on track 2"));
    }

    #[test]
    fn test_history_oldest_first() {
        let prompt = PromptBuilder::new(Prompts::default()).build(&request());
        let first = prompt.find("user: first question").unwrap();
        let second = prompt.find("assistant: first answer").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_missing_snapshots() {
        let prompt = PromptBuilder::new(Prompts::default()).build(&IntentRequest::new("hello"));
        assert!(prompt.contains("(no previous messages)"));
        assert!(prompt.contains("## Timeline state\n(not provided)"));
        assert!(prompt.contains("## Media bin\n(empty)"));
        assert!(!prompt.contains("Mentioned scrubbers"));
    }

    #[test]
    fn test_custom_scale() {
        let prompt = PromptBuilder::new(Prompts::default())
            .with_pixels_per_second(40)
            .build(&IntentRequest::new("hello"));
        assert!(prompt.contains("use 40"));
    }

    #[test]
    fn test_retry_omits_history() {
        let prompt = PromptBuilder::new(Prompts::default())
            .build_retry(&request(), "I will add Cardboard.mp4 to track 2.");

        assert!(prompt.contains("I will add Cardboard.mp4 to track 2."));
        assert!(!prompt.contains("first question"));
        assert!(!prompt.contains("Conversation so far"));
        assert!(prompt.contains("\"name\":\"AddMediaByName\""));
        assert!(prompt.contains("put cardboard on track 2"));
    }

    #[test]
    fn test_retry_keeps_draft_verbatim() {
        let draft = "Use {{message}} at {{pixels_per_second}} px/s";
        let prompt = PromptBuilder::new(Prompts::default()).build_retry(&request(), draft);
        assert!(prompt.contains(draft));
    }
}
