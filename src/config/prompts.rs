//! Prompt templates for Cutline.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub intent: IntentPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for resolving a user instruction into a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentPrompts {
    /// Role and policy preamble placed at the top of every request.
    pub system: String,
    /// Instruction for the forced second pass.
    pub retry: String,
}

impl Default for IntentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a video editing assistant working inside a timeline editor.
You translate the user's instruction into exactly one editing tool call, or reply in text when no tool applies.

Output contract:
- Respond with a single JSON object of the form {"function_call": {"function_name": "...", "arguments": {...}}} or {"assistant_message": "..."}.
- Call at most one tool per reply. Never set both fields.
- function_name must be one of the tool names listed in the catalog below, and arguments must follow that tool's schema.
- If the request is ambiguous or is missing information you cannot infer from the timeline or media bin, do not guess: reply with an assistant_message asking a short clarifying question.
- If the user is only chatting or asking a question, reply with an assistant_message.

Editor conventions:
- Times are in seconds. Convert expressions such as "1m30s", "2:30" or "500ms" to seconds.
- When a tool accepts pixels_per_second and the user gives no scale, use {{pixels_per_second}}.
- Track numbers you output are 1-based: track 1 is the first track. Internal track ids are 0-based, so the track with id "track-0" is track 1.
- Match media by name case-insensitively on a substring of the name ("cardboard" matches "Cardboard_Box.mp4").
- Prefer ids from the timeline or media bin when the user refers to an existing item, and ids from mentioned scrubbers when given."#
                .to_string(),

            retry: r#"Your previous reply to this request was a text message instead of a tool call:

"{{draft}}"

If that message describes an editing action that one of the tools can perform, respond now with that single tool call in the function_call field, with complete arguments.
If no tool applies, or you genuinely need clarification from the user, respond with the assistant_message again."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let intent_path = custom_path.join("intent.toml");
            if intent_path.exists() {
                let content = std::fs::read_to_string(&intent_path)?;
                prompts.intent = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass over the template: placeholders inside
    /// substituted values are left as written, and unknown placeholders are
    /// kept.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
