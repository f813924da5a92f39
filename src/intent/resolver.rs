//! Turning raw model output into a resolved intent.
//!
//! The resolver walks a small state machine over one request:
//!
//! ```text
//! ParseStructured --tool call--> Done
//!        |  \--message--> NeedsForcedRetry --any outcome--> Done
//!        v                       ^
//!    ParseText ----message-------/
//!        |  \--tool call--> Done
//!        \--nothing usable--> Fatal
//! ```
//!
//! Parse failures are values that pick the next state; only `Fatal` leaves
//! as an error. The forced retry runs at most once per request.

use super::prompt::PromptBuilder;
use super::types::{IntentRequest, ResolvedIntent, ToolCall};
use crate::catalog::find_tool;
use crate::error::{CutlineError, Result};
use crate::provider::{ModelOutput, ModelProvider, ModelRequest};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

enum State {
    ParseStructured(ModelOutput),
    ParseText(Option<String>),
    NeedsForcedRetry { draft: String },
    Done(ResolvedIntent),
    Fatal(String),
}

/// Resolves model output for one request, calling the model again if needed.
pub struct ResponseResolver<'a> {
    provider: &'a dyn ModelProvider,
    prompt_builder: &'a PromptBuilder,
    forced_retry: bool,
}

impl<'a> ResponseResolver<'a> {
    pub fn new(provider: &'a dyn ModelProvider, prompt_builder: &'a PromptBuilder) -> Self {
        Self {
            provider,
            prompt_builder,
            forced_retry: true,
        }
    }

    /// Enable or disable the forced second pass.
    pub fn with_forced_retry(mut self, enabled: bool) -> Self {
        self.forced_retry = enabled;
        self
    }

    /// Resolve the first-pass output of `request`.
    pub async fn resolve(
        &self,
        first: ModelOutput,
        request: &IntentRequest,
    ) -> Result<ResolvedIntent> {
        let mut state = State::ParseStructured(first);

        loop {
            state = match state {
                State::ParseStructured(ModelOutput { structured, text }) => match structured {
                    Some(value) => match interpret(value) {
                        Ok(intent) => self.after_parse(intent),
                        Err(e) => {
                            debug!("Structured output rejected: {}", e);
                            State::ParseText(text)
                        }
                    },
                    None => State::ParseText(text),
                },

                State::ParseText(text) => match text {
                    Some(text) => match parse_text(&text) {
                        Ok(intent) => self.after_parse(intent),
                        Err(e) => State::Fatal(e.to_string()),
                    },
                    None => State::Fatal("model returned no output".to_string()),
                },

                State::NeedsForcedRetry { draft } => {
                    State::Done(self.forced_retry(&draft, request).await)
                }

                State::Done(intent) => return Ok(intent),

                State::Fatal(reason) => {
                    warn!("Could not resolve model output: {}", reason);
                    return Err(CutlineError::UnparseableResponse(reason));
                }
            };
        }
    }

    fn after_parse(&self, intent: ResolvedIntent) -> State {
        match intent {
            ResolvedIntent::Message(draft) if self.forced_retry => {
                debug!("First pass produced only a message, forcing a second pass");
                State::NeedsForcedRetry { draft }
            }
            intent => State::Done(intent),
        }
    }

    async fn forced_retry(&self, draft: &str, request: &IntentRequest) -> ResolvedIntent {
        let prompt = self.prompt_builder.build_retry(request, draft);

        let output = match self.provider.generate(&ModelRequest::new(prompt)).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Forced retry failed, keeping first reply: {}", e);
                return ResolvedIntent::Message(draft.to_string());
            }
        };

        match parse_output(output) {
            Ok(intent) => {
                if let ResolvedIntent::ToolCall(call) = &intent {
                    info!("Forced retry produced tool call {}", call.function_name);
                }
                intent
            }
            Err(e) => {
                warn!("Forced retry unusable, keeping first reply: {}", e);
                ResolvedIntent::Message(draft.to_string())
            }
        }
    }
}

/// Interpret one output without any retry: structured first, then text.
fn parse_output(output: ModelOutput) -> Result<ResolvedIntent> {
    if let Some(value) = output.structured {
        match interpret(value) {
            Ok(intent) => return Ok(intent),
            Err(e) => debug!("Structured output rejected: {}", e),
        }
    }

    match output.text {
        Some(text) => parse_text(&text),
        None => Err(CutlineError::UnparseableResponse(
            "model returned no output".to_string(),
        )),
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    function_call: Option<RawFunctionCall>,
    #[serde(default)]
    assistant_message: Option<String>,
}

#[derive(Deserialize)]
struct RawFunctionCall {
    #[serde(default)]
    function_name: String,
    #[serde(default)]
    arguments: Value,
}

/// Parse JSON text, tolerating a surrounding markdown code fence.
fn parse_text(text: &str) -> Result<ResolvedIntent> {
    let body = strip_code_fence(text);
    let value: Value = serde_json::from_str(body).map_err(|e| {
        CutlineError::UnparseableResponse(format!("model text is not JSON ({})", e))
    })?;
    interpret(value)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Validate an envelope-shaped value.
///
/// A function call, when present and valid, wins over a message. An invalid
/// function call next to a usable message yields the message.
fn interpret(value: Value) -> Result<ResolvedIntent> {
    let raw: RawEnvelope = serde_json::from_value(value)
        .map_err(|e| CutlineError::Validation(format!("unexpected shape: {}", e)))?;

    let message = raw
        .assistant_message
        .filter(|message| !message.trim().is_empty());

    match (raw.function_call.map(validate_call), message) {
        (Some(Ok(call)), _) => Ok(ResolvedIntent::ToolCall(call)),
        (Some(Err(e)), Some(message)) => {
            debug!("Dropping invalid function call in favour of the message: {}", e);
            Ok(ResolvedIntent::Message(message))
        }
        (Some(Err(e)), None) => Err(e),
        (None, Some(message)) => Ok(ResolvedIntent::Message(message)),
        (None, None) => Err(CutlineError::Validation(
            "neither function_call nor assistant_message is set".to_string(),
        )),
    }
}

fn validate_call(call: RawFunctionCall) -> Result<ToolCall> {
    let tool = find_tool(&call.function_name).ok_or_else(|| {
        CutlineError::Validation(format!("unknown tool '{}'", call.function_name))
    })?;

    Ok(ToolCall {
        function_name: tool.name.to_string(),
        arguments: arguments_map(call.arguments)?,
    })
}

fn arguments_map(arguments: Value) -> Result<Map<String, Value>> {
    match arguments {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        Value::String(s) if s.trim().is_empty() => Ok(Map::new()),
        Value::String(s) => serde_json::from_str(&s)
            .map_err(|e| CutlineError::Validation(format!("arguments are not an object: {}", e))),
        other => Err(CutlineError::Validation(format!(
            "arguments must be an object, got {}",
            other
        ))),
    }
}
