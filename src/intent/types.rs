//! Request and result types for intent resolution.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Who wrote a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One earlier message of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// An instruction from the editor, with the editor state it refers to.
///
/// Timeline and media bin entries are kept as raw JSON: they are only ever
/// forwarded to the model. Both snake_case and camelCase field names are
/// accepted, unknown fields are ignored, and everything except `message` may
/// be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentRequest {
    pub message: String,

    #[serde(default, alias = "mentionedScrubberIds", deserialize_with = "null_as_default")]
    pub mentioned_scrubber_ids: Vec<String>,

    #[serde(default, alias = "timelineState")]
    pub timeline_state: Option<Value>,

    #[serde(
        default,
        alias = "mediaBinItems",
        alias = "media_bin_items",
        deserialize_with = "null_as_default"
    )]
    pub mediabin_items: Vec<Value>,

    #[serde(default, alias = "chatHistory", deserialize_with = "null_as_default")]
    pub chat_history: Vec<ChatTurn>,
}

impl IntentRequest {
    /// A request carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single named editing action with its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolCall {
    /// Name of a tool from the catalog.
    pub function_name: String,
    /// Tool arguments.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// What the editor should do with a user instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "IntentEnvelope")]
pub enum ResolvedIntent {
    /// Execute this tool.
    ToolCall(ToolCall),
    /// Show this reply to the user.
    Message(String),
}

impl ResolvedIntent {
    pub fn tool_call(&self) -> Option<&ToolCall> {
        match self {
            ResolvedIntent::ToolCall(call) => Some(call),
            ResolvedIntent::Message(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ResolvedIntent::ToolCall(_) => None,
            ResolvedIntent::Message(text) => Some(text),
        }
    }
}

/// Wire shape of a resolved intent: exactly one of the two fields is set.
///
/// The same shape is the output schema the model is asked to follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IntentEnvelope {
    /// Tool to execute, when an action is requested.
    pub function_call: Option<ToolCall>,
    /// Text reply, when no action applies.
    pub assistant_message: Option<String>,
}

impl IntentEnvelope {
    /// JSON Schema of the envelope.
    pub fn json_schema() -> Value {
        let schema = schemars::schema_for!(IntentEnvelope);
        serde_json::to_value(schema).unwrap_or_else(|_| serde_json::json!({ "type": "object" }))
    }
}

impl From<ResolvedIntent> for IntentEnvelope {
    fn from(intent: ResolvedIntent) -> Self {
        match intent {
            ResolvedIntent::ToolCall(call) => Self {
                function_call: Some(call),
                assistant_message: None,
            },
            ResolvedIntent::Message(text) => Self {
                function_call: None,
                assistant_message: Some(text),
            },
        }
    }
}
