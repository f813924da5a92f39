//! OpenAI-compatible chat completions provider.

use super::{ModelOutput, ModelProvider, ModelRequest};
use crate::catalog::to_function_tools;
use crate::config::ModelSettings;
use crate::error::{CutlineError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    ChatCompletionToolChoiceOption, CreateChatCompletionRequestArgs, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

/// Provider backed by any OpenAI-compatible endpoint (Gemini by default).
pub struct OpenAiProvider {
    client: Option<async_openai::Client<async_openai::config::OpenAIConfig>>,
    model: String,
    temperature: f32,
    api_key_env: String,
}

impl OpenAiProvider {
    /// Create a provider from model settings.
    ///
    /// A missing API key is not an error here: the provider is still built so
    /// a server can start, and every request is rejected by
    /// [`ModelProvider::check_credentials`] until the key is configured.
    pub fn from_settings(settings: &ModelSettings) -> Result<Self> {
        let client = match settings.resolve_api_key() {
            Some(key) => Some(create_client(settings, &key)?),
            None => {
                warn!(
                    "No API key configured (set {} or model.api_key)",
                    settings.api_key_env
                );
                None
            }
        };

        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            api_key_env: settings.api_key_env.clone(),
        })
    }

    fn missing_key(&self) -> CutlineError {
        CutlineError::Config(format!(
            "No API key configured. Set it with: export {}='...'",
            self.api_key_env
        ))
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn check_credentials(&self) -> Result<()> {
        match self.client {
            Some(_) => Ok(()),
            None => Err(self.missing_key()),
        }
    }

    #[instrument(skip(self, request), fields(model = %self.model, prompt_len = request.prompt.len()))]
    async fn generate(&self, request: &ModelRequest) -> Result<ModelOutput> {
        let client = self.client.as_ref().ok_or_else(|| self.missing_key())?;

        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.clone())
                .build()
                .map_err(|e| CutlineError::Prompt(e.to_string()))?
                .into()];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .tools(to_function_tools())
            .tool_choice(ChatCompletionToolChoiceOption::Auto)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some("A single tool call or a text reply".to_string()),
                    name: "intent_response".to_string(),
                    schema: Some(request.response_schema.clone()),
                    strict: Some(false),
                },
            })
            .build()
            .map_err(|e| CutlineError::Prompt(e.to_string()))?;

        let response = client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| CutlineError::UpstreamTransport(format!("Chat completion failed: {}", e)))?;

        let Some(choice) = response.choices.into_iter().next() else {
            debug!("Model returned no choices");
            return Ok(ModelOutput::default());
        };

        let structured = choice
            .message
            .tool_calls
            .and_then(|calls| calls.into_iter().next())
            .map(|call| {
                let arguments = serde_json::from_str::<Value>(&call.function.arguments)
                    .unwrap_or(Value::String(call.function.arguments));
                json!({
                    "function_call": {
                        "function_name": call.function.name,
                        "arguments": arguments,
                    }
                })
            });

        let text = choice.message.content.filter(|c| !c.trim().is_empty());

        debug!(
            has_tool_call = structured.is_some(),
            has_text = text.is_some(),
            "Model responded"
        );

        Ok(ModelOutput { structured, text })
    }
}
