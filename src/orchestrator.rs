//! Intent pipeline orchestrator for Cutline.
//!
//! Coordinates one request from user instruction to resolved intent:
//! prompt, model call, response resolution, then argument coercion and
//! time normalization for tool calls.

use crate::catalog::{coerce_arguments, find_tool, ToolDescriptor};
use crate::config::{IntentSettings, Prompts, Settings};
use crate::error::{CutlineError, Result};
use crate::intent::{IntentRequest, PromptBuilder, ResolvedIntent, ResponseResolver};
use crate::provider::{ModelProvider, ModelRequest, OpenAiProvider};
use crate::timing::normalize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The main orchestrator for the intent pipeline.
///
/// Holds only read-only state, so one instance can serve concurrent
/// requests.
pub struct Orchestrator {
    provider: Arc<dyn ModelProvider>,
    prompt_builder: PromptBuilder,
    forced_retry: bool,
}

impl Orchestrator {
    /// Create an orchestrator backed by the configured model provider.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let provider = Arc::new(OpenAiProvider::from_settings(&settings.model)?);
        info!("Using model {} at {}", settings.model.model, settings.model.base_url);

        Ok(Self::with_components(provider, prompts, &settings.intent))
    }

    /// Create an orchestrator with a custom provider.
    pub fn with_components(
        provider: Arc<dyn ModelProvider>,
        prompts: Prompts,
        intent: &IntentSettings,
    ) -> Self {
        Self {
            provider,
            prompt_builder: PromptBuilder::new(prompts)
                .with_pixels_per_second(intent.pixels_per_second),
            forced_retry: intent.forced_retry,
        }
    }

    /// Get a reference to the model provider.
    pub fn provider(&self) -> Arc<dyn ModelProvider> {
        self.provider.clone()
    }

    /// Resolve a user instruction into a tool call or a reply.
    #[instrument(skip(self, request), fields(request_id = %uuid::Uuid::new_v4()))]
    pub async fn handle(&self, request: &IntentRequest) -> Result<ResolvedIntent> {
        self.provider.check_credentials()?;

        if request.message.trim().is_empty() {
            return Err(CutlineError::InvalidInput("message must not be empty".to_string()));
        }

        info!("Resolving: {}", request.message);

        let prompt = self.prompt_builder.build(request);
        let first = self.provider.generate(&ModelRequest::new(prompt)).await?;

        let intent = ResponseResolver::new(self.provider.as_ref(), &self.prompt_builder)
            .with_forced_retry(self.forced_retry)
            .resolve(first, request)
            .await?;

        let intent = match intent {
            ResolvedIntent::ToolCall(mut call) => {
                if let Some(tool) = find_tool(&call.function_name) {
                    coerce_arguments(tool, &mut call.arguments);
                    call.arguments = normalize_for(tool, &request.message, &call.arguments);
                }
                info!("Tool call: {}", call.function_name);
                debug!("Arguments: {}", serde_json::Value::Object(call.arguments.clone()));
                ResolvedIntent::ToolCall(call)
            }
            message => {
                info!("Assistant message");
                message
            }
        };

        Ok(intent)
    }
}

/// Normalize time fields, keeping only the ones the tool declares.
///
/// Arguments the model sent are passed through even when undeclared.
fn normalize_for(
    tool: &ToolDescriptor,
    message: &str,
    args: &Map<String, Value>,
) -> Map<String, Value> {
    let mut out = normalize(message, args);
    out.retain(|key, _| args.contains_key(key) || tool.argument_schema.property(key).is_some());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::list_tools;
    use crate::provider::scripted::ScriptedProvider;
    use crate::provider::ModelOutput;
    use serde_json::json;

    fn orchestrator(provider: Arc<ScriptedProvider>) -> Orchestrator {
        Orchestrator::with_components(provider, Prompts::default(), &IntentSettings::default())
    }

    fn message_output(text: &str) -> ModelOutput {
        ModelOutput::from_text(json!({ "function_call": null, "assistant_message": text }).to_string())
    }

    #[tokio::test]
    async fn test_scenario_fills_time_fields() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(ModelOutput::from_structured(
            json!({
                "function_call": {
                    "function_name": "AddMediaByName",
                    "arguments": { "scrubber_name": "cardboard", "track_number": 2 }
                }
            }),
        ))]));

        let intent = orchestrator(provider.clone())
            .handle(&IntentRequest::new(
                "from 2 sec for 10 sec add cardboard to track 2",
            ))
            .await
            .unwrap();

        let call = intent.tool_call().unwrap();
        assert_eq!(call.function_name, "AddMediaByName");
        assert_eq!(call.arguments["start_seconds"], json!(2));
        assert_eq!(call.arguments["duration_seconds"], json!(10));
        assert_eq!(call.arguments["end_seconds"], json!(12));
        assert_eq!(call.arguments["track_number"], json!(2));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_arguments_coerced_before_normalizing() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(ModelOutput::from_text(
            json!({
                "function_call": {
                    "function_name": "AddMediaById",
                    "arguments": { "scrubber_id": "m1", "track_number": "1", "start_seconds": "4" }
                }
            })
            .to_string(),
        ))]));

        let intent = orchestrator(provider)
            .handle(&IntentRequest::new("add it for 6 seconds"))
            .await
            .unwrap();

        let args = &intent.tool_call().unwrap().arguments;
        assert_eq!(args["track_number"], json!(1));
        assert_eq!(args["start_seconds"], json!(4));
        assert_eq!(args["duration_seconds"], json!(6));
        assert_eq!(args["end_seconds"], json!(10));
    }

    async fn resolve_call(message: &str, function_name: &str, arguments: Value) -> Map<String, Value> {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(ModelOutput::from_structured(
            json!({
                "function_call": { "function_name": function_name, "arguments": arguments }
            }),
        ))]));

        let intent = orchestrator(provider)
            .handle(&IntentRequest::new(message))
            .await
            .unwrap();
        intent.tool_call().unwrap().arguments.clone()
    }

    #[tokio::test]
    async fn test_time_fields_only_added_when_declared() {
        let args = resolve_call("make 3 new tracks", "CreateTracks", json!({ "count": 3 })).await;
        assert_eq!(args, json!({ "count": 3 }).as_object().cloned().unwrap());

        let args = resolve_call(
            "make it 1920 by 1080",
            "SetResolution",
            json!({ "width": 1920, "height": 1080 }),
        )
        .await;
        assert_eq!(
            args,
            json!({ "width": 1920, "height": 1080 }).as_object().cloned().unwrap()
        );

        let args = resolve_call(
            "move it to 5s on track 2",
            "MoveScrubber",
            json!({ "scrubber_id": "s1", "new_position_seconds": 5, "new_track_number": 2 }),
        )
        .await;
        assert!(!args.contains_key("start_seconds"));
        assert!(!args.contains_key("duration_seconds"));
        assert!(!args.contains_key("end_seconds"));
    }

    #[tokio::test]
    async fn test_undeclared_keys_from_model_pass_through() {
        let args = resolve_call(
            "make 2 tracks for 5 seconds",
            "CreateTracks",
            json!({ "count": 2, "start_seconds": 1 }),
        )
        .await;
        assert_eq!(args["start_seconds"], json!(1));
        assert!(!args.contains_key("duration_seconds"));
        assert!(!args.contains_key("end_seconds"));
    }

    #[tokio::test]
    async fn test_hello_stays_a_message() {
        let provider = Arc::new(ScriptedProvider::repeating(message_output(
            "Hi! What would you like to edit?",
        )));

        let intent = orchestrator(provider.clone())
            .handle(&IntentRequest::new("hello"))
            .await
            .unwrap();

        assert_eq!(intent.message(), Some("Hi! What would you like to edit?"));
        assert!(intent.tool_call().is_none());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_never_more_than_one_retry() {
        let provider = Arc::new(ScriptedProvider::repeating(message_output("I can do that.")));
        let orchestrator = orchestrator(provider.clone());

        for _ in 0..3 {
            let before = provider.calls();
            let intent = orchestrator
                .handle(&IntentRequest::new("trim the intro"))
                .await
                .unwrap();
            assert!(intent.message().is_some());
            assert_eq!(provider.calls() - before, 2);
        }
    }

    #[tokio::test]
    async fn test_retry_prompt_omits_history() {
        let provider = Arc::new(ScriptedProvider::repeating(message_output("Okay.")));
        let mut request = IntentRequest::new("move it");
        request.chat_history = vec![crate::intent::ChatTurn {
            role: crate::intent::ChatRole::User,
            content: "earlier secret".to_string(),
        }];

        orchestrator(provider.clone()).handle(&request).await.unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("earlier secret"));
        assert!(!prompts[1].contains("earlier secret"));
        assert!(prompts[1].contains("Okay."));
    }

    #[tokio::test]
    async fn test_forced_retry_can_be_disabled() {
        let provider = Arc::new(ScriptedProvider::repeating(message_output("Hello!")));
        let settings = IntentSettings {
            forced_retry: false,
            ..IntentSettings::default()
        };
        let orchestrator =
            Orchestrator::with_components(provider.clone(), Prompts::default(), &settings);

        orchestrator.handle(&IntentRequest::new("hello")).await.unwrap();
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_propagates_without_retry() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(
            CutlineError::UpstreamTransport("unreachable".to_string()),
        )]));

        let err = orchestrator(provider.clone())
            .handle(&IntentRequest::new("add a track"))
            .await
            .unwrap_err();

        assert!(matches!(err, CutlineError::UpstreamTransport(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_rejects_before_calling() {
        let provider = Arc::new(ScriptedProvider::without_key());
        let err = orchestrator(provider.clone())
            .handle(&IntentRequest::new("add a track"))
            .await
            .unwrap_err();

        assert!(matches!(err, CutlineError::Config(_)));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let err = orchestrator(provider.clone())
            .handle(&IntentRequest::new("   "))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_results_hold_exactly_one_field_and_known_tools() {
        let outputs = vec![
            ModelOutput::from_structured(json!({
                "function_call": { "function_name": "SetResolution", "arguments": { "width": 1920, "height": 1080 } },
                "assistant_message": "Setting resolution."
            })),
            message_output("Which clip?"),
            ModelOutput::from_text(r#"{"function_call": {"function_name": "CreateTracks", "arguments": {"count": 2}}}"#),
        ];

        for first in outputs {
            let provider = Arc::new(ScriptedProvider::new(vec![Ok(first)]));
            let intent = orchestrator(provider)
                .handle(&IntentRequest::new("do something"))
                .await
                .unwrap();

            let wire = serde_json::to_value(&intent).unwrap();
            let call_set = !wire["function_call"].is_null();
            let message_set = !wire["assistant_message"].is_null();
            assert!(call_set ^ message_set);

            if let Some(call) = intent.tool_call() {
                assert!(list_tools().iter().any(|t| t.name == call.function_name));
            }
        }
    }
}
