//! Language model providers.
//!
//! The model is an unreliable collaborator: it is asked for a structured
//! reply but may return a native tool call, JSON text, prose, or nothing.
//! Providers report what came back without judging it; the resolver decides
//! what it means.

mod openai;
#[cfg(test)]
pub(crate) mod scripted;

pub use openai::OpenAiProvider;

use crate::error::Result;
use crate::intent::IntentEnvelope;
use async_trait::async_trait;
use serde_json::Value;

/// A single model invocation.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Full prompt text.
    pub prompt: String,
    /// JSON Schema the reply should follow.
    pub response_schema: Value,
}

impl ModelRequest {
    /// Request an intent envelope for the given prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: IntentEnvelope::json_schema(),
        }
    }
}

/// What the model returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOutput {
    /// Already-structured result, e.g. a native tool call.
    pub structured: Option<Value>,
    /// Raw text content.
    pub text: Option<String>,
}

impl ModelOutput {
    pub fn from_structured(value: Value) -> Self {
        Self {
            structured: Some(value),
            text: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            structured: None,
            text: Some(text.into()),
        }
    }
}

/// Trait for language model backends.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Fail fast when the provider cannot possibly succeed (no credential).
    fn check_credentials(&self) -> Result<()> {
        Ok(())
    }

    /// Invoke the model once.
    async fn generate(&self, request: &ModelRequest) -> Result<ModelOutput>;
}
