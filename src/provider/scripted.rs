//! Scripted provider for tests.

use super::{ModelOutput, ModelProvider, ModelRequest};
use crate::error::{CutlineError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued outputs in order and records every prompt it receives.
///
/// Once the queue is exhausted it keeps returning `fallback`.
pub(crate) struct ScriptedProvider {
    queue: Mutex<VecDeque<Result<ModelOutput>>>,
    fallback: ModelOutput,
    prompts: Mutex<Vec<String>>,
    has_key: bool,
}

impl ScriptedProvider {
    pub(crate) fn new(outputs: Vec<Result<ModelOutput>>) -> Self {
        Self {
            queue: Mutex::new(outputs.into()),
            fallback: ModelOutput::default(),
            prompts: Mutex::new(Vec::new()),
            has_key: true,
        }
    }

    pub(crate) fn repeating(output: ModelOutput) -> Self {
        Self {
            fallback: output,
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn without_key() -> Self {
        Self {
            has_key: false,
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn check_credentials(&self) -> Result<()> {
        if self.has_key {
            Ok(())
        } else {
            Err(CutlineError::Config("no key".to_string()))
        }
    }

    async fn generate(&self, request: &ModelRequest) -> Result<ModelOutput> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let next = self.queue.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}
