//! Configuration module for Cutline.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{IntentPrompts, Prompts};
pub use settings::{
    GeneralSettings, IntentSettings, ModelSettings, PromptSettings, ServerSettings, Settings,
};
