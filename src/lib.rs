//! Cutline - natural-language commands for a video-editing timeline
//!
//! Turns a free-form editing instruction ("from 2 sec for 10 sec add
//! cardboard to track 2") into exactly one structured tool call, or a short
//! reply when no edit is meant.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `catalog` - The editing tools the model may call, with argument schemas
//! - `timing` - Time expression parsing and start/duration/end normalization
//! - `intent` - Prompt construction and model response resolution
//! - `provider` - Language model backends
//! - `orchestrator` - Pipeline coordination
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust,no_run
//! use cutline::config::Settings;
//! use cutline::intent::IntentRequest;
//! use cutline::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!
//!     let request = IntentRequest::new("from 2 sec for 10 sec add cardboard to track 2");
//!     let intent = orchestrator.handle(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&intent)?);
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod intent;
pub mod openai;
pub mod orchestrator;
pub mod provider;
pub mod timing;

pub use error::{CutlineError, Result};
