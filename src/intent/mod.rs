//! Intent resolution: from a user instruction to one tool call or a reply.

mod prompt;
mod resolver;
mod types;

pub use prompt::PromptBuilder;
pub use resolver::ResponseResolver;
pub use types::{
    ChatRole, ChatTurn, IntentEnvelope, IntentRequest, ResolvedIntent, ToolCall,
};
