//! Agent module - the core autonomous agent logic.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with system prompt and user task
//! 2. Call LLM with available tools
//! 3. If LLM requests tool call, execute it and feed result back
//! 4. Repeat until LLM produces final response or max iterations reached
//!
//! The final response is parsed into a typed [`StructuredOutput`].

mod agent_loop;
mod brainstorm;
mod prompt;
mod triage;
mod types;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use agent_loop::{parse_structured_output, Agent};
pub use brainstorm::brainstorm;
pub use prompt::{brainstorm_system_prompt, build_system_prompt, triage_system_prompt};
pub use triage::{triage_open_emails, DEFAULT_TRIAGE_INSTRUCTION};
pub use types::{LogEntryType, TaskLogEntry};

/// A JSON answer the model must produce at the end of a run.
pub trait StructuredOutput: DeserializeOwned {
    /// JSON schema shown to the model in the system prompt.
    fn output_schema() -> Value;
}
