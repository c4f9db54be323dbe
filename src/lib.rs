//! # Agent Factory
//!
//! Two tool-using agents over an OpenAI-compatible chat-completions API.
//!
//! This library provides:
//! - A repository snippet sampler that ranks files by keyword overlap with a prompt
//! - A deterministic ROI classifier (High / Medium / Low)
//! - A brainstorming agent that turns sampled files into structured ideas
//! - A Gmail triage agent that reads unread mail and saves reply drafts
//!
//! ## Architecture
//!
//! Both agents follow the "tools in a loop" pattern:
//! 1. Build context with system prompt and available tools
//! 2. Call LLM, parse response, execute any tool calls
//! 3. Feed results back to LLM, repeat until a final JSON answer
//! 4. Parse that answer into a typed result
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use agent_factory::{agent, config::BrainstormConfig};
//!
//! let config = BrainstormConfig::from_env()?;
//! let llm = Arc::new(config.llm.client());
//! let result = agent::brainstorm(&config, llm, "caching ideas", &[], 0).await?;
//! ```

pub mod agent;
pub mod config;
pub mod gmail;
pub mod ideas;
pub mod llm;
pub mod roi;
pub mod sampler;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{BrainstormConfig, ConfigError, GmailConfig, LlmConfig};
pub use roi::{classify_roi, RoiError, RoiSignal};
pub use sampler::{snippets_to_context, FileSnippet, SnippetSampler};
