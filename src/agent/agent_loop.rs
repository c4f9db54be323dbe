//! Core agent loop implementation.

use std::sync::Arc;

use crate::llm::{ChatMessage, LlmClient, Role, ToolCall};
use crate::tools::ToolRegistry;

use super::types::{LogEntryType, TaskLogEntry};
use super::StructuredOutput;

const DEFAULT_MAX_ITERATIONS: usize = 20;

/// An LLM with a fixed system prompt and a set of tools.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    tools: ToolRegistry,
    system_prompt: String,
    model: String,
    max_iterations: usize,
}

impl Agent {
    pub fn new(llm: Arc<dyn LlmClient>, tools: ToolRegistry, model: impl Into<String>) -> Self {
        Self {
            llm,
            tools,
            system_prompt: String::new(),
            model: model.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run a task and return the final response and execution log.
    pub async fn run(&self, task: &str) -> anyhow::Result<(String, Vec<TaskLogEntry>)> {
        let mut log = Vec::new();

        let mut messages = vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(task),
        ];

        let tool_schemas = self.tools.get_tool_schemas();
        let tools = if tool_schemas.is_empty() {
            None
        } else {
            Some(tool_schemas.as_slice())
        };

        for iteration in 0..self.max_iterations {
            tracing::debug!(iteration = iteration + 1, model = %self.model, "Agent iteration");

            let response = self
                .llm
                .chat_completion(&self.model, &messages, tools)
                .await?;

            if let Some(tool_calls) = &response.tool_calls {
                if !tool_calls.is_empty() {
                    messages.push(ChatMessage {
                        role: Role::Assistant,
                        content: response.content.clone(),
                        tool_calls: Some(tool_calls.clone()),
                        tool_call_id: None,
                    });

                    for tool_call in tool_calls {
                        log.push(TaskLogEntry::now(
                            LogEntryType::ToolCall,
                            format!(
                                "Calling tool: {} with args: {}",
                                tool_call.function.name, tool_call.function.arguments
                            ),
                        ));

                        let (entry_type, result_str) = match self.execute_tool_call(tool_call).await {
                            Ok(output) => (LogEntryType::ToolResult, output),
                            Err(e) => {
                                tracing::warn!(tool = %tool_call.function.name, error = %e, "Tool failed");
                                (LogEntryType::Error, format!("Error: {}", e))
                            }
                        };

                        log.push(TaskLogEntry::now(
                            entry_type,
                            truncate_for_log(&result_str, 1000),
                        ));

                        messages.push(ChatMessage::tool_result(tool_call.id.clone(), result_str));
                    }

                    continue;
                }
            }

            if let Some(content) = response.content {
                log.push(TaskLogEntry::now(
                    LogEntryType::Response,
                    truncate_for_log(&content, 2000),
                ));
                return Ok((content, log));
            }

            return Err(anyhow::anyhow!("LLM returned empty response"));
        }

        Err(anyhow::anyhow!(
            "Max iterations ({}) reached without completion",
            self.max_iterations
        ))
    }

    /// Run a task and parse the final response as `T`.
    pub async fn run_structured<T: StructuredOutput>(
        &self,
        task: &str,
    ) -> anyhow::Result<(T, Vec<TaskLogEntry>)> {
        let (content, log) = self.run(task).await?;
        let output = parse_structured_output(&content)?;
        Ok((output, log))
    }

    async fn execute_tool_call(&self, tool_call: &ToolCall) -> anyhow::Result<String> {
        let args: serde_json::Value = serde_json::from_str(&tool_call.function.arguments)
            .unwrap_or(serde_json::Value::Null);

        self.tools.execute(&tool_call.function.name, args).await
    }
}

/// Parse a model's final answer as JSON, accepting a fenced code block.
pub fn parse_structured_output<T: StructuredOutput>(content: &str) -> anyhow::Result<T> {
    let body = strip_code_fence(content);
    serde_json::from_str(body)
        .map_err(|e| anyhow::anyhow!("Model output does not match the expected schema: {}", e))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (```json) on the opening line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Truncate a string for logging purposes.
fn truncate_for_log(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}... [truncated]", &s[..idx]),
    }
}
