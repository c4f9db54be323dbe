//! Run log recorded by the agent loop.

use serde::Serialize;

/// A single entry in the run log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskLogEntry {
    /// Timestamp (RFC 3339)
    pub timestamp: String,

    /// Entry type
    pub entry_type: LogEntryType,

    /// Content of the entry
    pub content: String,
}

/// Types of log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogEntryType {
    /// Tool is being called
    ToolCall,
    /// Tool returned a result
    ToolResult,
    /// Tool failed; the error text went back to the model
    Error,
    /// Agent produced final response
    Response,
}

impl TaskLogEntry {
    pub(crate) fn now(entry_type: LogEntryType, content: String) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            entry_type,
            content,
        }
    }
}
