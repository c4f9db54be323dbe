//! Gmail message, draft and triage summary types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::agent::StructuredOutput;

/// Draft bodies shorter than this are rejected.
pub const MIN_DRAFT_BODY_CHARS: usize = 20;

/// Minimal representation of an unread message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmailMessage {
    /// Gmail message ID
    pub id: String,
    /// Thread identifier
    pub thread_id: String,
    /// Subject line
    pub subject: String,
    /// Person who sent the email
    pub sender: String,
    /// Timestamp from the Date header
    pub received_at: DateTime<Utc>,
    /// Short excerpt provided by Gmail
    pub snippet: String,
    /// Plain-text version of the email body
    pub body_text: String,
    /// Address used for replying
    pub reply_to: String,
}

/// Reply the model asks the mailbox to store as a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPlan {
    pub message_id: String,
    pub thread_id: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftValidationError {
    #[error("Draft body must be at least 20 characters, got {0}")]
    BodyTooShort(usize),

    #[error("Draft {0} must not contain line breaks")]
    LineBreakInHeader(&'static str),
}

impl DraftPlan {
    /// Check the body length and that header-bound fields stay on one line.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        let header_fields = [
            ("recipient", &self.recipient),
            ("subject", &self.subject),
            ("message_id", &self.message_id),
        ];
        for (field, value) in header_fields {
            if value.contains(['\r', '\n']) {
                return Err(DraftValidationError::LineBreakInHeader(field));
            }
        }

        let len = self.body.chars().count();
        if len < MIN_DRAFT_BODY_CHARS {
            return Err(DraftValidationError::BodyTooShort(len));
        }
        Ok(())
    }
}

/// What the mailbox returns after storing a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftMetadata {
    pub draft_id: String,
    pub message_id: String,
    pub thread_id: String,
    pub recipient: String,
    pub subject: String,
}

/// Per-draft entry of the final summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOutcome {
    pub message_id: String,
    pub draft_id: String,
    pub thread_id: String,
    pub subject: String,
    pub recipient: String,
    /// Short synopsis of the reply
    pub summary: String,
}

/// Structured result returned by the triage agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDraftSummary {
    /// Account that was triaged
    pub account: String,
    /// How many emails were inspected
    pub total_open_messages: u32,
    #[serde(default)]
    pub drafts_created: Vec<DraftOutcome>,
    /// IDs of emails that were skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_messages: Option<Vec<String>>,
    /// High-level overview for the operator
    pub summary_notes: String,
}

impl StructuredOutput for BatchDraftSummary {
    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "account": { "type": "string" },
                "total_open_messages": { "type": "integer", "minimum": 0 },
                "drafts_created": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "message_id": { "type": "string" },
                            "draft_id": { "type": "string" },
                            "thread_id": { "type": "string" },
                            "subject": { "type": "string" },
                            "recipient": { "type": "string" },
                            "summary": { "type": "string" }
                        },
                        "required": ["message_id", "draft_id", "thread_id", "subject", "recipient", "summary"]
                    }
                },
                "skipped_messages": { "type": "array", "items": { "type": "string" } },
                "summary_notes": { "type": "string" }
            },
            "required": ["account", "total_open_messages", "summary_notes"]
        })
    }
}
