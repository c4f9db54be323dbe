//! Mailbox tools: read unread messages, save reply drafts.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{optional_limit, Tool};
use crate::gmail::{DraftPlan, Mailbox};

/// List unread inbox messages that still need follow-up.
pub struct FetchOpenEmails {
    mailbox: Arc<dyn Mailbox>,
    default_max: usize,
}

impl FetchOpenEmails {
    pub fn new(mailbox: Arc<dyn Mailbox>, default_max: usize) -> Self {
        Self {
            mailbox,
            default_max,
        }
    }
}

#[async_trait]
impl Tool for FetchOpenEmails {
    fn name(&self) -> &str {
        "fetch_open_emails"
    }

    fn description(&self) -> &str {
        "Load unread inbox messages that still need follow-up. Returns a JSON array with id, thread_id, subject, sender, received_at, snippet, body_text and reply_to."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of messages to load (defaults to the configured maximum, capped at 20)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let limit = optional_limit(&args, "limit").unwrap_or(self.default_max);
        let messages = self.mailbox.list_open_messages(limit).await?;
        Ok(serde_json::to_string(&messages)?)
    }
}

/// Persist a reply draft so the operator can review and send it later.
pub struct SaveReplyDraft {
    mailbox: Arc<dyn Mailbox>,
}

impl SaveReplyDraft {
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self { mailbox }
    }
}

#[async_trait]
impl Tool for SaveReplyDraft {
    fn name(&self) -> &str {
        "save_reply_draft"
    }

    fn description(&self) -> &str {
        "Save a reply to an email as a Gmail draft. Returns the draft metadata as JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message_id": { "type": "string", "description": "Original message ID" },
                "thread_id": { "type": "string", "description": "Thread to keep the conversation grouped" },
                "recipient": { "type": "string", "description": "Who should receive the reply" },
                "subject": { "type": "string", "description": "Subject line for the reply" },
                "body": {
                    "type": "string",
                    "minLength": 20,
                    "description": "Full email body to save"
                }
            },
            "required": ["message_id", "thread_id", "recipient", "subject", "body"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let draft: DraftPlan = serde_json::from_value(args)
            .map_err(|e| anyhow::anyhow!("Invalid draft arguments: {}", e))?;
        draft.validate()?;

        let metadata = self.mailbox.create_reply_draft(&draft).await?;
        Ok(serde_json::to_string(&metadata)?)
    }
}
