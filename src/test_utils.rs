use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::gmail::{DraftMetadata, DraftPlan, GmailError, GmailMessage, Mailbox};
use crate::llm::{ChatMessage, ChatResponse, FunctionCall, LlmClient, ToolCall, ToolSchema};

// ===================
// Mock LLM
// ===================

/// Replays canned responses in order and records every request.
pub struct MockLlm {
    responses: Mutex<Vec<ChatResponse>>,
    call_count: AtomicUsize,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
    pub tool_names: Mutex<Vec<Vec<String>>>,
}

impl MockLlm {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            tool_names: Mutex::new(Vec::new()),
        }
    }

    pub fn text_response(text: &str) -> ChatResponse {
        ChatResponse {
            content: Some(text.to_string()),
            tool_calls: None,
            finish_reason: Some("stop".to_string()),
        }
    }

    pub fn tool_call_response(id: &str, name: &str, args: serde_json::Value) -> ChatResponse {
        ChatResponse {
            content: None,
            tool_calls: Some(vec![ToolCall {
                id: id.to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: args.to_string(),
                },
            }]),
            finish_reason: Some("tool_calls".to_string()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn chat_completion(
        &self,
        _model: &str,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> anyhow::Result<ChatResponse> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(messages.to_vec());
        self.tool_names.lock().unwrap().push(
            tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.function.name.clone())
                .collect(),
        );

        let responses = self.responses.lock().unwrap();
        responses
            .get(idx)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockLlm ran out of responses"))
    }
}

// ===================
// Mock Mailbox
// ===================

/// In-memory mailbox recording every call.
#[derive(Default)]
pub struct MemoryMailbox {
    pub messages: Vec<GmailMessage>,
    pub list_calls: Mutex<Vec<usize>>,
    pub drafts: Mutex<Vec<DraftPlan>>,
}

impl MemoryMailbox {
    pub fn with_messages(ids: &[&str]) -> Self {
        Self {
            messages: ids.iter().map(|id| message(id)).collect(),
            ..Default::default()
        }
    }
}

pub fn message(id: &str) -> GmailMessage {
    GmailMessage {
        id: id.to_string(),
        thread_id: format!("thread-{id}"),
        subject: "Invoice question".to_string(),
        sender: "Lin".to_string(),
        received_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        snippet: "Could you resend".to_string(),
        body_text: "Could you resend the April invoice?".to_string(),
        reply_to: "lin@example.com".to_string(),
    }
}

#[async_trait]
impl Mailbox for MemoryMailbox {
    async fn list_open_messages(&self, max_results: usize) -> Result<Vec<GmailMessage>, GmailError> {
        self.list_calls.lock().unwrap().push(max_results);
        Ok(self.messages.iter().take(max_results).cloned().collect())
    }

    async fn create_reply_draft(&self, draft: &DraftPlan) -> Result<DraftMetadata, GmailError> {
        if draft.recipient.is_empty() {
            return Err(GmailError::MissingRecipient);
        }
        let mut drafts = self.drafts.lock().unwrap();
        drafts.push(draft.clone());
        Ok(DraftMetadata {
            draft_id: format!("draft-{}", drafts.len()),
            message_id: draft.message_id.clone(),
            thread_id: draft.thread_id.clone(),
            recipient: draft.recipient.clone(),
            subject: draft.subject.clone(),
        })
    }
}
