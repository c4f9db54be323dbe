use std::sync::Arc;

use crate::config::GmailConfig;
use crate::gmail::{BatchDraftSummary, Mailbox};
use crate::llm::LlmClient;
use crate::tools::{FetchOpenEmails, SaveReplyDraft, ToolRegistry};

use super::prompt::triage_system_prompt;
use super::{Agent, StructuredOutput};

/// Task sent when the operator gives no instruction.
pub const DEFAULT_TRIAGE_INSTRUCTION: &str =
    "Triage all open Gmail messages and prepare replies as drafts.";

/// Review unread mail and save reply drafts, returning the batch summary.
pub async fn triage_open_emails(
    config: &GmailConfig,
    llm: Arc<dyn LlmClient>,
    mailbox: Arc<dyn Mailbox>,
    instruction: Option<&str>,
    max_messages: Option<usize>,
) -> anyhow::Result<BatchDraftSummary> {
    let max_messages = max_messages
        .filter(|n| *n > 0)
        .unwrap_or(config.max_messages);
    let instruction = instruction
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TRIAGE_INSTRUCTION);

    let tools = ToolRegistry::new()
        .with(Arc::new(FetchOpenEmails::new(mailbox.clone(), max_messages)))
        .with(Arc::new(SaveReplyDraft::new(mailbox)));

    let system_prompt = triage_system_prompt(
        &config.account_email,
        &tools,
        &BatchDraftSummary::output_schema(),
    );
    let agent = Agent::new(llm, tools, config.llm.model.clone())
        .with_system_prompt(system_prompt)
        .with_max_iterations(config.llm.max_iterations);

    tracing::info!(account = %config.account_email, max_messages, "Starting Gmail triage");
    let (mut summary, log) = agent.run_structured::<BatchDraftSummary>(instruction).await?;
    tracing::info!(
        drafts = summary.drafts_created.len(),
        steps = log.len(),
        "Gmail triage finished"
    );

    if summary.account.trim().is_empty() {
        summary.account = config.account_email.clone();
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmConfig;
    use crate::llm::ChatMessage;
    use crate::test_utils::{MemoryMailbox, MockLlm};
    use serde_json::json;
    use std::path::PathBuf;

    fn config() -> GmailConfig {
        GmailConfig {
            llm: LlmConfig {
                api_key: "k".into(),
                base_url: "http://localhost".into(),
                model: "test-model".into(),
                max_iterations: 6,
            },
            credentials_path: PathBuf::from("credentials.json"),
            token_path: PathBuf::from("token.json"),
            user_id: "me".into(),
            account_email: "ops@example.com".into(),
            max_messages: 2,
        }
    }

    fn summary_json(account: &str) -> String {
        json!({
            "account": account,
            "total_open_messages": 1,
            "drafts_created": [{
                "message_id": "a",
                "draft_id": "draft-1",
                "thread_id": "thread-a",
                "subject": "Re: Invoice question",
                "recipient": "lin@example.com",
                "summary": "Resent the April invoice."
            }],
            "summary_notes": "One reply drafted."
        })
        .to_string()
    }

    #[tokio::test]
    async fn fetches_drafts_and_summarizes() {
        let mailbox = Arc::new(MemoryMailbox::with_messages(&["a", "b", "c"]));
        let llm = Arc::new(MockLlm::new(vec![
            MockLlm::tool_call_response("c1", "fetch_open_emails", json!({})),
            MockLlm::tool_call_response(
                "c2",
                "save_reply_draft",
                json!({
                    "message_id": "a",
                    "thread_id": "thread-a",
                    "recipient": "lin@example.com",
                    "subject": "Re: Invoice question",
                    "body": "Hi Lin, the April invoice is attached again."
                }),
            ),
            MockLlm::text_response(&summary_json("")),
        ]));

        let summary = triage_open_emails(&config(), llm.clone(), mailbox.clone(), None, None)
            .await
            .unwrap();

        assert_eq!(summary.account, "ops@example.com");
        assert_eq!(summary.drafts_created[0].draft_id, "draft-1");
        assert_eq!(*mailbox.list_calls.lock().unwrap(), vec![2]);
        assert_eq!(mailbox.drafts.lock().unwrap().len(), 1);

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests[0][1], ChatMessage::user(DEFAULT_TRIAGE_INSTRUCTION));
        let system = requests[0][0].content.clone().unwrap();
        assert!(system.contains("ops@example.com"));
    }

    #[tokio::test]
    async fn explicit_instruction_and_limit_win() {
        let mailbox = Arc::new(MemoryMailbox::with_messages(&["a"]));
        let llm = Arc::new(MockLlm::new(vec![
            MockLlm::tool_call_response("c1", "fetch_open_emails", json!({})),
            MockLlm::text_response(&summary_json("shared@example.com")),
        ]));

        let summary = triage_open_emails(
            &config(),
            llm.clone(),
            mailbox.clone(),
            Some("Only answer billing questions."),
            Some(7),
        )
        .await
        .unwrap();

        assert_eq!(summary.account, "shared@example.com");
        assert_eq!(*mailbox.list_calls.lock().unwrap(), vec![7]);
        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests[0][1], ChatMessage::user("Only answer billing questions."));
    }

    #[tokio::test]
    async fn rejected_draft_is_reported_to_the_model() {
        let mailbox = Arc::new(MemoryMailbox::with_messages(&["a"]));
        let llm = Arc::new(MockLlm::new(vec![
            MockLlm::tool_call_response(
                "c1",
                "save_reply_draft",
                json!({
                    "message_id": "a",
                    "thread_id": "thread-a",
                    "recipient": "lin@example.com",
                    "subject": "Re",
                    "body": "ok"
                }),
            ),
            MockLlm::text_response(&summary_json("ops@example.com")),
        ]));

        triage_open_emails(&config(), llm.clone(), mailbox.clone(), None, None)
            .await
            .unwrap();

        assert!(mailbox.drafts.lock().unwrap().is_empty());
        let requests = llm.requests.lock().unwrap();
        let fed_back = requests[1][3].content.clone().unwrap();
        assert!(fed_back.starts_with("Error: Draft body must be at least 20 characters"));
    }
}
