//! Gmail REST client: unread messages and reply drafts.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use super::mime::{extract_body_text, parse_address, MessagePart, ReplyMessage};
use super::models::{DraftMetadata, DraftPlan, GmailMessage};
use super::{GmailError, Mailbox};

pub const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

/// Inclusive bounds applied to list requests.
const MIN_LIST_RESULTS: usize = 1;
const MAX_LIST_RESULTS: usize = 20;

const DEFAULT_SUBJECT: &str = "(no subject)";
const UNKNOWN_SENDER: &str = "Unknown contact";

/// Gmail API client authenticated with a stored access token.
pub struct GmailClient {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
    credentials_path: PathBuf,
    token_path: PathBuf,
}

impl GmailClient {
    pub fn new(credentials_path: PathBuf, token_path: PathBuf, user_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GMAIL_API_BASE.to_string(),
            user_id,
            credentials_path,
            token_path,
        }
    }

    /// Point the client at another API root (e.g. a local test server).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn user_url(&self, path: &str) -> String {
        format!(
            "{}/users/{}/{}",
            self.base_url,
            urlencoding::encode(&self.user_id),
            path
        )
    }

    async fn access_token(&self) -> Result<String, GmailError> {
        read_access_token(&self.token_path, &self.credentials_path).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, GmailError> {
        let token = self.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).query(query).send().await?;
        decode_response(response).await
    }

    async fn fetch_message(&self, message_id: &str) -> Result<GmailMessage, GmailError> {
        let url = self.user_url(&format!("messages/{}", urlencoding::encode(message_id)));
        let raw: ApiMessage = self
            .get_json(&url, &[("format", "full".to_string())])
            .await?;
        Ok(raw.into_message(message_id, Utc::now()))
    }
}

#[async_trait]
impl Mailbox for GmailClient {
    async fn list_open_messages(&self, max_results: usize) -> Result<Vec<GmailMessage>, GmailError> {
        let max_results = clamp_list_results(max_results);
        let url = self.user_url("messages");
        let query = [
            ("labelIds", "INBOX".to_string()),
            ("labelIds", "UNREAD".to_string()),
            ("maxResults", max_results.to_string()),
        ];

        let listing: ApiMessageList = self.get_json(&url, &query).await.map_err(|e| {
            tracing::error!("Unable to list Gmail messages: {}", e);
            e
        })?;

        let mut messages = Vec::with_capacity(listing.messages.len());
        for item in listing.messages {
            match self.fetch_message(&item.id).await {
                Ok(message) => messages.push(message),
                Err(e) => tracing::warn!("Unable to fetch message {}: {}", item.id, e),
            }
        }

        tracing::debug!(count = messages.len(), "Fetched open messages");
        Ok(messages)
    }

    async fn create_reply_draft(&self, draft: &DraftPlan) -> Result<DraftMetadata, GmailError> {
        if draft.recipient.trim().is_empty() {
            return Err(GmailError::MissingRecipient);
        }
        draft.validate()?;

        let raw = ReplyMessage {
            recipient: &draft.recipient,
            subject: &draft.subject,
            in_reply_to: &draft.message_id,
            body: &draft.body,
        }
        .to_raw();

        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.user_url("drafts"))
            .bearer_auth(token)
            .json(&json!({ "message": { "raw": raw, "threadId": draft.thread_id } }))
            .send()
            .await?;

        let created: ApiDraft = decode_response(response).await.map_err(|e| {
            tracing::error!("Failed to save Gmail draft: {}", e);
            e
        })?;

        tracing::info!("Draft {} created for thread {}", created.id, draft.thread_id);
        Ok(created.into_metadata(draft))
    }
}

/// Keep list sizes inside the range the triage agent is allowed to request.
pub fn clamp_list_results(requested: usize) -> usize {
    requested.clamp(MIN_LIST_RESULTS, MAX_LIST_RESULTS)
}

/// Read the bearer token from an authorized-user token file.
///
/// Accepts both the `token` field written by Google's client libraries and a
/// plain `access_token` field.
pub async fn read_access_token(token_path: &Path, credentials_path: &Path) -> Result<String, GmailError> {
    let contents = match tokio::fs::read_to_string(token_path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(GmailError::MissingToken {
                token_path: token_path.to_path_buf(),
                credentials_path: credentials_path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let stored: StoredToken = serde_json::from_str(&contents)
        .map_err(|e| GmailError::InvalidToken(token_path.to_path_buf(), e.to_string()))?;

    stored
        .token
        .or(stored.access_token)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            GmailError::InvalidToken(token_path.to_path_buf(), "no access token field".to_string())
        })
}

async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GmailError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(GmailError::Http {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| GmailError::Decode(e.to_string()))
}

#[derive(Deserialize)]
struct StoredToken {
    token: Option<String>,
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct ApiMessageList {
    #[serde(default)]
    messages: Vec<ApiMessageRef>,
}

#[derive(Deserialize)]
struct ApiMessageRef {
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiMessage {
    id: Option<String>,
    #[serde(default)]
    thread_id: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    payload: MessagePart,
}

impl ApiMessage {
    /// Flatten a `format=full` message; `now` stands in for a missing or bad `Date`.
    fn into_message(self, requested_id: &str, now: DateTime<Utc>) -> GmailMessage {
        let payload = &self.payload;
        let subject = payload.header("subject").unwrap_or(DEFAULT_SUBJECT).to_string();
        let sender_raw = payload.header("from").unwrap_or_default().to_string();
        let (sender_name, sender_email) = parse_address(&sender_raw);

        let received_at = payload
            .header("date")
            .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or(now);

        let reply_to = payload
            .header("reply-to")
            .and_then(non_empty)
            .or_else(|| non_empty(&sender_email))
            .or_else(|| non_empty(&sender_raw))
            .unwrap_or_default();

        let sender = [&sender_name, &sender_email, &sender_raw]
            .into_iter()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

        let body_text = Some(extract_body_text(payload))
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| self.snippet.clone());

        GmailMessage {
            id: self.id.clone().unwrap_or_else(|| requested_id.to_string()),
            thread_id: self.thread_id.clone(),
            subject,
            sender,
            received_at,
            snippet: self.snippet.clone(),
            body_text,
            reply_to,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

#[derive(Deserialize)]
struct ApiDraft {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: Option<ApiDraftMessage>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiDraftMessage {
    thread_id: Option<String>,
}

impl ApiDraft {
    fn into_metadata(self, draft: &DraftPlan) -> DraftMetadata {
        let thread_id = self
            .message
            .and_then(|m| m.thread_id)
            .unwrap_or_else(|| draft.thread_id.clone());

        DraftMetadata {
            draft_id: self.id,
            message_id: draft.message_id.clone(),
            thread_id,
            recipient: draft.recipient.clone(),
            subject: draft.subject.clone(),
        }
    }
}
