//! Mailbox access for the triage agent.
//!
//! [`Mailbox`] is the capability the agent's tools depend on; [`GmailClient`]
//! implements it against the Gmail REST API.

mod client;
pub mod mime;
mod models;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use client::{clamp_list_results, read_access_token, GmailClient, GMAIL_API_BASE};
pub use models::{
    BatchDraftSummary, DraftMetadata, DraftOutcome, DraftPlan, DraftValidationError, GmailMessage,
    MIN_DRAFT_BODY_CHARS,
};

#[derive(Debug, Error)]
pub enum GmailError {
    #[error(
        "Gmail token not found at {}. Authorize the OAuth client from {} and store the token there.",
        .token_path.display(),
        .credentials_path.display()
    )]
    MissingToken {
        token_path: PathBuf,
        credentials_path: PathBuf,
    },

    #[error("Invalid Gmail token file {0}: {1}")]
    InvalidToken(PathBuf, String),

    #[error("Recipient email is required to create a draft")]
    MissingRecipient,

    #[error(transparent)]
    InvalidDraft(#[from] DraftValidationError),

    #[error("Gmail API error ({status}): {body}")]
    Http { status: u16, body: String },

    #[error("Gmail request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected Gmail response: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Unread messages in, reply drafts out.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Unread inbox messages, at most `max_results` of them.
    async fn list_open_messages(&self, max_results: usize) -> Result<Vec<GmailMessage>, GmailError>;

    /// Store a reply draft for later review.
    async fn create_reply_draft(&self, draft: &DraftPlan) -> Result<DraftMetadata, GmailError>;
}
