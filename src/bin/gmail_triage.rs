//! Gmail Triage Agent - CLI Entry Point

use std::sync::Arc;

use agent_factory::{
    agent,
    config::GmailConfig,
    gmail::{GmailClient, Mailbox},
};
use clap::Parser;
use console::style;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gmail-triage", about = "Draft replies for unread Gmail messages")]
struct Args {
    /// Task for the agent (defaults to triaging every open message)
    #[arg(long)]
    instruction: Option<String>,

    /// Messages to inspect (defaults to GMAIL_MAX_MESSAGES)
    #[arg(long)]
    max_messages: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_factory=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = GmailConfig::from_env()?;
    info!(
        "Loaded configuration: model={} account={}",
        config.llm.model, config.account_email
    );

    let mailbox: Arc<dyn Mailbox> = Arc::new(GmailClient::new(
        config.credentials_path.clone(),
        config.token_path.clone(),
        config.user_id.clone(),
    ));
    let llm = Arc::new(config.llm.client());

    let summary = agent::triage_open_emails(
        &config,
        llm,
        mailbox,
        args.instruction.as_deref(),
        args.max_messages,
    )
    .await?;

    eprintln!("{}", style("=== Gmail Draft Summary ===").cyan().bold());
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
