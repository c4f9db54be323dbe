//! Idea Brainstorm Agent - CLI Entry Point
//!
//! Samples repository files for a prompt and prints structured ideas as JSON.

use std::sync::Arc;

use agent_factory::{agent, config::BrainstormConfig};
use clap::Parser;
use console::style;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "idea-brainstorm", about = "Repository-aware brainstorming agent")]
struct Args {
    /// Topic or question for idea generation
    #[arg(long)]
    prompt: String,

    /// Directories or files to prioritize
    #[arg(long, num_args = 0..)]
    paths: Vec<String>,

    /// Maximum files to sample (0 uses MAX_SAMPLED_FILES)
    #[arg(long, default_value_t = 0)]
    max_files: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_factory=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = BrainstormConfig::from_env()?;
    info!("Loaded configuration: model={}", config.llm.model);

    eprintln!("{}", style("Idea Brainstorm Agent").cyan().bold());
    eprintln!(
        "Using provider: model={} max_sampled_files={}",
        config.llm.model, config.max_sampled_files
    );

    let llm = Arc::new(config.llm.client());
    let result = agent::brainstorm(&config, llm, &args.prompt, &args.paths, args.max_files).await?;

    eprintln!("\n{}", style("JSON Output").bold());
    println!("{}", serde_json::to_string_pretty(&result)?);
    eprintln!("\n{}", style("Done").green());

    Ok(())
}
