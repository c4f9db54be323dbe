//! Repository sampling tool: ranked snippets as model context.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{optional_limit, Tool};
use crate::sampler::{snippets_to_context, SnippetSampler};

/// Prompt, search paths and default limit of the current brainstorming run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingRequest {
    pub prompt: String,
    pub paths: Vec<String>,
    pub default_limit: usize,
}

/// Collect repository snippets relevant to the run's prompt.
pub struct SampleContext {
    sampler: Arc<SnippetSampler>,
    request: SamplingRequest,
}

impl SampleContext {
    pub fn new(sampler: Arc<SnippetSampler>, request: SamplingRequest) -> Self {
        Self { sampler, request }
    }
}

#[async_trait]
impl Tool for SampleContext {
    fn name(&self) -> &str {
        "sample_context"
    }

    fn description(&self) -> &str {
        "Collect repository snippets relevant to the user's prompt. Returns file paths and excerpts ranked by keyword overlap. Call this before proposing ideas."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of files to sample (defaults to the configured limit)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let limit = optional_limit(&args, "limit").unwrap_or(self.request.default_limit);
        let sampler = Arc::clone(&self.sampler);
        let prompt = self.request.prompt.clone();
        let paths = self.request.paths.clone();

        let snippets = tokio::task::spawn_blocking(move || sampler.sample(&prompt, &paths, limit))
            .await
            .map_err(|e| anyhow::anyhow!("Sampling task failed: {}", e))?;

        tracing::info!(count = snippets.len(), limit, "Sampled files for context");

        if snippets.is_empty() {
            return Ok("No repository files matched the search paths.".to_string());
        }
        Ok(snippets_to_context(&snippets))
    }
}
