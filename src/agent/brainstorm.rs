use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::BrainstormConfig;
use crate::ideas::IdeaGenerationResult;
use crate::llm::LlmClient;
use crate::tools::{RoiHelper, SampleContext, SamplingRequest, ToolRegistry};

use super::prompt::brainstorm_system_prompt;
use super::{Agent, StructuredOutput};

/// Brainstorm improvement ideas grounded in repository files.
///
/// Empty `paths` fall back to the configured search paths and a zero
/// `max_files` to the configured sample size. Titles are normalized and the
/// request is echoed into `inputs` when the model leaves it empty.
pub async fn brainstorm(
    config: &BrainstormConfig,
    llm: Arc<dyn LlmClient>,
    prompt: &str,
    paths: &[String],
    max_files: usize,
) -> anyhow::Result<IdeaGenerationResult> {
    let paths = config.resolved_paths(paths);
    let limit = config.resolved_limit(max_files);

    let request = SamplingRequest {
        prompt: prompt.to_string(),
        paths: paths.clone(),
        default_limit: limit,
    };
    let tools = ToolRegistry::new()
        .with(Arc::new(SampleContext::new(Arc::new(config.sampler()), request)))
        .with(Arc::new(RoiHelper));

    let system_prompt = brainstorm_system_prompt(&tools, &IdeaGenerationResult::output_schema());
    let agent = Agent::new(llm, tools, config.llm.model.clone())
        .with_system_prompt(system_prompt)
        .with_max_iterations(config.llm.max_iterations);

    tracing::info!(model = %config.llm.model, ?paths, limit, "Starting brainstorm");
    let (mut result, log) = agent.run_structured::<IdeaGenerationResult>(prompt).await?;
    tracing::info!(ideas = result.ideas.len(), steps = log.len(), "Brainstorm finished");

    result.normalize_titles();
    if result.inputs.is_empty() {
        if let Value::Object(inputs) = json!({ "prompt": prompt, "paths": paths, "limit": limit }) {
            result.inputs = inputs;
        }
    }
    Ok(result)
}
