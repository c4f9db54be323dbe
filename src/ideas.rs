//! Structured output of the brainstorming agent.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::agent::StructuredOutput;
use crate::roi::RoiSignal;

const MAX_TITLE_CHARS: usize = 80;

/// A single idea surfaced from the sampled files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    /// Short title for the idea
    pub title: String,
    /// Relative file path that inspired the idea
    pub source_reference: String,
    /// Key observation or opportunity discovered
    pub insight: String,
    /// ROI classification
    pub roi_signal: RoiSignal,
    /// Recommended follow-up action
    pub next_step: String,
}

/// Validated JSON response returned by the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaGenerationResult {
    #[serde(default)]
    pub ideas: Vec<Idea>,
    /// Short explanation of observed trends
    pub trend_summary: String,
    /// Echo of the request (prompt, paths, limit)
    #[serde(default)]
    pub inputs: Map<String, Value>,
}

impl IdeaGenerationResult {
    /// Normalize every idea title in place.
    pub fn normalize_titles(&mut self) {
        for idea in &mut self.ideas {
            idea.title = normalize_title(&idea.title);
        }
    }
}

impl StructuredOutput for IdeaGenerationResult {
    fn output_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "ideas": {
                    "type": "array",
                    "maxItems": 5,
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "source_reference": { "type": "string" },
                            "insight": { "type": "string" },
                            "roi_signal": { "type": "string", "enum": ["High", "Medium", "Low"] },
                            "next_step": { "type": "string" }
                        },
                        "required": ["title", "source_reference", "insight", "roi_signal", "next_step"]
                    }
                },
                "trend_summary": { "type": "string" },
                "inputs": { "type": "object" }
            },
            "required": ["ideas", "trend_summary"]
        })
    }
}

/// Collapse whitespace, cap at 80 characters and title-case an idea title.
pub fn normalize_title(title: &str) -> String {
    let cleaned = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        return "Untitled Insight".to_string();
    }

    let truncated: String = cleaned.chars().take(MAX_TITLE_CHARS).collect();
    title_case(&truncated)
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}
