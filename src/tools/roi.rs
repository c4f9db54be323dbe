//! ROI heuristic exposed to the model.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Tool;
use crate::roi::classify_roi;

/// Classify an idea's ROI from 1-5 ratings.
pub struct RoiHelper;

#[async_trait]
impl Tool for RoiHelper {
    fn name(&self) -> &str {
        "roi_helper"
    }

    fn description(&self) -> &str {
        "Classify the ROI of an idea as High, Medium or Low from impact, confidence and effort ratings (each 1-5)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "impact": {
                    "type": "integer",
                    "description": "Expected impact, 1 (minor) to 5 (major)"
                },
                "confidence": {
                    "type": "integer",
                    "description": "Confidence in the estimate, 1 (guess) to 5 (certain)"
                },
                "effort": {
                    "type": "integer",
                    "description": "Estimated effort, 1 (trivial) to 5 (large)"
                }
            },
            "required": ["impact", "confidence", "effort"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let rating = |key: &str| {
            args[key]
                .as_i64()
                .ok_or_else(|| anyhow::anyhow!("Missing or non-integer '{}' argument", key))
        };

        let signal = classify_roi(rating("impact")?, rating("confidence")?, rating("effort")?)?;
        Ok(signal.to_string())
    }
}
