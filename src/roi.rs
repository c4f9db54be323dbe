//! Deterministic ROI heuristic shared by the model and the tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive bounds for every ROI input.
const MIN_INPUT: i64 = 1;
const MAX_INPUT: i64 = 5;

/// Thresholds in tenths of a composite point.
const HIGH_THRESHOLD_TENTHS: i64 = 20;
const MEDIUM_THRESHOLD_TENTHS: i64 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoiError {
    #[error("{field} must be between 1 and 5, got {value}")]
    InvalidArgument { field: &'static str, value: i64 },
}

/// ROI classification attached to every idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoiSignal {
    High,
    Medium,
    Low,
}

impl RoiSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::fmt::Display for RoiSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite score `0.4*impact + 0.4*confidence - 0.3*effort`, in tenths.
///
/// Integer arithmetic keeps the thresholds exact.
pub fn composite_tenths(impact: i64, confidence: i64, effort: i64) -> i64 {
    4 * impact + 4 * confidence - 3 * effort
}

/// Classify an idea from 1-5 impact, confidence and effort ratings.
///
/// # Errors
///
/// Returns `RoiError::InvalidArgument` for the first input outside `1..=5`.
pub fn classify_roi(impact: i64, confidence: i64, effort: i64) -> Result<RoiSignal, RoiError> {
    for (value, field) in [(impact, "impact"), (confidence, "confidence"), (effort, "effort")] {
        if !(MIN_INPUT..=MAX_INPUT).contains(&value) {
            return Err(RoiError::InvalidArgument { field, value });
        }
    }

    let composite = composite_tenths(impact, confidence, effort);
    let signal = if composite >= HIGH_THRESHOLD_TENTHS {
        RoiSignal::High
    } else if composite >= MEDIUM_THRESHOLD_TENTHS {
        RoiSignal::Medium
    } else {
        RoiSignal::Low
    };
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_roi_ranges() {
        assert_eq!(classify_roi(5, 5, 1), Ok(RoiSignal::High));
        assert_eq!(classify_roi(3, 3, 3), Ok(RoiSignal::Medium));
        assert_eq!(classify_roi(2, 2, 5), Ok(RoiSignal::Low));
    }

    #[test]
    fn classify_roi_validates_input() {
        for invalid in [0, 6] {
            assert_eq!(
                classify_roi(invalid, 3, 2),
                Err(RoiError::InvalidArgument {
                    field: "impact",
                    value: invalid
                })
            );
        }
    }

    #[test]
    fn error_names_the_offending_field() {
        let err = classify_roi(3, 3, 9).unwrap_err();
        assert_eq!(err.to_string(), "effort must be between 1 and 5, got 9");
        let err = classify_roi(3, -1, 9).unwrap_err();
        assert!(err.to_string().starts_with("confidence"));
    }

    #[test]
    fn thresholds_are_inclusive_and_exact() {
        // 0.4*4 + 0.4*4 - 0.3*4 = 2.0
        assert_eq!(composite_tenths(4, 4, 4), 20);
        assert_eq!(classify_roi(4, 4, 4), Ok(RoiSignal::High));
        // 0.4*2 + 0.4*2 - 0.3*2 = 1.0
        assert_eq!(classify_roi(2, 2, 2), Ok(RoiSignal::Medium));
        // 0.4*1 + 0.4*2 - 0.3*1 = 0.9
        assert_eq!(classify_roi(1, 2, 1), Ok(RoiSignal::Low));
    }

    #[test]
    fn signal_serializes_as_label() {
        assert_eq!(serde_json::to_string(&RoiSignal::Medium).unwrap(), "\"Medium\"");
        let parsed: RoiSignal = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(parsed, RoiSignal::High);
        assert!(serde_json::from_str::<RoiSignal>("\"Huge\"").is_err());
    }
}
