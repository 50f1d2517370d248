use serde::{Deserialize, Serialize};

use crate::models::applicant::ApplicationStatus;

/// Structured result of one batch screening evaluation. Produced per run,
/// folded into the applicant row and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: i32,
    pub matching_skills: Vec<String>,
    pub experience_analysis: String,
    pub recommendation: String,
}

impl Evaluation {
    /// Wholesale fallback when the model response carried no usable JSON.
    pub fn fallback() -> Self {
        Self {
            score: 0,
            matching_skills: Vec::new(),
            experience_analysis: "Failed to analyze resume".to_string(),
            recommendation: "reject".to_string(),
        }
    }

    /// Target status by score band: above 70 moves to interview, 50-70 stays
    /// under review, below 50 is rejected.
    pub fn target_status(&self) -> ApplicationStatus {
        if self.score > 70 {
            ApplicationStatus::Interview
        } else if self.score >= 50 {
            ApplicationStatus::Review
        } else {
            ApplicationStatus::Rejected
        }
    }
}

/// Result of the interactive pre-check. Never persisted; wording differs
/// from the batch path on purpose, this shape serves the preview UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityAnalysis {
    pub assessment: String,
    pub match_score: i32,
    pub recommendation: String,
}

impl CompatibilityAnalysis {
    pub fn fallback() -> Self {
        Self {
            assessment: "Unable to analyze resume compatibility".to_string(),
            match_score: 0,
            recommendation: "Not recommended".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_above_70_targets_interview() {
        let eval = Evaluation {
            score: 71,
            ..Evaluation::fallback()
        };
        assert_eq!(eval.target_status(), ApplicationStatus::Interview);
    }

    #[test]
    fn score_band_50_to_70_stays_in_review() {
        for score in [50, 60, 70] {
            let eval = Evaluation {
                score,
                ..Evaluation::fallback()
            };
            assert_eq!(eval.target_status(), ApplicationStatus::Review, "score {}", score);
        }
    }

    #[test]
    fn score_below_50_targets_rejected() {
        let eval = Evaluation {
            score: 49,
            ..Evaluation::fallback()
        };
        assert_eq!(eval.target_status(), ApplicationStatus::Rejected);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(ApplicationStatus::Interview.as_str(), "interview");
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
