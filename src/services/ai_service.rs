use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::error;

use crate::error::{Error, Result};
use crate::models::applicant::PendingApplication;
use crate::models::evaluation::{CompatibilityAnalysis, Evaluation};

pub const SCREENING_SYSTEM_PROMPT: &str = "You are an AI resume screening assistant. \
Evaluate candidates based on job requirements and provide structured feedback.";

pub const CHECK_SYSTEM_PROMPT: &str = "You are a helpful job application assistant that \
provides brief and honest assessments about resume compatibility with job listings.";

/// Remote scoring capability. The one pipeline stage allowed to fail
/// outward: a missing evaluation cannot be defaulted without corrupting the
/// score semantics, so transport and envelope failures surface as
/// `Error::Evaluation` for the runner to handle per item.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateEvaluator: Send + Sync {
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct AiService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AiService {
    pub fn new(api_key: String, base_url: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl CandidateEvaluator for AiService {
    async fn chat(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
        });

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .map_err(|e| Error::Evaluation(format!("AI service unreachable: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("AI service error {}: {}", status, text);
            return Err(Error::Evaluation(format!("AI service error {}", status)));
        }

        let body: JsonValue = res
            .json()
            .await
            .map_err(|e| Error::Evaluation(format!("Invalid AI response body: {}", e)))?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Evaluation("Invalid AI response format".to_string()))
    }
}

/// Screening prompt for the batch pipeline. Deterministic: same application
/// and resume text always produce the same prompt.
pub fn build_screening_prompt(applicant: &PendingApplication, resume_text: &str) -> String {
    let mut prompt = format!(
        "Please evaluate this candidate for the {} position.\n\n\
         JOB DESCRIPTION:\n{}\n\n\
         REQUIRED SKILLS:\n{}\n\n\
         EXPERIENCE LEVEL:\n{}\n\n",
        applicant.job_title,
        applicant.job_description,
        applicant.job_skills.join(", "),
        applicant.experience_level.as_deref().unwrap_or("Not specified"),
    );

    if let Some(employment_type) = applicant.employment_type.as_deref() {
        prompt.push_str(&format!("EMPLOYMENT TYPE:\n{}\n\n", employment_type));
    }
    if let Some(instructions) = applicant.custom_instructions.as_deref() {
        prompt.push_str(&format!("ADDITIONAL SCREENING CRITERIA:\n{}\n\n", instructions));
    }

    prompt.push_str(&format!("CANDIDATE RESUME:\n{}\n\n", resume_text));

    if let Some(cover_letter) = applicant.cover_letter.as_deref() {
        prompt.push_str(&format!("COVER LETTER:\n{}\n\n", cover_letter));
    }

    prompt.push_str(
        "Please provide:\n\
         1. An overall match score between 0-100\n\
         2. List of matching skills found in resume\n\
         3. Brief analysis of candidate's experience\n\
         4. Recommendation (reject, consider, strong match)\n\n\
         Format your response as a JSON object with the following structure:\n\
         {\n\
           \"score\": number,\n\
           \"matchingSkills\": string[],\n\
           \"experienceAnalysis\": string,\n\
           \"recommendation\": string\n\
         }",
    );

    prompt
}

/// Shorter prompt for the stateless pre-check path.
pub fn build_check_prompt(
    job_title: &str,
    job_description: &str,
    skills: &[String],
    resume_text: &str,
) -> String {
    format!(
        "Please provide a quick assessment of how well this resume matches the job position.\n\n\
         JOB TITLE: {}\n\n\
         JOB DESCRIPTION:\n{}\n\n\
         REQUIRED SKILLS:\n{}\n\n\
         CANDIDATE RESUME:\n{}\n\n\
         Please provide:\n\
         1. A brief match assessment (3 sentences maximum)\n\
         2. A match score between 0-100\n\
         3. A simple recommendation (Good fit, Consider applying, Not recommended)\n\n\
         Format your response as a JSON object with the following structure:\n\
         {{\n\
           \"assessment\": string,\n\
           \"matchScore\": number,\n\
           \"recommendation\": string\n\
         }}",
        job_title,
        job_description,
        skills.join(", "),
        resume_text,
    )
}

/// Parses the batch evaluation out of raw model output. Total function: the
/// model's output format is advisory, so anything unusable resolves to a
/// defaulted result instead of an error. Fields default independently, a
/// response carrying only `score` still yields a partially populated result.
pub fn parse_evaluation(raw: &str) -> Evaluation {
    let Some(parsed) = extract_json_object(raw) else {
        error!("No valid JSON found in AI screening response");
        return Evaluation::fallback();
    };

    Evaluation {
        score: number_field(&parsed, "score"),
        matching_skills: string_array_field(&parsed, "matchingSkills"),
        experience_analysis: string_field(&parsed, "experienceAnalysis")
            .unwrap_or_else(|| "No analysis provided".to_string()),
        recommendation: string_field(&parsed, "recommendation")
            .unwrap_or_else(|| "reject".to_string()),
    }
}

/// Pre-check counterpart of `parse_evaluation`. Defaults keep this path's
/// own wording, which deliberately differs from the batch path.
pub fn parse_compatibility(raw: &str) -> CompatibilityAnalysis {
    let Some(parsed) = extract_json_object(raw) else {
        error!("No valid JSON found in AI compatibility response");
        return CompatibilityAnalysis::fallback();
    };

    CompatibilityAnalysis {
        assessment: string_field(&parsed, "assessment")
            .unwrap_or_else(|| "Unable to provide an assessment".to_string()),
        match_score: number_field(&parsed, "matchScore"),
        recommendation: string_field(&parsed, "recommendation")
            .unwrap_or_else(|| "Not recommended".to_string()),
    }
}

/// Greedy scan from the first `{` to the last `}`. Brittle against multiple
/// objects by design, matching the lenient contract: any failure here is a
/// fallback, never an error.
fn extract_json_object(raw: &str) -> Option<JsonValue> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

fn number_field(parsed: &JsonValue, key: &str) -> i32 {
    parsed
        .get(key)
        .and_then(|v| v.as_f64())
        .map(|f| f.round() as i32)
        .unwrap_or(0)
}

fn string_field(parsed: &JsonValue, key: &str) -> Option<String> {
    parsed
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn string_array_field(parsed: &JsonValue, key: &str) -> Vec<String> {
    parsed
        .get(key)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_applicant() -> PendingApplication {
        PendingApplication {
            id: 7,
            fullname: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            resume_url: "https://cv.example/ada.pdf".to_string(),
            cover_letter: Some("I love compilers.".to_string()),
            listing_id: 3,
            job_title: "Backend Engineer".to_string(),
            job_description: "Build the screening pipeline.".to_string(),
            job_skills: vec!["Python".to_string(), "AWS".to_string()],
            custom_instructions: Some("Prefer open source contributors".to_string()),
            experience_level: Some("Senior".to_string()),
            employment_type: Some("Full-time".to_string()),
        }
    }

    #[test]
    fn screening_prompt_embeds_all_job_facts() {
        let prompt = build_screening_prompt(&sample_applicant(), "resume body here");
        assert!(prompt.contains("Backend Engineer position"));
        assert!(prompt.contains("Build the screening pipeline."));
        assert!(prompt.contains("Python, AWS"));
        assert!(prompt.contains("EXPERIENCE LEVEL:\nSenior"));
        assert!(prompt.contains("EMPLOYMENT TYPE:\nFull-time"));
        assert!(prompt.contains("ADDITIONAL SCREENING CRITERIA:\nPrefer open source contributors"));
        assert!(prompt.contains("CANDIDATE RESUME:\nresume body here"));
        assert!(prompt.contains("COVER LETTER:\nI love compilers."));
        assert!(prompt.contains("\"matchingSkills\": string[]"));
    }

    #[test]
    fn screening_prompt_omits_optional_sections_when_absent() {
        let mut applicant = sample_applicant();
        applicant.cover_letter = None;
        applicant.custom_instructions = None;
        let prompt = build_screening_prompt(&applicant, "text");
        assert!(!prompt.contains("COVER LETTER"));
        assert!(!prompt.contains("ADDITIONAL SCREENING CRITERIA"));
    }

    #[test]
    fn check_prompt_requests_the_assessment_shape() {
        let prompt = build_check_prompt(
            "Data Engineer",
            "ETL pipelines",
            &["SQL".to_string(), "Spark".to_string()],
            "resume",
        );
        assert!(prompt.contains("JOB TITLE: Data Engineer"));
        assert!(prompt.contains("SQL, Spark"));
        assert!(prompt.contains("\"matchScore\": number"));
        assert!(prompt.contains("Good fit, Consider applying, Not recommended"));
    }

    #[test]
    fn parses_json_embedded_in_prose() {
        let raw = r#"Sure, here is my evaluation:
        {"score": 85, "matchingSkills": ["Python", "AWS"], "experienceAnalysis": "Strong match", "recommendation": "strong match"}
        Let me know if you need anything else."#;
        let eval = parse_evaluation(raw);
        assert_eq!(eval.score, 85);
        assert_eq!(eval.matching_skills, vec!["Python", "AWS"]);
        assert_eq!(eval.experience_analysis, "Strong match");
        assert_eq!(eval.recommendation, "strong match");
    }

    #[test]
    fn parser_is_total_on_garbage_input() {
        for raw in ["", "no json here", "{ broken", "}{"] {
            let eval = parse_evaluation(raw);
            assert_eq!(eval, Evaluation::fallback(), "input: {:?}", raw);
        }
    }

    #[test]
    fn parser_is_idempotent() {
        let raw = r#"{"score": 55, "recommendation": "consider"}"#;
        assert_eq!(parse_evaluation(raw), parse_evaluation(raw));
    }

    #[test]
    fn fields_default_independently() {
        let eval = parse_evaluation(r#"{"score": 62}"#);
        assert_eq!(eval.score, 62);
        assert!(eval.matching_skills.is_empty());
        assert_eq!(eval.experience_analysis, "No analysis provided");
        assert_eq!(eval.recommendation, "reject");
    }

    #[test]
    fn empty_strings_are_treated_as_missing() {
        let eval = parse_evaluation(
            r#"{"score": 40, "experienceAnalysis": "  ", "recommendation": ""}"#,
        );
        assert_eq!(eval.experience_analysis, "No analysis provided");
        assert_eq!(eval.recommendation, "reject");
    }

    #[test]
    fn float_scores_are_rounded() {
        let eval = parse_evaluation(r#"{"score": 70.6}"#);
        assert_eq!(eval.score, 71);
    }

    #[test]
    fn compatibility_defaults_use_the_preview_wording() {
        let analysis = parse_compatibility("nothing structured at all");
        assert_eq!(analysis, CompatibilityAnalysis::fallback());
        assert_eq!(analysis.recommendation, "Not recommended");

        let partial = parse_compatibility(r#"{"matchScore": 45}"#);
        assert_eq!(partial.match_score, 45);
        assert_eq!(partial.assessment, "Unable to provide an assessment");
        assert_eq!(partial.recommendation, "Not recommended");
    }
}
